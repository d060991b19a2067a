use crate::config::{Limits, Settings};
use crate::hashtag::TagLinker;

#[derive(Debug, Clone)]
pub struct AppState {
    pub linker: TagLinker,
    pub limits: Limits,
}

impl AppState {
    pub fn new(linker: TagLinker, limits: Limits) -> Self {
        Self { linker, limits }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(TagLinker::new(settings.tags.href_base.as_str()), settings.limits)
    }
}
