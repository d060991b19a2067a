use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, File, FileFormat};
use serde::Deserialize;
use std::path::PathBuf;

use crate::hashtag::DEFAULT_HREF_BASE;

#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tags {
    /// Path prefix of tag pages, e.g. `/tags`
    pub href_base: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Limits {
    /// Largest accepted text (or tag) per request item, in bytes
    pub max_text_bytes: usize,
    /// Most texts accepted by the batch endpoint
    pub max_batch: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: Server,
    pub tags: Tags,
    pub limits: Limits,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        // 1. Try to load from settings.toml (optional for deployment)
        let config_file_name = "settings.toml";

        // Check in current directory
        let current_dir_path = PathBuf::from(config_file_name);
        if current_dir_path.exists() {
            builder = builder.add_source(File::from(current_dir_path).required(false));
        }

        // Check in tagboard-server directory (for development)
        let dev_path = PathBuf::from("tagboard-server").join(config_file_name);
        if dev_path.exists() {
            builder = builder.add_source(File::from(dev_path).required(false));
        }

        builder = with_defaults(builder)?;

        // 2. Override with environment variables (highest priority)
        if let Ok(port) = std::env::var("PORT") {
            builder = builder.set_override("server.port", port)?;
        }
        if let Ok(host) = std::env::var("HOST") {
            builder = builder.set_override("server.host", host)?;
        }
        if let Ok(href_base) = std::env::var("TAGBOARD_HREF_BASE") {
            builder = builder.set_override("tags.href_base", href_base)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Settings from TOML text layered over the defaults, without touching the
    /// filesystem or environment
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let builder = Config::builder().add_source(File::from_str(toml, FileFormat::Toml));
        with_defaults(builder)?.build()?.try_deserialize()
    }
}

fn with_defaults(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    // Default to 0.0.0.0 so the service is reachable from outside a container
    builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 3000)?
        .set_default("tags.href_base", DEFAULT_HREF_BASE)?
        .set_default("limits.max_text_bytes", 65536)?
        .set_default("limits.max_batch", 100)
}
