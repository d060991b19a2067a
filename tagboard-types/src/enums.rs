use serde::{Deserialize, Serialize};

/// Discriminator carried in the `type` field of a link token.
///
/// Only one kind exists today; plain text segments are serialized as bare
/// JSON strings and carry no discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    #[default]
    Link,
}
