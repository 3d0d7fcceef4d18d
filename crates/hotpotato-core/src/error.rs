use thiserror::Error;

/// Top-level error type for the Hot Potato system.
///
/// Subsystem crates define their own error types (content loading, audio,
/// game transitions) and wrap this one where they touch configuration,
/// preferences or the filesystem.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HotPotatoError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Preference error: {0}")]
    Preference(String),

    #[error("Content error: {0}")]
    Content(String),

    #[error("Audio error: {0}")]
    Audio(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for HotPotatoError {
    fn from(err: toml::de::Error) -> Self {
        HotPotatoError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for HotPotatoError {
    fn from(err: toml::ser::Error) -> Self {
        HotPotatoError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for HotPotatoError {
    fn from(err: serde_json::Error) -> Self {
        HotPotatoError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Hot Potato operations.
pub type Result<T> = std::result::Result<T, HotPotatoError>;
