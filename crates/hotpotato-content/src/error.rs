//! Error types for content loading.

use hotpotato_core::error::HotPotatoError;

/// Why a locale bundle or asset manifest could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Resource unreachable: {path}: {reason}")]
    Unreachable { path: String, reason: String },
    #[error("Malformed resource {path}: {reason}")]
    Malformed { path: String, reason: String },
    #[error("Invalid locale bundle {path}: {reason}")]
    Invalid { path: String, reason: String },
}

impl LoadError {
    pub fn unreachable(path: &str, reason: impl ToString) -> Self {
        Self::Unreachable {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn malformed(path: &str, reason: impl ToString) -> Self {
        Self::Malformed {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid(path: &str, reason: impl ToString) -> Self {
        Self::Invalid {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }

    /// The resource path the error refers to.
    pub fn path(&self) -> &str {
        match self {
            Self::Unreachable { path, .. }
            | Self::Malformed { path, .. }
            | Self::Invalid { path, .. } => path,
        }
    }
}

impl From<LoadError> for HotPotatoError {
    fn from(err: LoadError) -> Self {
        HotPotatoError::Content(err.to_string())
    }
}
