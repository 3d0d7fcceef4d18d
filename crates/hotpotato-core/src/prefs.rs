//! Persisted user preferences.
//!
//! Only the chosen language survives across sessions. Everything else
//! (safe mode, category filters, mute) lives in the session state.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{HotPotatoError, Result};
use crate::types::Language;

/// Storage for the one preference that outlives a session.
pub trait PreferenceStore: Send {
    /// The stored language, if a valid one was saved before.
    fn language(&self) -> Option<Language>;

    /// Persist the chosen language.
    fn set_language(&mut self, language: Language) -> Result<()>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredPreferences {
    #[serde(default)]
    language: Option<String>,
}

/// Preferences kept in a small TOML file (`prefs.toml` in the data directory).
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store located at `<data_dir>/prefs.toml`.
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join("prefs.toml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<StoredPreferences> {
        let content = std::fs::read_to_string(&self.path)?;
        Ok(toml::from_str(&content)?)
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn language(&self) -> Option<Language> {
        let stored = match self.read() {
            Ok(stored) => stored,
            Err(HotPotatoError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No stored preferences");
                return None;
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Ignoring unreadable preferences");
                return None;
            }
        };
        let code = stored.language?;
        let language = Language::parse(&code);
        if language.is_none() {
            warn!(code = %code, "Ignoring unknown stored language");
        }
        language
    }

    fn set_language(&mut self, language: Language) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let stored = StoredPreferences {
            language: Some(language.code().to_string()),
        };
        std::fs::write(&self.path, toml::to_string_pretty(&stored)?)?;
        info!(language = %language, path = %self.path.display(), "Language preference saved");
        Ok(())
    }
}

/// In-memory store for tests and for running without a data directory.
///
/// Clones share the same underlying value.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferenceStore {
    language: Arc<Mutex<Option<Language>>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_language(language: Language) -> Self {
        Self {
            language: Arc::new(Mutex::new(Some(language))),
        }
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn language(&self) -> Option<Language> {
        self.language.lock().ok().and_then(|guard| *guard)
    }

    fn set_language(&mut self, language: Language) -> Result<()> {
        let mut guard = self
            .language
            .lock()
            .map_err(|e| HotPotatoError::Preference(format!("Preference mutex poisoned: {}", e)))?;
        *guard = Some(language);
        Ok(())
    }
}
