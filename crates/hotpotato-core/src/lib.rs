pub mod config;
pub mod error;
pub mod events;
pub mod prefs;
pub mod types;

pub use config::HotPotatoConfig;
pub use error::{HotPotatoError, Result};
pub use prefs::{FilePreferenceStore, MemoryPreferenceStore, PreferenceStore};
pub use types::*;
