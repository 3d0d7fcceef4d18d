use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{HotPotatoError, Result};
use crate::types::Language;

/// Top-level configuration for the Hot Potato game.
///
/// Loaded from `~/.hotpotato/config.toml` by default. Every section is
/// optional; missing sections and fields fall back to their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HotPotatoConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub content: ContentConfig,
    #[serde(default)]
    pub round: RoundConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub game: GameConfig,
}

impl HotPotatoConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read, parsed, or fails validation.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: HotPotatoConfig = toml::from_str(&content)?;
        config.validate()?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.round.min_delay_secs >= self.round.max_delay_secs {
            return Err(HotPotatoError::Config(format!(
                "round.min_delay_secs ({}) must be less than round.max_delay_secs ({})",
                self.round.min_delay_secs, self.round.max_delay_secs
            )));
        }
        if self.round.history_len == 0 {
            return Err(HotPotatoError::Config(
                "round.history_len must be at least 1".to_string(),
            ));
        }
        if Language::parse(&self.content.default_language).is_none() {
            return Err(HotPotatoError::Config(format!(
                "content.default_language `{}` is not one of en, el, bg, mk, sq",
                self.content.default_language
            )));
        }
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
    /// Directory holding the persisted language preference.
    pub data_dir: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            data_dir: "~/.hotpotato".to_string(),
        }
    }
}

/// Where locale bundles and media assets are fetched from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Root directory containing `locales/` and `assets/`.
    pub root_dir: String,
    /// Language used when no preference has been stored yet.
    pub default_language: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            root_dir: ".".to_string(),
            default_language: "en".to_string(),
        }
    }
}

/// Round timing and prompt repetition settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundConfig {
    /// Lower bound (inclusive) of the random round delay.
    pub min_delay_secs: u64,
    /// Upper bound (exclusive) of the random round delay.
    pub max_delay_secs: u64,
    /// Number of recently shown prompts excluded from the next pick.
    pub history_len: usize,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            min_delay_secs: 10,
            max_delay_secs: 30,
            history_len: 6,
        }
    }
}

impl RoundConfig {
    pub fn min_delay(&self) -> Duration {
        Duration::from_secs(self.min_delay_secs)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_secs(self.max_delay_secs)
    }
}

/// Audio playback configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Whether to open an audio output device at all.
    pub enabled: bool,
    /// Background loop track, relative to `content.root_dir`.
    pub loop_track: String,
    /// One-shot cue played when the timer fires.
    pub cue_track: String,
    /// Start the session muted.
    pub start_muted: bool,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            loop_track: "assets/music-file.mp3".to_string(),
            cue_track: "assets/scream.mp3".to_string(),
            start_muted: false,
        }
    }
}

/// Gameplay defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Start the session with safe mode enabled.
    pub safe_mode: bool,
}
