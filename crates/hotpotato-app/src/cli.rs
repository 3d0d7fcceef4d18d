//! CLI argument definitions for the Hot Potato binary.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::{Path, PathBuf};

use hotpotato_core::config::HotPotatoConfig;
use hotpotato_core::HotPotatoError;

/// Hot Potato - a pass-the-phone party game for the terminal.
#[derive(Parser, Debug)]
#[command(name = "hotpotato", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Directory containing `locales/` and `assets/`.
    #[arg(long = "content-dir")]
    pub content_dir: Option<PathBuf>,

    /// Directory holding the stored language preference.
    #[arg(short = 'd', long = "data-dir")]
    pub data_dir: Option<PathBuf>,

    /// Choose this language right away (en, el, bg, mk, sq).
    #[arg(long = "lang")]
    pub lang: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Start with safe mode on.
    #[arg(long = "safe-mode")]
    pub safe_mode: bool,

    /// Start muted.
    #[arg(long = "mute")]
    pub mute: bool,

    /// Never open an audio device.
    #[arg(long = "no-audio")]
    pub no_audio: bool,

    /// Seed for the random source, for reproducible sessions.
    #[arg(long = "seed")]
    pub seed: Option<u64>,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > HOTPOTATO_CONFIG env var > ~/.hotpotato/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("HOTPOTATO_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Write every flag that was given over the loaded configuration.
    pub fn apply_overrides(&self, config: &mut HotPotatoConfig) {
        if let Some(ref dir) = self.content_dir {
            config.content.root_dir = dir.to_string_lossy().to_string();
        }
        if let Some(ref dir) = self.data_dir {
            config.general.data_dir = dir.to_string_lossy().to_string();
        }
        if let Some(ref level) = self.log_level {
            config.general.log_level = level.clone();
        }
        if self.safe_mode {
            config.game.safe_mode = true;
        }
        if self.mute {
            config.audio.start_muted = true;
        }
        if self.no_audio {
            config.audio.enabled = false;
        }
    }
}

/// Where the configuration came from.
#[derive(Debug)]
pub enum ConfigSource {
    /// Read and validated from the file.
    File,
    /// No file at the path; defaults are used.
    Missing,
    /// The file exists but could not be parsed or failed validation;
    /// defaults are used.
    Invalid(HotPotatoError),
}

/// Read the configuration file, falling back to defaults.
///
/// Nothing is logged here since this runs before the tracing subscriber
/// exists; the caller reports the returned [`ConfigSource`].
pub fn load_config(path: &Path) -> (HotPotatoConfig, ConfigSource) {
    if !path.exists() {
        return (HotPotatoConfig::default(), ConfigSource::Missing);
    }
    match HotPotatoConfig::load(path) {
        Ok(config) => (config, ConfigSource::File),
        Err(e) => (HotPotatoConfig::default(), ConfigSource::Invalid(e)),
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".hotpotato").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".hotpotato").join("config.toml");
    }
    PathBuf::from("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_config_path_wins() {
        let args = CliArgs::parse_from(["hotpotato", "--config", "/tmp/hp.toml"]);
        assert_eq!(args.resolve_config_path(), PathBuf::from("/tmp/hp.toml"));
    }

    #[test]
    fn test_overrides_apply_only_given_flags() {
        let args = CliArgs::parse_from([
            "hotpotato",
            "--content-dir",
            "/srv/hp",
            "--safe-mode",
            "--no-audio",
        ]);
        let mut config = HotPotatoConfig::default();
        args.apply_overrides(&mut config);

        assert_eq!(config.content.root_dir, "/srv/hp");
        assert!(config.game.safe_mode);
        assert!(!config.audio.enabled);
        assert!(!config.audio.start_muted);
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_load_config_reports_broken_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "round = [[[ broken").unwrap();

        let (config, source) = load_config(&path);
        assert!(matches!(source, ConfigSource::Invalid(HotPotatoError::Config(_))));
        assert_eq!(config.round.max_delay_secs, 30);
    }

    #[test]
    fn test_load_config_reports_failed_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[round]\nhistory_len = 0\n").unwrap();

        let (config, source) = load_config(&path);
        assert!(matches!(source, ConfigSource::Invalid(_)));
        assert_eq!(config.round.history_len, 6);
    }

    #[test]
    fn test_load_config_missing_and_valid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let (_, source) = load_config(&path);
        assert!(matches!(source, ConfigSource::Missing));

        std::fs::write(&path, "[game]\nsafe_mode = true\n").unwrap();
        let (config, source) = load_config(&path);
        assert!(matches!(source, ConfigSource::File));
        assert!(config.game.safe_mode);
    }

    #[test]
    fn test_parse_seed_and_lang() {
        let args = CliArgs::parse_from(["hotpotato", "--seed", "42", "--lang", "el"]);
        assert_eq!(args.seed, Some(42));
        assert_eq!(args.lang.as_deref(), Some("el"));
    }
}
