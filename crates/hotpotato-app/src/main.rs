//! Hot Potato binary - composition root.
//!
//! 1. Parse CLI flags and load configuration from TOML
//! 2. Build the content fetcher, preference store and audio backend
//! 3. Initialise the game engine
//! 4. Run a single event loop over stdin lines, round timer firings and Ctrl-C

mod cli;
mod render;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::io::{AsyncBufReadExt, BufReader};

use hotpotato_audio::{AudioBackend, SilentBackend};
use hotpotato_content::{DirFetcher, LocaleStore};
use hotpotato_core::config::HotPotatoConfig;
use hotpotato_core::events::GameEvent;
use hotpotato_core::prefs::FilePreferenceStore;
use hotpotato_game::{Command, GameEngine, GameSettings, TokioScheduler};

use crate::cli::{CliArgs, ConfigSource};

/// Expand ~ to home directory in a path string.
fn resolve_dir(dir: &str) -> PathBuf {
    if dir.starts_with("~/") || dir.starts_with("~\\") {
        #[cfg(target_os = "windows")]
        let home = std::env::var("USERPROFILE").unwrap_or_else(|_| ".".to_string());
        #[cfg(not(target_os = "windows"))]
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(&dir[2..])
    } else {
        PathBuf::from(dir)
    }
}

/// Open the output device, or fall back to silence.
fn open_audio(config: &HotPotatoConfig, content_root: &Path) -> Box<dyn AudioBackend> {
    if !config.audio.enabled {
        tracing::info!("Audio disabled in config");
        return Box::new(SilentBackend);
    }

    #[cfg(feature = "playback")]
    {
        let loop_track = content_root.join(&config.audio.loop_track);
        let cue_track = content_root.join(&config.audio.cue_track);
        match hotpotato_audio::RodioBackend::open(loop_track, cue_track) {
            Ok(backend) => return Box::new(backend),
            Err(e) => tracing::warn!(error = %e, "Audio unavailable, continuing without sound"),
        }
    }

    #[cfg(not(feature = "playback"))]
    {
        let _ = content_root;
        tracing::info!("Built without the `playback` feature, continuing without sound");
    }

    Box::new(SilentBackend)
}

fn log_events(events: Vec<GameEvent>) {
    for event in events {
        match serde_json::to_string(&event) {
            Ok(json) => tracing::debug!(target: "hotpotato::events", event = %json, "Game event"),
            Err(e) => tracing::debug!(error = %e, "Unserialisable game event"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config. The log level lives in the file, so the outcome is reported
    // once the subscriber is up.
    let config_file = args.resolve_config_path();
    let (mut config, source) = cli::load_config(&config_file);
    args.apply_overrides(&mut config);

    // Tracing. Logs go to stderr so they never interleave with the game screen.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.general.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting Hot Potato v{}", env!("CARGO_PKG_VERSION"));
    match source {
        ConfigSource::File => {
            tracing::info!(path = %config_file.display(), "Configuration loaded");
        }
        ConfigSource::Missing => {
            tracing::info!(path = %config_file.display(), "No configuration file, using defaults");
        }
        ConfigSource::Invalid(e) => {
            tracing::warn!(path = %config_file.display(), error = %e, "Failed to load config, using defaults");
        }
    }
    config.validate()?;

    let content_root = resolve_dir(&config.content.root_dir);
    let data_dir = resolve_dir(&config.general.data_dir);
    tracing::info!(
        content = %content_root.display(),
        data = %data_dir.display(),
        "Directories resolved"
    );

    let settings = GameSettings::from_config(&config)?;
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let (scheduler, mut timer_rx) = TokioScheduler::new();

    let mut engine = GameEngine::new(
        LocaleStore::new(Arc::new(DirFetcher::new(&content_root))),
        Box::new(FilePreferenceStore::in_dir(&data_dir)),
        open_audio(&config, &content_root),
        scheduler,
        rng,
        settings,
    );
    engine.init().await;

    if let Some(ref code) = args.lang {
        let command: Command = format!("lang {}", code).parse()?;
        engine.execute(command).await?;
    }

    log_events(engine.drain_events());
    println!("{}", render::render(&engine.view()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to read input");
                        break;
                    }
                };
                match line.parse::<Command>() {
                    Ok(Command::Quit) => break,
                    Ok(Command::Help) => {
                        println!("{}", render::HELP);
                        continue;
                    }
                    Ok(command) => {
                        if let Err(e) = engine.execute(command).await {
                            tracing::debug!(error = %e, "Command rejected");
                            println!("! {}", e);
                        }
                    }
                    Err(e) => {
                        println!("! {} (type `help`)", e);
                        continue;
                    }
                }
            }
            Some(token) = timer_rx.recv() => {
                if !engine.on_timer_fired(token) {
                    continue;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                break;
            }
        }

        log_events(engine.drain_events());
        println!("{}", render::render(&engine.view()));
    }

    log_events(engine.drain_events());
    tracing::info!(
        session_id = %engine.session().id,
        rounds = engine.session().round,
        "Session ended"
    );
    Ok(())
}
