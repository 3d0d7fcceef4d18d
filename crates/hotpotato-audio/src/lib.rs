//! Hot Potato audio crate - background loop and cue playback with mute.
//!
//! The [`AudioController`] owns two independent channels and the mute flag.
//! Actual output goes through an [`AudioBackend`]; playback is best-effort,
//! so backend failures are logged and swallowed rather than propagated.
//! Includes a recording mock for tests and a silent backend for running
//! without an output device.

use std::fmt;
use std::sync::{Arc, Mutex};

#[cfg(feature = "playback")]
pub mod rodio_backend;

#[cfg(feature = "playback")]
pub use rodio_backend::RodioBackend;

// =============================================================================
// Types
// =============================================================================

/// The two playback channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioChannel {
    /// Looping music while a round is running.
    Background,
    /// One-shot sound when the timer fires.
    Cue,
}

impl fmt::Display for AudioChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioChannel::Background => write!(f, "background"),
            AudioChannel::Cue => write!(f, "cue"),
        }
    }
}

/// Errors reported by audio backends.
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("No audio output device: {0}")]
    NoDevice(String),
    #[error("Failed to decode {path}: {reason}")]
    Decode { path: String, reason: String },
    #[error("Playback rejected on {channel} channel: {reason}")]
    Rejected {
        channel: AudioChannel,
        reason: String,
    },
    #[error("Audio thread unavailable")]
    Disconnected,
}

impl From<AudioError> for hotpotato_core::HotPotatoError {
    fn from(err: AudioError) -> Self {
        hotpotato_core::HotPotatoError::Audio(err.to_string())
    }
}

// =============================================================================
// Traits
// =============================================================================

/// Output device abstraction.
pub trait AudioBackend: Send {
    /// Start or resume a channel. `looping` repeats it until paused;
    /// `from_start` rewinds before playing.
    fn play(
        &mut self,
        channel: AudioChannel,
        looping: bool,
        from_start: bool,
    ) -> Result<(), AudioError>;

    /// Pause a channel, keeping its position.
    fn pause(&mut self, channel: AudioChannel) -> Result<(), AudioError>;

    /// Silence or unsilence both channels.
    fn set_muted(&mut self, muted: bool) -> Result<(), AudioError>;
}

impl<B: AudioBackend + ?Sized> AudioBackend for Box<B> {
    fn play(
        &mut self,
        channel: AudioChannel,
        looping: bool,
        from_start: bool,
    ) -> Result<(), AudioError> {
        (**self).play(channel, looping, from_start)
    }

    fn pause(&mut self, channel: AudioChannel) -> Result<(), AudioError> {
        (**self).pause(channel)
    }

    fn set_muted(&mut self, muted: bool) -> Result<(), AudioError> {
        (**self).set_muted(muted)
    }
}

// =============================================================================
// Controller
// =============================================================================

/// Owns both channels and the session's mute state.
///
/// Mute is independent of play/pause and is applied before every play call,
/// so it survives phase changes for the whole session.
pub struct AudioController<B: AudioBackend> {
    backend: B,
    muted: bool,
    background_playing: bool,
    cue_playing: bool,
}

impl<B: AudioBackend> fmt::Debug for AudioController<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioController")
            .field("muted", &self.muted)
            .field("background_playing", &self.background_playing)
            .field("cue_playing", &self.cue_playing)
            .finish()
    }
}

impl<B: AudioBackend> AudioController<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            muted: false,
            background_playing: false,
            cue_playing: false,
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Whether the last play request on `channel` succeeded and has not been
    /// paused since. A one-shot cue stays "playing" until paused.
    pub fn is_playing(&self, channel: AudioChannel) -> bool {
        match channel {
            AudioChannel::Background => self.background_playing,
            AudioChannel::Cue => self.cue_playing,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Start (or resume) the looping background channel.
    pub fn play_loop(&mut self) {
        self.apply_mute();
        let result = self.backend.play(AudioChannel::Background, true, false);
        self.set_playing(AudioChannel::Background, result.is_ok());
        Self::swallow("play_loop", result);
    }

    /// Rewind a channel and play it once.
    pub fn play_once(&mut self, channel: AudioChannel) {
        self.apply_mute();
        let result = self.backend.play(channel, false, true);
        self.set_playing(channel, result.is_ok());
        Self::swallow("play_once", result);
    }

    pub fn pause(&mut self, channel: AudioChannel) {
        let result = self.backend.pause(channel);
        self.set_playing(channel, false);
        Self::swallow("pause", result);
    }

    /// Pause both channels.
    pub fn pause_all(&mut self) {
        self.pause(AudioChannel::Background);
        self.pause(AudioChannel::Cue);
    }

    /// Change the mute flag and apply it to both channels immediately.
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.apply_mute();
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.set_muted(!self.muted);
        self.muted
    }

    fn set_playing(&mut self, channel: AudioChannel, playing: bool) {
        match channel {
            AudioChannel::Background => self.background_playing = playing,
            AudioChannel::Cue => self.cue_playing = playing,
        }
    }

    fn apply_mute(&mut self) {
        let result = self.backend.set_muted(self.muted);
        Self::swallow("set_muted", result);
    }

    fn swallow(operation: &str, result: Result<(), AudioError>) {
        if let Err(e) = result {
            tracing::debug!(operation, error = %e, "Audio call failed, continuing without sound");
        }
    }
}

// =============================================================================
// Backends
// =============================================================================

/// Backend that plays nothing. Used when audio is disabled or no device exists.
#[derive(Debug, Clone, Default)]
pub struct SilentBackend;

impl AudioBackend for SilentBackend {
    fn play(&mut self, channel: AudioChannel, looping: bool, _from_start: bool) -> Result<(), AudioError> {
        tracing::trace!(%channel, looping, "Silent play");
        Ok(())
    }

    fn pause(&mut self, _channel: AudioChannel) -> Result<(), AudioError> {
        Ok(())
    }

    fn set_muted(&mut self, _muted: bool) -> Result<(), AudioError> {
        Ok(())
    }
}

/// A call observed by [`MockAudioBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioCall {
    Play {
        channel: AudioChannel,
        looping: bool,
        from_start: bool,
        muted: bool,
    },
    Pause(AudioChannel),
    SetMuted(bool),
}

/// Recording backend for tests.
///
/// Clones share the call log, so a test can keep a handle after moving the
/// backend into a controller. `reject_play` simulates autoplay-policy
/// rejection.
#[derive(Debug, Clone, Default)]
pub struct MockAudioBackend {
    calls: Arc<Mutex<Vec<AudioCall>>>,
    muted: Arc<Mutex<bool>>,
    reject_play: bool,
}

impl MockAudioBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mock whose `play` always fails.
    pub fn rejecting() -> Self {
        Self {
            reject_play: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<AudioCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Play calls only, in order.
    pub fn plays(&self) -> Vec<AudioCall> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, AudioCall::Play { .. }))
            .collect()
    }

    pub fn clear(&self) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.clear();
        }
    }

    fn record(&self, call: AudioCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    fn is_muted(&self) -> bool {
        self.muted.lock().map(|m| *m).unwrap_or(false)
    }
}

impl AudioBackend for MockAudioBackend {
    fn play(&mut self, channel: AudioChannel, looping: bool, from_start: bool) -> Result<(), AudioError> {
        let muted = self.is_muted();
        self.record(AudioCall::Play {
            channel,
            looping,
            from_start,
            muted,
        });
        if self.reject_play {
            return Err(AudioError::Rejected {
                channel,
                reason: "playback requires a user gesture".to_string(),
            });
        }
        Ok(())
    }

    fn pause(&mut self, channel: AudioChannel) -> Result<(), AudioError> {
        self.record(AudioCall::Pause(channel));
        Ok(())
    }

    fn set_muted(&mut self, muted: bool) -> Result<(), AudioError> {
        if let Ok(mut m) = self.muted.lock() {
            *m = muted;
        }
        self.record(AudioCall::SetMuted(muted));
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
