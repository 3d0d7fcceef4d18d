use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{Language, Phase, PromptId};

/// Domain events emitted by the game engine after each state change.
///
/// The binary drains them after every handled command and logs them; tests
/// use them to assert on side effects without inspecting audio or timers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[non_exhaustive]
pub enum GameEvent {
    /// A new session was created.
    SessionStarted {
        session_id: Uuid,
        phase: Phase,
        timestamp: DateTime<Utc>,
    },

    /// The active phase changed.
    PhaseChanged {
        from: Phase,
        to: Phase,
    },

    /// A locale bundle became active.
    LanguageChanged {
        language: Language,
    },

    /// A locale bundle failed to load and the previous one was kept.
    LanguageLoadFailed {
        language: Language,
        reason: String,
    },

    /// A round started and the timer was armed.
    RoundStarted {
        round: u64,
        delay_ms: u64,
    },

    /// The round was stopped manually before the timer fired.
    RoundStopped {
        round: u64,
    },

    /// A prompt is on screen.
    PromptShown {
        round: u64,
        prompt_id: PromptId,
        category: String,
    },

    /// The timer fired but no prompt was eligible.
    NoPromptAvailable {
        round: u64,
    },

    /// Safe mode was toggled.
    SafeModeChanged {
        enabled: bool,
    },

    /// A category was enabled or disabled by the user.
    CategoryToggled {
        key: String,
        enabled: bool,
    },

    /// Mute was toggled.
    MuteChanged {
        muted: bool,
    },
}
