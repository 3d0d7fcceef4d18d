//! Error types for the game engine.

use hotpotato_core::types::Phase;

use crate::state::Trigger;

/// Errors from game commands. None of them change the session state.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("Trigger `{trigger}` is not valid in phase {phase}")]
    InvalidTrigger { phase: Phase, trigger: Trigger },
    #[error("Unknown category: {0}")]
    UnknownCategory(String),
    #[error("Category is locked by safe mode: {0}")]
    CategoryLocked(String),
    #[error("Unknown language: {0}")]
    UnknownLanguage(String),
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
}
