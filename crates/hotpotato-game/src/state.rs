//! Phase state machine.
//!
//! Valid transitions:
//! - Lang -> Intro (language chosen)
//! - Intro -> Playing (start)
//! - Playing -> Prompt (timer fired)
//! - Playing -> Intro (manual stop)
//! - Prompt -> Prompt (skip, re-entrant)
//! - Prompt -> Intro (next round, immediately followed by start)
//! - any -> Lang (language change requested)

use std::fmt;

use hotpotato_core::types::Phase;

use crate::error::GameError;

/// Inputs that may move the phase machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    ChooseLanguage,
    Start,
    TimerFired,
    Stop,
    Skip,
    NextRound,
    ChangeLanguage,
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::ChooseLanguage => write!(f, "choose_language"),
            Trigger::Start => write!(f, "start"),
            Trigger::TimerFired => write!(f, "timer_fired"),
            Trigger::Stop => write!(f, "stop"),
            Trigger::Skip => write!(f, "skip"),
            Trigger::NextRound => write!(f, "next_round"),
            Trigger::ChangeLanguage => write!(f, "change_language"),
        }
    }
}

impl Trigger {
    /// Phase reached by firing this trigger in `from`, or `None` if the
    /// trigger is not valid there.
    pub fn target(self, from: Phase) -> Option<Phase> {
        match (from, self) {
            (Phase::Lang, Trigger::ChooseLanguage) => Some(Phase::Intro),
            (Phase::Intro, Trigger::Start) => Some(Phase::Playing),
            (Phase::Playing, Trigger::TimerFired) => Some(Phase::Prompt),
            (Phase::Playing, Trigger::Stop) => Some(Phase::Intro),
            (Phase::Prompt, Trigger::Skip) => Some(Phase::Prompt),
            (Phase::Prompt, Trigger::NextRound) => Some(Phase::Intro),
            (_, Trigger::ChangeLanguage) => Some(Phase::Lang),
            _ => None,
        }
    }
}

/// Holds the single active phase and validates every change.
#[derive(Debug, Clone)]
pub struct PhaseMachine {
    phase: Phase,
}

impl PhaseMachine {
    pub fn new(initial: Phase) -> Self {
        Self { phase: initial }
    }

    pub fn current(&self) -> Phase {
        self.phase
    }

    /// Check a trigger without applying it.
    pub fn check(&self, trigger: Trigger) -> Result<Phase, GameError> {
        trigger.target(self.phase).ok_or(GameError::InvalidTrigger {
            phase: self.phase,
            trigger,
        })
    }

    /// Apply a trigger, returning the new phase. The phase is unchanged on
    /// error. Triggers are the only way to move the machine.
    pub fn fire(&mut self, trigger: Trigger) -> Result<Phase, GameError> {
        let target = self.check(trigger)?;
        tracing::debug!("Phase: {} -> {}", self.phase, target);
        self.phase = target;
        Ok(target)
    }
}

// =============================================================================
// Tests
// =============================================================================
