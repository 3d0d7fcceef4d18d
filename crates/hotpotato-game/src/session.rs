//! Session state owned by the game engine.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use hotpotato_content::ContentPool;
use hotpotato_core::types::{is_sensitive, Phase, Prompt};

use crate::selection::SelectionEngine;
use crate::state::PhaseMachine;

/// What the prompt screen currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PromptSlot {
    #[default]
    Nothing,
    Shown(Prompt),
    /// The eligible pool was empty when a prompt was requested.
    Empty,
}

/// Everything that lives for one session and nothing else.
///
/// Mute lives with the audio controller; the locale bundle lives with the
/// locale store.
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Unique identifier for this session.
    pub id: Uuid,
    /// When the session was created.
    pub started_at: DateTime<Utc>,
    pub(crate) phases: PhaseMachine,
    /// Rounds started so far. Never reset.
    pub round: u64,
    pub(crate) enabled: HashSet<String>,
    categories_initialized: bool,
    pub(crate) selection: SelectionEngine,
    pub safe_mode: bool,
    pub support_open: bool,
    /// Latest live-region announcement.
    pub announcement: Option<String>,
    pub(crate) prompt: PromptSlot,
    /// Decorative image path for the playing and prompt screens.
    pub decoration: Option<String>,
}

impl SessionState {
    pub fn new(initial: Phase, safe_mode: bool, history_len: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            phases: PhaseMachine::new(initial),
            round: 0,
            enabled: HashSet::new(),
            categories_initialized: false,
            selection: SelectionEngine::new(history_len),
            safe_mode,
            support_open: false,
            announcement: None,
            prompt: PromptSlot::Nothing,
            decoration: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phases.current()
    }

    pub fn enabled_categories(&self) -> &HashSet<String> {
        &self.enabled
    }

    pub fn selection(&self) -> &SelectionEngine {
        &self.selection
    }

    pub fn prompt(&self) -> &PromptSlot {
        &self.prompt
    }

    /// Fill the enabled set with every non-sensitive category, once.
    ///
    /// Does nothing after the first successful fill, so later user choices
    /// (including disabling everything) are kept. A pool without categories
    /// does not count as a fill.
    pub fn ensure_categories(&mut self, pool: &ContentPool) {
        if self.categories_initialized || !self.enabled.is_empty() {
            return;
        }
        let keys = pool.categories(true);
        if pool.all_categories().is_empty() {
            return;
        }
        self.enabled = keys.into_iter().map(str::to_string).collect();
        self.categories_initialized = true;
        tracing::debug!(count = self.enabled.len(), "Enabled categories initialised");
    }

    /// Enabled and not hidden by safe mode.
    pub fn is_checked(&self, key: &str) -> bool {
        self.enabled.contains(key) && !self.is_locked(key)
    }

    /// Sensitive while safe mode is on.
    pub fn is_locked(&self, key: &str) -> bool {
        self.safe_mode && is_sensitive(key)
    }
}
