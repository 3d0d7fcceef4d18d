//! Prompt selection with a bounded recent-history.

use std::collections::{HashSet, VecDeque};

use rand::seq::SliceRandom;
use rand::Rng;

use hotpotato_content::ContentPool;
use hotpotato_core::types::{Prompt, PromptId};

/// Default number of recent prompts excluded from the next pick.
pub const DEFAULT_HISTORY_LEN: usize = 6;

/// FIFO of the most recently shown prompt identities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentHistory {
    ids: VecDeque<PromptId>,
    capacity: usize,
}

impl Default for RecentHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LEN)
    }
}

impl RecentHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            ids: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &PromptId) -> bool {
        self.ids.contains(id)
    }

    /// Append an identity, evicting the oldest once over capacity.
    pub fn push(&mut self, id: PromptId) {
        self.ids.push_back(id);
        while self.ids.len() > self.capacity {
            self.ids.pop_front();
        }
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &PromptId> {
        self.ids.iter()
    }
}

/// Every prompt of every enabled category, in category order.
///
/// Sensitive categories are skipped when `safe_mode` is on, even if they
/// are in `enabled`.
pub fn eligible_prompts(
    pool: &ContentPool,
    enabled: &HashSet<String>,
    safe_mode: bool,
) -> Vec<Prompt> {
    pool.categories(safe_mode)
        .into_iter()
        .filter(|key| enabled.contains(*key))
        .flat_map(|key| pool.prompts(key).iter().cloned())
        .collect()
}

/// Picks prompts uniformly at random while avoiding recent repeats.
#[derive(Debug, Clone, Default)]
pub struct SelectionEngine {
    history: RecentHistory,
}

impl SelectionEngine {
    pub fn new(history_len: usize) -> Self {
        Self {
            history: RecentHistory::new(history_len),
        }
    }

    pub fn history(&self) -> &RecentHistory {
        &self.history
    }

    /// Pick from the eligible prompts of `pool`.
    pub fn pick<R: Rng + ?Sized>(
        &mut self,
        pool: &ContentPool,
        enabled: &HashSet<String>,
        safe_mode: bool,
        rng: &mut R,
    ) -> Option<Prompt> {
        let eligible = eligible_prompts(pool, enabled, safe_mode);
        self.pick_from(eligible, rng)
    }

    /// Pick from an explicit candidate pool.
    ///
    /// Prompts in the recent history are excluded unless that would leave
    /// nothing, in which case the whole pool is used again. Returns `None`
    /// only for an empty pool.
    pub fn pick_from<R: Rng + ?Sized>(&mut self, pool: Vec<Prompt>, rng: &mut R) -> Option<Prompt> {
        if pool.is_empty() {
            return None;
        }
        let fresh: Vec<&Prompt> = pool
            .iter()
            .filter(|p| !self.history.contains(&p.id))
            .collect();
        let chosen = if fresh.is_empty() {
            tracing::debug!(pool = pool.len(), "Every eligible prompt is recent, reusing full pool");
            pool.choose(rng)
        } else {
            fresh.choose(rng).copied()
        }?
        .clone();
        self.history.push(chosen.id.clone());
        Some(chosen)
    }
}
