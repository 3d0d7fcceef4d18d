//! Category and prompt content of the active bundle.

use std::sync::Arc;

use hotpotato_core::types::{is_sensitive, Category, Prompt};

use crate::bundle::LocaleBundle;

/// Read-only view over the active bundle's categories and prompts.
///
/// Cheap to clone; it lives exactly as long as the bundle it was built from.
#[derive(Debug, Clone)]
pub struct ContentPool {
    bundle: Arc<LocaleBundle>,
}

impl ContentPool {
    pub fn new(bundle: Arc<LocaleBundle>) -> Self {
        Self { bundle }
    }

    pub fn bundle(&self) -> &LocaleBundle {
        &self.bundle
    }

    /// All categories in bundle order, including sensitive ones.
    pub fn all_categories(&self) -> &[Category] {
        self.bundle.categories()
    }

    /// Category keys in bundle order, minus the sensitive set when `safe_mode`.
    pub fn categories(&self, safe_mode: bool) -> Vec<&str> {
        self.bundle
            .categories()
            .iter()
            .map(|c| c.key.as_str())
            .filter(|key| !safe_mode || !is_sensitive(key))
            .collect()
    }

    pub fn category_label(&self, key: &str) -> Option<&str> {
        self.bundle.category_label(key)
    }

    pub fn prompts(&self, category: &str) -> &[Prompt] {
        self.bundle.prompts(category)
    }

    pub fn prompts_by_category(&self) -> impl Iterator<Item = (&str, &[Prompt])> {
        self.bundle.prompts_by_category()
    }
}
