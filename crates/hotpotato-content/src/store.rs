//! Locale store holding the process-wide active bundle.

use std::sync::Arc;

use hotpotato_core::types::Language;

use crate::bundle::LocaleBundle;
use crate::error::LoadError;
use crate::fetch::ResourceFetcher;
use crate::pool::ContentPool;

/// Path of a language's bundle relative to the content root.
pub fn bundle_path(language: Language) -> String {
    format!("locales/{}.json", language.code())
}

/// Loads locale bundles and keeps the last good one active.
///
/// Until the first successful load the active bundle is the built-in
/// default, so lookups always have something consistent to read.
pub struct LocaleStore {
    fetcher: Arc<dyn ResourceFetcher>,
    active: Arc<LocaleBundle>,
}

impl std::fmt::Debug for LocaleStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocaleStore")
            .field("active_language", &self.active.language())
            .finish()
    }
}

impl LocaleStore {
    pub fn new(fetcher: Arc<dyn ResourceFetcher>) -> Self {
        Self {
            fetcher,
            active: Arc::new(LocaleBundle::builtin(Language::default())),
        }
    }

    pub fn fetcher(&self) -> &Arc<dyn ResourceFetcher> {
        &self.fetcher
    }

    /// Fetch and validate the bundle for `language`.
    ///
    /// On success the bundle replaces the active one. On failure the active
    /// bundle is left untouched and the error is returned.
    pub async fn load(&mut self, language: Language) -> Result<Arc<LocaleBundle>, LoadError> {
        let path = bundle_path(language);
        let bytes = self.fetcher.fetch(&path).await?;
        let bundle = Arc::new(LocaleBundle::from_slice(language, &path, &bytes)?);
        tracing::info!(
            language = %language,
            categories = bundle.categories().len(),
            "Locale bundle loaded"
        );
        self.active = Arc::clone(&bundle);
        Ok(bundle)
    }

    pub fn active(&self) -> &Arc<LocaleBundle> {
        &self.active
    }

    /// Language of the active bundle (the display-language attribute).
    pub fn language(&self) -> Language {
        self.active.language()
    }

    /// Dotted-key lookup against the active bundle.
    pub fn t(&self, key: &str, fallback: Option<&str>) -> String {
        self.active.t(key, fallback)
    }

    /// Content view over the active bundle.
    pub fn pool(&self) -> ContentPool {
        ContentPool::new(Arc::clone(&self.active))
    }
}
