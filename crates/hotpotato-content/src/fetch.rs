//! Resource fetching.
//!
//! The game only depends on "fetch succeeds or fails" semantics. Whatever
//! sits in front of the real source (a cache, a bundle, the network) is the
//! fetcher implementation's business.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::LoadError;

/// Source of raw resource bytes, addressed by a `/`-separated relative path.
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, LoadError>;
}

/// Fetches resources from a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct DirFetcher {
    root: PathBuf,
}

impl DirFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, LoadError> {
        let relative = Path::new(path.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(LoadError::unreachable(path, "path escapes content root"));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ResourceFetcher for DirFetcher {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, LoadError> {
        let full = self.resolve(path)?;
        let bytes = tokio::fs::read(&full)
            .await
            .map_err(|e| LoadError::unreachable(path, e))?;
        tracing::debug!(path, bytes = bytes.len(), "Resource fetched");
        Ok(bytes)
    }
}

/// In-memory fetcher for tests. Clones share the same resource table.
#[derive(Debug, Clone, Default)]
pub struct MemoryFetcher {
    resources: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: &str, bytes: impl Into<Vec<u8>>) {
        if let Ok(mut guard) = self.resources.lock() {
            guard.insert(path.to_string(), bytes.into());
        }
    }

    pub fn remove(&self, path: &str) {
        if let Ok(mut guard) = self.resources.lock() {
            guard.remove(path);
        }
    }
}

#[async_trait]
impl ResourceFetcher for MemoryFetcher {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, LoadError> {
        let guard = self
            .resources
            .lock()
            .map_err(|e| LoadError::unreachable(path, format!("fetcher mutex poisoned: {}", e)))?;
        guard
            .get(path)
            .cloned()
            .ok_or_else(|| LoadError::unreachable(path, "not found"))
    }
}
