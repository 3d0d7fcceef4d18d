//! Decorative image pool shown while playing and on the prompt screen.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::fetch::ResourceFetcher;

/// Optional manifest listing the image files.
pub const IMAGE_MANIFEST: &str = "assets/gifs/index.json";

/// Directory the image files live in.
pub const IMAGE_DIR: &str = "assets/gifs";

/// Number of `gifN.gif` files assumed when there is no manifest.
pub const DEFAULT_IMAGE_COUNT: usize = 30;

/// The set of decorative image files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaLibrary {
    images: Vec<String>,
}

impl MediaLibrary {
    pub fn from_files(images: Vec<String>) -> Self {
        Self { images }
    }

    /// Naming convention used without a manifest: `gif1.gif` .. `gif30.gif`.
    pub fn conventional() -> Self {
        Self::from_files(
            (1..=DEFAULT_IMAGE_COUNT)
                .map(|i| format!("gif{}.gif", i))
                .collect(),
        )
    }

    /// Read the manifest if one exists and parses, else use the naming convention.
    pub async fn discover(fetcher: &dyn ResourceFetcher) -> Self {
        match fetcher.fetch(IMAGE_MANIFEST).await {
            Ok(bytes) => match serde_json::from_slice::<Vec<String>>(&bytes) {
                Ok(images) => {
                    tracing::info!(count = images.len(), "Image manifest loaded");
                    Self::from_files(images)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Image manifest malformed, using default names");
                    Self::conventional()
                }
            },
            Err(e) => {
                tracing::debug!(error = %e, "No image manifest, using default names");
                Self::conventional()
            }
        }
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    /// A random image path relative to the content root.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<String> {
        self.images
            .choose(rng)
            .map(|file| format!("{}/{}", IMAGE_DIR, file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::MemoryFetcher;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_conventional_names() {
        let lib = MediaLibrary::conventional();
        assert_eq!(lib.images().len(), 30);
        assert_eq!(lib.images()[0], "gif1.gif");
        assert_eq!(lib.images()[29], "gif30.gif");
    }

    #[tokio::test]
    async fn test_discover_uses_manifest() {
        let fetcher = MemoryFetcher::new();
        fetcher.insert(IMAGE_MANIFEST, r#"["boom.gif", "spin.gif"]"#);
        let lib = MediaLibrary::discover(&fetcher).await;
        assert_eq!(lib.images(), &["boom.gif".to_string(), "spin.gif".to_string()]);
    }

    #[tokio::test]
    async fn test_discover_without_manifest() {
        let lib = MediaLibrary::discover(&MemoryFetcher::new()).await;
        assert_eq!(lib, MediaLibrary::conventional());
    }

    #[tokio::test]
    async fn test_discover_with_malformed_manifest() {
        let fetcher = MemoryFetcher::new();
        fetcher.insert(IMAGE_MANIFEST, "{}");
        let lib = MediaLibrary::discover(&fetcher).await;
        assert_eq!(lib.images().len(), DEFAULT_IMAGE_COUNT);
    }

    #[test]
    fn test_pick_builds_asset_path() {
        let lib = MediaLibrary::from_files(vec!["only.gif".to_string()]);
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(lib.pick(&mut rng), Some("assets/gifs/only.gif".to_string()));
        assert_eq!(MediaLibrary::default().pick(&mut rng), None);
    }
}
