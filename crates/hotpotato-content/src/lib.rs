//! Hot Potato content crate - locale bundles, prompt content and media assets.
//!
//! Everything the game reads from disk (or any other fetchable source) goes
//! through a [`ResourceFetcher`]. Locale bundles are validated into a typed
//! schema at load time; a failed load keeps the previously active bundle.

pub mod bundle;
pub mod error;
pub mod fetch;
pub mod media;
pub mod pool;
pub mod store;

pub use bundle::{LocaleBundle, UiText};
pub use error::LoadError;
pub use fetch::{DirFetcher, MemoryFetcher, ResourceFetcher};
pub use media::MediaLibrary;
pub use pool::ContentPool;
pub use store::LocaleStore;
