#![warn(missing_docs)]
//! ImageWeaver - text-to-image generation client.
//!
//! This crate provides the reusable core of an image-generation studio:
//! style presets, runtime provider routing, and a rendering-agnostic
//! request lifecycle that any front end (CLI included) can drive.
//!
//! # Quick Start
//!
//! ```no_run
//! use imageweaver::{GenerationSession, ProviderRegistry, StylePreset};
//! use imageweaver::providers::{GeminiProvider, StabilityProvider};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> imageweaver::Result<()> {
//!     let mut registry = ProviderRegistry::new();
//!     registry.register("gemini", Arc::new(GeminiProvider::builder().build()?));
//!     registry.register("stability", Arc::new(StabilityProvider::new()));
//!
//!     let mut session = GenerationSession::new();
//!     session.prompt = "a golden retriever puppy".to_string();
//!     session.style = StylePreset::Watercolor;
//!     session.submit(&registry).await;
//!
//!     if let Some(locators) = session.images() {
//!         println!("{} image(s) generated", locators.len());
//!     }
//!     Ok(())
//! }
//! ```

mod error;
pub mod provider;
pub mod providers;
mod registry;
mod session;
mod style;
mod types;

pub use error::{Result, WeaverError};
pub use provider::ImageProvider;
pub use registry::ProviderRegistry;
pub use session::{
    GenerationSession, PreparedRequest, RequestSnapshot, SessionState, MAX_IMAGES, MIN_IMAGES,
};
pub use style::StylePreset;
pub use types::{
    decode_data_url, AspectRatio, GeneratedImage, GenerationMetadata, GenerationParams,
    ImageFormat, ProviderKind,
};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{Result, WeaverError};
    pub use crate::provider::ImageProvider;
    pub use crate::providers::{GeminiProvider, StabilityProvider};
    pub use crate::registry::ProviderRegistry;
    pub use crate::session::{GenerationSession, SessionState};
    pub use crate::style::StylePreset;
    pub use crate::types::{AspectRatio, GeneratedImage, GenerationParams};
}
