//! Image provider trait.

use crate::error::Result;
use crate::types::{GeneratedImage, GenerationParams, ProviderKind};
use async_trait::async_trait;

/// Trait for image generation providers.
///
/// A provider turns one set of [`GenerationParams`] into an ordered,
/// non-empty batch of images, or fails. One attempt per call; any retry
/// policy belongs to the caller's own external-call semantics.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Generates images from the given parameters.
    async fn generate(&self, params: &GenerationParams) -> Result<Vec<GeneratedImage>>;

    /// Returns the kind of this provider.
    fn kind(&self) -> ProviderKind;

    /// Returns the name of this provider for display.
    fn name(&self) -> &str {
        match self.kind() {
            ProviderKind::Gemini => "Gemini (Google)",
            ProviderKind::Stability => "Stability AI",
        }
    }
}
