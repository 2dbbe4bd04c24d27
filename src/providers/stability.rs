//! Stability AI provider placeholder.
//!
//! The identifier is registered so the selector can offer it, but the
//! integration is not wired up yet: every call resolves to the fixed
//! not-yet-available failure, whatever the parameters.
//!
//! TODO: implement against the Stability REST API once an account/key
//! strategy is decided.

use crate::error::{Result, WeaverError};
use crate::provider::ImageProvider;
use crate::types::{GeneratedImage, GenerationParams, ProviderKind};
use async_trait::async_trait;

/// Stability AI image generation provider (unimplemented).
#[derive(Debug, Clone, Copy, Default)]
pub struct StabilityProvider;

impl StabilityProvider {
    /// Creates the placeholder provider.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ImageProvider for StabilityProvider {
    async fn generate(&self, _params: &GenerationParams) -> Result<Vec<GeneratedImage>> {
        Err(WeaverError::ProviderUnavailable("Stability AI".into()))
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Stability
    }
}
