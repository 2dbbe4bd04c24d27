//! Provider registry and dispatch.
//!
//! Providers are registered under string identifiers and selected at runtime
//! by lookup, so adding a service means one `register` call instead of
//! another arm in a growing conditional.

use crate::error::{Result, WeaverError};
use crate::provider::ImageProvider;
use crate::types::{GeneratedImage, GenerationParams};
use std::collections::HashMap;
use std::sync::Arc;

/// Runtime map from provider identifier to implementation.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn ImageProvider>>,
}

impl ProviderRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a provider under the given identifier, replacing any
    /// previous registration.
    pub fn register(&mut self, id: impl Into<String>, provider: Arc<dyn ImageProvider>) {
        self.providers.insert(id.into(), provider);
    }

    /// Looks up a provider by identifier.
    pub fn get(&self, id: &str) -> Option<&Arc<dyn ImageProvider>> {
        self.providers.get(id)
    }

    /// Returns the registered identifiers, sorted for stable display.
    pub fn provider_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.providers.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Dispatches one generation request to the provider registered under
    /// `id`, returning its outcome unchanged.
    ///
    /// Unknown identifiers fail with [`WeaverError::UnknownProvider`]
    /// carrying the literal identifier. No retries, single attempt.
    pub async fn dispatch(
        &self,
        id: &str,
        params: &GenerationParams,
    ) -> Result<Vec<GeneratedImage>> {
        let provider = self
            .providers
            .get(id)
            .ok_or_else(|| WeaverError::UnknownProvider(id.to_string()))?;

        tracing::debug!(provider = id, prompt_len = params.prompt.len(), "dispatching");
        provider.generate(params).await
    }
}
