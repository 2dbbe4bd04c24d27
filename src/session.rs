//! Generation request lifecycle.
//!
//! [`GenerationSession`] owns the live form state and drives one request at
//! a time through `Idle -> Pending -> Succeeded | Failed`. It is an explicit
//! owned state object with no rendering dependencies, so the whole state
//! machine is unit-testable in isolation.
//!
//! Submission splits into a synchronous `begin` phase (guards, validation,
//! snapshot, parameter assembly) and a `complete` phase that reconciles the
//! provider outcome, with [`GenerationSession::submit`] tying the two
//! together around the one dispatch await point. Because `submit` takes
//! `&mut self`, requests are strictly serialized; there is no cancellation.

use crate::registry::ProviderRegistry;
use crate::style::StylePreset;
use crate::types::{AspectRatio, GeneratedImage, GenerationParams};

const SEED_MESSAGE: &str = "Seed must be a valid number";
const FALLBACK_ERROR: &str = "An unexpected error occurred.";
const DEFAULT_PROMPT: &str =
    "a stunning photo of an astronaut riding a horse on mars, cinematic lighting";

/// Image count range the form's slider allows.
pub const MIN_IMAGES: u8 = 1;
/// See [`MIN_IMAGES`].
pub const MAX_IMAGES: u8 = 4;

/// Parameters captured at submission time, displayed against the results
/// even if the live form is edited afterward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSnapshot {
    /// Raw prompt with the style modifier appended.
    pub final_prompt: String,
    /// Aspect ratio at submission time.
    pub aspect_ratio: AspectRatio,
}

/// Where the current request stands.
///
/// Result and error are mutually exclusive by construction; `Pending` is the
/// loading flag, and `Succeeded`/`Failed` are re-enterable starting points
/// for the next submission.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No request completed yet.
    #[default]
    Idle,
    /// A request is in flight.
    Pending,
    /// Last request produced an ordered list of image locators.
    Succeeded(Vec<String>),
    /// Last request failed with a displayable message.
    Failed(String),
}

/// A validated request ready for dispatch.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    /// Identifier of the provider to dispatch to.
    pub provider_id: String,
    /// Assembled generation parameters.
    pub params: GenerationParams,
}

/// Owned form state plus the request lifecycle.
#[derive(Debug, Clone)]
pub struct GenerationSession {
    /// Free-text prompt.
    pub prompt: String,
    /// Free-text negative prompt; empty means unset.
    pub negative_prompt: String,
    /// Selected provider identifier.
    pub provider_id: String,
    /// Selected style preset.
    pub style: StylePreset,
    /// Selected aspect ratio.
    pub aspect_ratio: AspectRatio,
    /// Raw seed field; parsed at submission, empty means random.
    pub seed_input: String,
    image_count: u8,
    state: SessionState,
    snapshot: Option<RequestSnapshot>,
}

impl Default for GenerationSession {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            negative_prompt: String::new(),
            provider_id: "gemini".to_string(),
            style: StylePreset::None,
            aspect_ratio: AspectRatio::Square,
            seed_input: String::new(),
            image_count: MIN_IMAGES,
            state: SessionState::Idle,
            snapshot: None,
        }
    }
}

impl GenerationSession {
    /// Creates a session with the form's default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the image count, clamped to the slider's [1, 4] range.
    pub fn set_image_count(&mut self, count: u8) {
        self.image_count = count.clamp(MIN_IMAGES, MAX_IMAGES);
    }

    /// Returns the current image count.
    pub fn image_count(&self) -> u8 {
        self.image_count
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Returns true while a request is in flight.
    pub fn is_pending(&self) -> bool {
        self.state == SessionState::Pending
    }

    /// Returns the locators of the last successful request, if any.
    pub fn images(&self) -> Option<&[String]> {
        match &self.state {
            SessionState::Succeeded(urls) => Some(urls),
            _ => None,
        }
    }

    /// Returns the last failure message, if any.
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            SessionState::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    /// Returns the snapshot taken at the last submission.
    pub fn snapshot(&self) -> Option<&RequestSnapshot> {
        self.snapshot.as_ref()
    }

    /// Validates the form and enters `Pending`.
    ///
    /// Returns `None` without touching any state when the trimmed prompt is
    /// empty or a request is already in flight. A malformed seed transitions
    /// straight to `Failed` and also returns `None`; nothing is dispatched
    /// in that case.
    pub fn begin(&mut self) -> Option<PreparedRequest> {
        if self.is_pending() || self.prompt.trim().is_empty() {
            return None;
        }

        // Snapshot before validation, as the UI displays the attempted
        // parameters alongside a seed failure too.
        let final_prompt = format!("{}{}", self.prompt, self.style.modifier());
        self.snapshot = Some(RequestSnapshot {
            final_prompt: final_prompt.clone(),
            aspect_ratio: self.aspect_ratio,
        });

        let seed_text = self.seed_input.trim();
        let seed = if seed_text.is_empty() {
            None
        } else {
            match seed_text.parse::<u64>() {
                // "0" parses to Some(0): zero is a real seed, not "unset".
                Ok(value) => Some(value),
                Err(_) => {
                    self.state = SessionState::Failed(SEED_MESSAGE.to_string());
                    return None;
                }
            }
        };

        let mut params = GenerationParams::new(final_prompt)
            .with_aspect_ratio(self.aspect_ratio)
            .with_count(self.image_count);
        if !self.negative_prompt.is_empty() {
            params = params.with_negative_prompt(self.negative_prompt.clone());
        }
        if let Some(seed) = seed {
            params = params.with_seed(seed);
        }

        self.state = SessionState::Pending;
        tracing::debug!(provider = %self.provider_id, "request pending");

        Some(PreparedRequest {
            provider_id: self.provider_id.clone(),
            params,
        })
    }

    /// Reconciles the dispatch outcome, ending the `Pending` window.
    pub fn complete(&mut self, outcome: crate::error::Result<Vec<GeneratedImage>>) {
        self.state = match outcome {
            Ok(images) => {
                let locators: Vec<String> =
                    images.iter().map(GeneratedImage::to_data_url).collect();
                tracing::debug!(count = locators.len(), "request succeeded");
                SessionState::Succeeded(locators)
            }
            Err(err) => {
                let mut message = err.to_string();
                if message.is_empty() {
                    message = FALLBACK_ERROR.to_string();
                }
                tracing::debug!(error = %message, "request failed");
                SessionState::Failed(message)
            }
        };
    }

    /// Submits the current form: validate, dispatch once, reconcile.
    ///
    /// `&mut self` serializes submissions, so at most one request is ever in
    /// flight and a second submit during `Pending` is a no-op.
    pub async fn submit(&mut self, registry: &ProviderRegistry) {
        if let Some(request) = self.begin() {
            let outcome = registry
                .dispatch(&request.provider_id, &request.params)
                .await;
            self.complete(outcome);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, WeaverError};
    use crate::provider::ImageProvider;
    use crate::types::{GeneratedImage, GenerationMetadata, ImageFormat, ProviderKind};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    const PNG: [u8; 12] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    struct RecordingProvider {
        calls: AtomicUsize,
        last_params: Mutex<Option<GenerationParams>>,
    }

    impl RecordingProvider {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                last_params: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl ImageProvider for RecordingProvider {
        async fn generate(&self, params: &GenerationParams) -> Result<Vec<GeneratedImage>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_params.lock().unwrap() = Some(params.clone());
            Ok(vec![GeneratedImage::new(
                PNG.to_vec(),
                ImageFormat::Png,
                ProviderKind::Gemini,
                GenerationMetadata::default(),
            )])
        }

        fn kind(&self) -> ProviderKind {
            ProviderKind::Gemini
        }
    }

    fn registry_with(provider: Arc<RecordingProvider>) -> ProviderRegistry {
        let mut registry = ProviderRegistry::new();
        registry.register("gemini", provider);
        registry
    }

    #[tokio::test]
    async fn test_empty_prompt_never_leaves_idle() {
        let provider = RecordingProvider::new();
        let registry = registry_with(provider.clone());

        for prompt in ["", "   ", "\t\n"] {
            let mut session = GenerationSession::new();
            session.prompt = prompt.to_string();
            session.submit(&registry).await;
            assert_eq!(session.state(), &SessionState::Idle);
            assert!(session.snapshot().is_none());
        }
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_malformed_seed_fails_without_dispatch() {
        let provider = RecordingProvider::new();
        let registry = registry_with(provider.clone());

        let mut session = GenerationSession::new();
        session.prompt = "a cat".to_string();
        session.seed_input = "abc".to_string();
        session.submit(&registry).await;

        assert_eq!(session.error(), Some("Seed must be a valid number"));
        assert!(!session.is_pending());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_final_prompt_includes_anime_modifier() {
        let mut session = GenerationSession::new();
        session.prompt = "a cat".to_string();
        session.style = StylePreset::Anime;

        let request = session.begin().unwrap();
        assert_eq!(
            request.params.prompt,
            "a cat, anime style, manga, vibrant colors, detailed line art, by studio ghibli"
        );
        assert_eq!(
            session.snapshot().unwrap().final_prompt,
            request.params.prompt
        );
    }

    #[test]
    fn test_second_begin_while_pending_is_ignored() {
        let mut session = GenerationSession::new();
        session.prompt = "a cat".to_string();

        assert!(session.begin().is_some());
        assert!(session.is_pending());
        assert!(session.begin().is_none());
        assert!(session.is_pending());
    }

    #[tokio::test]
    async fn test_one_dispatch_per_submission() {
        let provider = RecordingProvider::new();
        let registry = registry_with(provider.clone());

        let mut session = GenerationSession::new();
        session.prompt = "a cat".to_string();
        session.submit(&registry).await;
        session.submit(&registry).await;

        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
        assert!(matches!(session.state(), SessionState::Succeeded(_)));
    }

    #[tokio::test]
    async fn test_seed_zero_is_sent_and_empty_seed_is_not() {
        let provider = RecordingProvider::new();
        let registry = registry_with(provider.clone());

        let mut session = GenerationSession::new();
        session.prompt = "a cat".to_string();
        session.seed_input = "0".to_string();
        session.submit(&registry).await;
        assert_eq!(
            provider.last_params.lock().unwrap().as_ref().unwrap().seed,
            Some(0)
        );

        session.seed_input = "  ".to_string();
        session.submit(&registry).await;
        assert_eq!(
            provider.last_params.lock().unwrap().as_ref().unwrap().seed,
            None
        );
    }

    #[tokio::test]
    async fn test_success_stores_data_url_locators() {
        let provider = RecordingProvider::new();
        let registry = registry_with(provider);

        let mut session = GenerationSession::new();
        session.prompt = "a cat".to_string();
        session.submit(&registry).await;

        let images = session.images().unwrap();
        assert_eq!(images.len(), 1);
        assert!(images[0].starts_with("data:image/png;base64,"));
        assert!(session.error().is_none());
    }

    #[tokio::test]
    async fn test_failure_stores_provider_message() {
        let mut registry = ProviderRegistry::new();
        registry.register(
            "stability",
            Arc::new(crate::providers::StabilityProvider::new()),
        );

        let mut session = GenerationSession::new();
        session.prompt = "a cat".to_string();
        session.provider_id = "stability".to_string();
        session.submit(&registry).await;

        assert_eq!(
            session.error(),
            Some("Stability AI integration is not yet available")
        );
    }

    #[tokio::test]
    async fn test_unknown_provider_failure_names_the_id() {
        let registry = ProviderRegistry::new();
        let mut session = GenerationSession::new();
        session.prompt = "a cat".to_string();
        session.provider_id = "midjourney".to_string();
        session.submit(&registry).await;

        let message = session.error().unwrap();
        assert!(message.contains("midjourney"), "got: {message}");
    }

    #[test]
    fn test_resubmit_clears_previous_outcome() {
        let mut session = GenerationSession::new();
        session.prompt = "a cat".to_string();
        session.complete(Err(WeaverError::UnknownProvider("nope".into())));
        assert!(session.error().is_some());

        let request = session.begin().unwrap();
        assert!(session.is_pending());
        assert!(session.error().is_none());
        assert_eq!(request.provider_id, "gemini");
    }

    #[test]
    fn test_snapshot_survives_form_edits() {
        let mut session = GenerationSession::new();
        session.prompt = "a cat".to_string();
        session.aspect_ratio = AspectRatio::Landscape;
        session.begin().unwrap();

        session.prompt = "a dog".to_string();
        session.aspect_ratio = AspectRatio::Square;

        let snapshot = session.snapshot().unwrap();
        assert_eq!(snapshot.final_prompt, "a cat");
        assert_eq!(snapshot.aspect_ratio, AspectRatio::Landscape);
    }

    #[test]
    fn test_image_count_clamped_to_slider_range() {
        let mut session = GenerationSession::new();
        session.set_image_count(0);
        assert_eq!(session.image_count(), 1);
        session.set_image_count(9);
        assert_eq!(session.image_count(), 4);
        session.set_image_count(3);
        assert_eq!(session.image_count(), 3);
    }

    #[test]
    fn test_negative_prompt_empty_means_unset() {
        let mut session = GenerationSession::new();
        session.prompt = "a cat".to_string();
        let request = session.begin().unwrap();
        assert!(request.params.negative_prompt.is_none());

        session.complete(Ok(vec![]));
        session.negative_prompt = "blurry".to_string();
        let request = session.begin().unwrap();
        assert_eq!(request.params.negative_prompt.as_deref(), Some("blurry"));
    }
}
