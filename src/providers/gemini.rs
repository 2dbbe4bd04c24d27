//! Gemini (Google) image generation provider.
//!
//! Talks to the Imagen `:predict` endpoint of the Generative Language API,
//! which accepts the whole parameter set in one call: prompt, negative
//! prompt, aspect ratio, seed, and sample count.

use crate::error::{parse_retry_after, sanitize_error_message, Result, WeaverError};
use crate::provider::ImageProvider;
use crate::types::{
    GeneratedImage, GenerationMetadata, GenerationParams, ImageFormat, ProviderKind,
};
use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::time::Instant;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Gemini image model variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GeminiImageModel {
    /// Imagen 3 (default, generally available).
    #[default]
    Imagen3,
    /// Imagen 4 (higher fidelity, preview).
    Imagen4,
}

impl GeminiImageModel {
    /// Returns the API model identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Imagen3 => "imagen-3.0-generate-002",
            Self::Imagen4 => "imagen-4.0-generate-preview-06-06",
        }
    }
}

/// Builder for GeminiProvider.
#[derive(Debug, Clone, Default)]
pub struct GeminiProviderBuilder {
    api_key: Option<String>,
    model: GeminiImageModel,
}

impl GeminiProviderBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key. Falls back to `GEMINI_API_KEY` then
    /// `GOOGLE_API_KEY` env vars.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the Imagen model variant.
    pub fn model(mut self, model: GeminiImageModel) -> Self {
        self.model = model;
        self
    }

    /// Builds the provider, resolving the API key.
    pub fn build(self) -> Result<GeminiProvider> {
        let api_key = self
            .api_key
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .or_else(|| std::env::var("GOOGLE_API_KEY").ok())
            .ok_or_else(|| {
                WeaverError::Auth("GEMINI_API_KEY not set and no API key provided".into())
            })?;

        Ok(GeminiProvider {
            client: reqwest::Client::new(),
            api_key,
            model: self.model,
        })
    }
}

/// Gemini image generation provider.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    model: GeminiImageModel,
}

impl GeminiProvider {
    /// Creates a new `GeminiProviderBuilder`.
    pub fn builder() -> GeminiProviderBuilder {
        GeminiProviderBuilder::new()
    }

    async fn generate_impl(&self, params: &GenerationParams) -> Result<Vec<GeneratedImage>> {
        let start = Instant::now();

        let url = format!("{}/{}:predict", API_BASE, self.model.as_str());
        let body = PredictRequest::from_params(params);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let headers = response.headers().clone();
            let text = response.text().await.unwrap_or_default();
            return Err(self.parse_error(status.as_u16(), &text, &headers));
        }

        let predict_response: PredictResponse = response.json().await?;

        if predict_response.predictions.is_empty() {
            return Err(WeaverError::UnexpectedResponse(
                "No predictions in Imagen response".into(),
            ));
        }

        // A filtered prediction carries a reason instead of image bytes.
        if let Some(reason) = predict_response
            .predictions
            .iter()
            .find_map(|p| p.rai_filtered_reason.as_deref())
        {
            return Err(WeaverError::ContentBlocked(reason.to_string()));
        }

        let duration_ms = start.elapsed().as_millis() as u64;
        let mut images = Vec::with_capacity(predict_response.predictions.len());

        for prediction in predict_response.predictions {
            let encoded = prediction.bytes_base64_encoded.ok_or_else(|| {
                WeaverError::UnexpectedResponse("No image data in Imagen prediction".into())
            })?;
            let data = base64::engine::general_purpose::STANDARD
                .decode(&encoded)
                .map_err(|e| WeaverError::Decode(e.to_string()))?;

            let format = prediction
                .mime_type
                .as_deref()
                .and_then(ImageFormat::from_mime_type)
                .or_else(|| ImageFormat::from_magic_bytes(&data))
                .unwrap_or(ImageFormat::Png);

            images.push(GeneratedImage::new(
                data,
                format,
                ProviderKind::Gemini,
                GenerationMetadata {
                    model: Some(self.model.as_str().to_string()),
                    seed: params.seed,
                    duration_ms: Some(duration_ms),
                },
            ));
        }

        tracing::debug!(
            model = self.model.as_str(),
            count = images.len(),
            duration_ms,
            "generation complete"
        );
        Ok(images)
    }

    fn parse_error(
        &self,
        status: u16,
        text: &str,
        headers: &reqwest::header::HeaderMap,
    ) -> WeaverError {
        let text = sanitize_error_message(text);
        if status == 402 {
            return WeaverError::Billing(
                "Gemini billing issue: enable billing at https://aistudio.google.com".into(),
            );
        }
        if status == 404 {
            return WeaverError::InvalidRequest(
                "Model not found. Verify the model name is correct.".into(),
            );
        }
        if status == 429 {
            let retry_after = parse_retry_after(headers).map(std::time::Duration::from_secs);
            return WeaverError::RateLimited { retry_after };
        }
        if status == 401 || status == 403 {
            return WeaverError::Auth(text);
        }
        let lower = text.to_lowercase();
        if lower.contains("safety")
            || lower.contains("blocked")
            || lower.contains("content_policy")
            || lower.contains("prohibited")
        {
            return WeaverError::ContentBlocked(text);
        }
        WeaverError::Api {
            status,
            message: text,
        }
    }
}

#[async_trait]
impl ImageProvider for GeminiProvider {
    async fn generate(&self, params: &GenerationParams) -> Result<Vec<GeneratedImage>> {
        self.generate_impl(params).await
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }
}

// Request/Response types

#[derive(Debug, Serialize)]
struct PredictRequest {
    instances: Vec<PredictInstance>,
    parameters: PredictParameters,
}

#[derive(Debug, Serialize)]
struct PredictInstance {
    prompt: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PredictParameters {
    sample_count: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    aspect_ratio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    negative_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
}

impl PredictRequest {
    fn from_params(params: &GenerationParams) -> Self {
        Self {
            instances: vec![PredictInstance {
                prompt: params.prompt.clone(),
            }],
            parameters: PredictParameters {
                sample_count: params.number_of_images.unwrap_or(1),
                aspect_ratio: params.aspect_ratio.map(|r| r.as_str().to_string()),
                negative_prompt: params.negative_prompt.clone(),
                seed: params.seed,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    #[serde(default)]
    bytes_base64_encoded: Option<String>,
    #[serde(default)]
    mime_type: Option<String>,
    #[serde(default)]
    rai_filtered_reason: Option<String>,
}
