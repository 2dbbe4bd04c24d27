//! Core types for image generation.

use crate::error::{Result, WeaverError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Supported image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// PNG format (lossless).
    #[default]
    Png,
    /// JPEG format (lossy).
    Jpeg,
    /// WebP format (modern, efficient).
    WebP,
}

impl ImageFormat {
    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::WebP => "webp",
        }
    }

    /// Returns the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::WebP => "image/webp",
        }
    }

    /// Parses a MIME type into a format.
    pub fn from_mime_type(mime: &str) -> Option<Self> {
        match mime {
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/webp" => Some(Self::WebP),
            _ => None,
        }
    }

    /// Detects image format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 12 {
            return None;
        }

        // PNG: 89 50 4E 47 0D 0A 1A 0A
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(Self::Png);
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }

        // WebP: RIFF....WEBP
        if data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
            return Some(Self::WebP);
        }

        None
    }
}

/// Image provider kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Google Gemini / Imagen models.
    Gemini,
    /// Stability AI (registered, integration pending).
    Stability,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gemini => write!(f, "gemini"),
            Self::Stability => write!(f, "stability"),
        }
    }
}

/// Aspect ratios accepted by the generation form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    /// 1:1 square aspect ratio.
    #[default]
    #[serde(rename = "1:1")]
    Square,
    /// 3:4 standard portrait aspect ratio.
    #[serde(rename = "3:4")]
    StandardPortrait,
    /// 4:3 standard landscape aspect ratio.
    #[serde(rename = "4:3")]
    Standard,
    /// 9:16 portrait (tall) aspect ratio.
    #[serde(rename = "9:16")]
    Portrait,
    /// 16:9 landscape (widescreen) aspect ratio.
    #[serde(rename = "16:9")]
    Landscape,
}

impl AspectRatio {
    /// All ratios, in the order the selector shows them.
    pub const ALL: [AspectRatio; 5] = [
        Self::Square,
        Self::StandardPortrait,
        Self::Standard,
        Self::Portrait,
        Self::Landscape,
    ];

    /// Returns the aspect ratio as a string (e.g., "16:9").
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Square => "1:1",
            Self::StandardPortrait => "3:4",
            Self::Standard => "4:3",
            Self::Portrait => "9:16",
            Self::Landscape => "16:9",
        }
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AspectRatio {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "1:1" => Ok(Self::Square),
            "3:4" => Ok(Self::StandardPortrait),
            "4:3" => Ok(Self::Standard),
            "9:16" => Ok(Self::Portrait),
            "16:9" => Ok(Self::Landscape),
            _ => Err(format!("unsupported aspect ratio: {s}")),
        }
    }
}

/// Parameters for one generation request.
///
/// Immutable once handed to a provider; the session builds a fresh value for
/// every submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationParams {
    /// The text prompt describing the desired image (style suffix included).
    pub prompt: String,
    /// Things the image should avoid.
    pub negative_prompt: Option<String>,
    /// Desired aspect ratio.
    pub aspect_ratio: Option<AspectRatio>,
    /// Seed for deterministic generation. `Some(0)` is a real seed.
    pub seed: Option<u64>,
    /// How many images to generate, 1 to 4.
    pub number_of_images: Option<u8>,
}

impl GenerationParams {
    /// Creates new params with the given prompt.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            negative_prompt: None,
            aspect_ratio: None,
            seed: None,
            number_of_images: None,
        }
    }

    /// Sets the negative prompt.
    pub fn with_negative_prompt(mut self, negative: impl Into<String>) -> Self {
        self.negative_prompt = Some(negative.into());
        self
    }

    /// Sets the aspect ratio.
    pub fn with_aspect_ratio(mut self, ratio: AspectRatio) -> Self {
        self.aspect_ratio = Some(ratio);
        self
    }

    /// Sets the seed for deterministic generation.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the number of images to generate.
    pub fn with_count(mut self, count: u8) -> Self {
        self.number_of_images = Some(count);
        self
    }
}

/// Metadata about the generation process.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationMetadata {
    /// Model used for generation.
    pub model: Option<String>,
    /// Seed used (if deterministic).
    pub seed: Option<u64>,
    /// Generation duration in milliseconds.
    pub duration_ms: Option<u64>,
}

/// A generated image with its data and metadata.
#[derive(Debug, Clone)]
#[must_use = "generated image should be saved or processed"]
pub struct GeneratedImage {
    /// Raw image bytes.
    pub data: Vec<u8>,
    /// Image format.
    pub format: ImageFormat,
    /// Provider that generated this image.
    pub provider: ProviderKind,
    /// Generation metadata.
    pub metadata: GenerationMetadata,
}

impl GeneratedImage {
    /// Creates a new generated image.
    pub fn new(
        data: Vec<u8>,
        format: ImageFormat,
        provider: ProviderKind,
        metadata: GenerationMetadata,
    ) -> Self {
        Self {
            data,
            format,
            provider,
            metadata,
        }
    }

    /// Creates a new generated image, detecting format from magic bytes.
    pub fn from_bytes(
        data: Vec<u8>,
        provider: ProviderKind,
        metadata: GenerationMetadata,
    ) -> Result<Self> {
        let format = ImageFormat::from_magic_bytes(&data)
            .ok_or_else(|| WeaverError::Decode("Unknown image format".into()))?;
        Ok(Self::new(data, format, provider, metadata))
    }

    /// Returns the size of the image data in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Saves the image to the specified path.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, &self.data)?;
        Ok(())
    }

    /// Encodes the image data as base64.
    pub fn to_base64(&self) -> String {
        use base64::Engine;
        base64::engine::general_purpose::STANDARD.encode(&self.data)
    }

    /// Returns the image as a data URL, the locator form the session stores.
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.format.mime_type(),
            self.to_base64()
        )
    }
}

/// Decodes a `data:` URL locator back into a format and raw bytes.
///
/// Inverse of [`GeneratedImage::to_data_url`]; used when writing locators
/// out to files.
pub fn decode_data_url(url: &str) -> Result<(ImageFormat, Vec<u8>)> {
    use base64::Engine;

    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| WeaverError::Decode("not a data URL".into()))?;
    let (mime, payload) = rest
        .split_once(";base64,")
        .ok_or_else(|| WeaverError::Decode("data URL is not base64-encoded".into()))?;
    let format = ImageFormat::from_mime_type(mime)
        .ok_or_else(|| WeaverError::Decode(format!("unsupported MIME type: {mime}")))?;
    let data = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| WeaverError::Decode(e.to_string()))?;
    Ok((format, data))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: [u8; 12] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
    const JPEG_MAGIC: [u8; 12] = [0xFF, 0xD8, 0xFF, 0xE0, 0, 0, 0, 0, 0, 0, 0, 0];
    const WEBP_MAGIC: [u8; 12] = *b"RIFF\x00\x00\x00\x00WEBP";

    #[test]
    fn test_format_from_magic_bytes() {
        assert_eq!(
            ImageFormat::from_magic_bytes(&PNG_MAGIC),
            Some(ImageFormat::Png)
        );
        assert_eq!(
            ImageFormat::from_magic_bytes(&JPEG_MAGIC),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(
            ImageFormat::from_magic_bytes(&WEBP_MAGIC),
            Some(ImageFormat::WebP)
        );
        assert_eq!(ImageFormat::from_magic_bytes(b"short"), None);
    }

    #[test]
    fn test_aspect_ratio_strings() {
        for ratio in AspectRatio::ALL {
            assert_eq!(ratio.as_str().parse::<AspectRatio>(), Ok(ratio));
        }
        assert!("21:9".parse::<AspectRatio>().is_err());
    }

    #[test]
    fn test_aspect_ratio_serde_uses_ratio_strings() {
        let json = serde_json::to_string(&AspectRatio::Portrait).unwrap();
        assert_eq!(json, "\"9:16\"");
        let back: AspectRatio = serde_json::from_str("\"16:9\"").unwrap();
        assert_eq!(back, AspectRatio::Landscape);
    }

    #[test]
    fn test_params_builder() {
        let params = GenerationParams::new("a cat")
            .with_negative_prompt("blurry")
            .with_aspect_ratio(AspectRatio::Landscape)
            .with_seed(0)
            .with_count(4);
        assert_eq!(params.prompt, "a cat");
        assert_eq!(params.negative_prompt.as_deref(), Some("blurry"));
        assert_eq!(params.aspect_ratio, Some(AspectRatio::Landscape));
        assert_eq!(params.seed, Some(0));
        assert_eq!(params.number_of_images, Some(4));
    }

    #[test]
    fn test_data_url_round_trip() {
        let image = GeneratedImage::new(
            PNG_MAGIC.to_vec(),
            ImageFormat::Png,
            ProviderKind::Gemini,
            GenerationMetadata::default(),
        );
        let url = image.to_data_url();
        assert!(url.starts_with("data:image/png;base64,"));

        let (format, data) = decode_data_url(&url).unwrap();
        assert_eq!(format, ImageFormat::Png);
        assert_eq!(data, PNG_MAGIC.to_vec());
    }

    #[test]
    fn test_decode_data_url_rejects_garbage() {
        assert!(decode_data_url("https://example.com/a.png").is_err());
        assert!(decode_data_url("data:image/png,plain").is_err());
        assert!(decode_data_url("data:text/plain;base64,aGk=").is_err());
    }

    #[test]
    fn test_from_bytes_detects_format() {
        let image = GeneratedImage::from_bytes(
            JPEG_MAGIC.to_vec(),
            ProviderKind::Gemini,
            GenerationMetadata::default(),
        )
        .unwrap();
        assert_eq!(image.format, ImageFormat::Jpeg);
        assert_eq!(image.size(), 12);

        assert!(GeneratedImage::from_bytes(
            vec![0u8; 16],
            ProviderKind::Gemini,
            GenerationMetadata::default(),
        )
        .is_err());
    }
}
