//! Image generation providers.

mod gemini;
mod stability;

pub use gemini::{GeminiImageModel, GeminiProvider, GeminiProviderBuilder};
pub use stability::StabilityProvider;
