//! Style presets and their prompt modifiers.
//!
//! A preset maps to a fixed, comma-led suffix appended to the user prompt to
//! bias generation toward a visual style. The lookup is total: identifiers
//! outside the known set (and the `none` default) map to the empty string.

use serde::{Deserialize, Serialize};

/// A visual style preset selectable alongside the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StylePreset {
    /// No styling, the prompt is sent as written.
    #[default]
    None,
    /// Photorealistic rendering.
    Photographic,
    /// Movie-still look with dramatic lighting.
    Cinematic,
    /// Anime / manga line art.
    Anime,
    /// Epic fantasy illustration.
    Fantasy,
    /// 3D render in the artstation style.
    #[serde(rename = "3d-render")]
    ThreeDRender,
    /// Soft watercolor painting.
    Watercolor,
}

impl StylePreset {
    /// All presets, in the order the selector shows them.
    pub const ALL: [StylePreset; 7] = [
        Self::None,
        Self::Photographic,
        Self::Cinematic,
        Self::Anime,
        Self::Fantasy,
        Self::ThreeDRender,
        Self::Watercolor,
    ];

    /// Returns the preset identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Photographic => "photographic",
            Self::Cinematic => "cinematic",
            Self::Anime => "anime",
            Self::Fantasy => "fantasy",
            Self::ThreeDRender => "3d-render",
            Self::Watercolor => "watercolor",
        }
    }

    /// Returns the fixed prompt suffix for this preset.
    ///
    /// `None` yields the empty string; every other preset yields a non-empty,
    /// comma-led suffix.
    pub fn modifier(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::Photographic => {
                ", photorealistic, 4k, high detail, professional photography"
            }
            Self::Cinematic => {
                ", cinematic lighting, film grain, dramatic, movie still, sharp focus"
            }
            Self::Anime => {
                ", anime style, manga, vibrant colors, detailed line art, by studio ghibli"
            }
            Self::Fantasy => {
                ", fantasy art, epic, detailed illustration, magical, by greg rutkowski"
            }
            Self::ThreeDRender => {
                ", 3d render, octane render, trending on artstation, hyper-realistic"
            }
            Self::Watercolor => {
                ", watercolor painting, soft, blended colors, artistic, paper texture"
            }
        }
    }

    /// Looks up the modifier for an arbitrary identifier.
    ///
    /// Total over all inputs: unrecognized identifiers return the empty
    /// string, same as `"none"`.
    pub fn modifier_for(id: &str) -> &'static str {
        Self::from_id(id).map(|s| s.modifier()).unwrap_or("")
    }

    /// Parses a preset identifier, `None` for anything unrecognized.
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "none" => Some(Self::None),
            "photographic" => Some(Self::Photographic),
            "cinematic" => Some(Self::Cinematic),
            "anime" => Some(Self::Anime),
            "fantasy" => Some(Self::Fantasy),
            "3d-render" => Some(Self::ThreeDRender),
            "watercolor" => Some(Self::Watercolor),
            _ => None,
        }
    }
}

impl std::fmt::Display for StylePreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for StylePreset {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_id(s).ok_or_else(|| format!("unknown style preset: {s}"))
    }
}
