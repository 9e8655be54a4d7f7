use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ThumbError;

/// Width:height class of the target thumbnail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "16:9")]
    Landscape,
    #[serde(rename = "9:16")]
    Portrait,
    #[serde(rename = "1:1")]
    Square,
}

impl AspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Landscape => "16:9",
            AspectRatio::Portrait => "9:16",
            AspectRatio::Square => "1:1",
        }
    }

    /// Pixel size handed to image providers and the export canvas.
    pub fn dimensions(&self) -> Dimensions {
        match self {
            AspectRatio::Landscape => Dimensions::new(1920, 1080),
            AspectRatio::Portrait => Dimensions::new(1080, 1920),
            AspectRatio::Square => Dimensions::new(1080, 1080),
        }
    }

    pub fn from_dimensions(dimensions: Dimensions) -> Self {
        if dimensions.width == dimensions.height {
            AspectRatio::Square
        } else if dimensions.height > dimensions.width {
            AspectRatio::Portrait
        } else {
            AspectRatio::Landscape
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = ThumbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "16:9" => Ok(AspectRatio::Landscape),
            "9:16" => Ok(AspectRatio::Portrait),
            "1:1" => Ok(AspectRatio::Square),
            other => Err(ThumbError::RequestError(format!(
                "Unsupported aspect ratio: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// A usable image: either a remote URL or an inline base64 payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ImageReference {
    Url(String),
    Inline { mime_type: String, data: String },
}

impl ImageReference {
    pub fn url(url: impl Into<String>) -> Self {
        ImageReference::Url(url.into())
    }

    /// Reads an `<img src>` value: `data:<mime>;base64,<data>` becomes
    /// `Inline`, anything else is kept as a URL.
    pub fn from_src(src: &str) -> Self {
        let inline = src
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(','))
            .and_then(|(meta, data)| {
                meta.strip_suffix(";base64").map(|mime_type| ImageReference::Inline {
                    mime_type: if mime_type.is_empty() {
                        "image/png".to_string()
                    } else {
                        mime_type.to_string()
                    },
                    data: data.to_string(),
                })
            });
        inline.unwrap_or_else(|| ImageReference::Url(src.to_string()))
    }

    /// Renders the reference as something an `<img src>` accepts.
    pub fn as_url(&self) -> String {
        match self {
            ImageReference::Url(url) => url.clone(),
            ImageReference::Inline { mime_type, data } => {
                format!("data:{};base64,{}", mime_type, data)
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ImageReference::Url(url) => url.trim().is_empty(),
            ImageReference::Inline { data, .. } => data.is_empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum AttemptOutcome {
    Succeeded,
    Failed(String),
    TimedOut,
}

/// One consulted `(provider, model)` pair and how it went.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderAttempt {
    pub provider: String,
    pub model: String,
    pub outcome: AttemptOutcome,
}

impl ProviderAttempt {
    pub fn succeeded(&self) -> bool {
        self.outcome == AttemptOutcome::Succeeded
    }
}
