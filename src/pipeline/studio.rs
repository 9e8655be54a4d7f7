//! Gemini-only editor tools: image-to-image edits, the thumbnail audit and
//! visual hook ideas. Unlike generation these have no fallback tiers.

use serde_json::json;

use crate::{
    error::{Result, ThumbError},
    models::{studio::RawAudit, AspectRatio, ImageReference, ThumbnailAudit, VisualHook},
    providers::{GeminiImageProvider, GeminiTextProvider},
};

/// An image-to-image operation offered by the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageEdit {
    /// Free-form refinement of the current background.
    Refine(String),
    /// One-click CTR optimisation of the current background.
    AutoOptimize,
    /// Changes the subject's facial expression, keeping identity.
    FacialExpression(String),
    /// Cuts the subject out onto a plain white background.
    RemoveBackground,
    /// A contrasting variant for an A/B test.
    AbVariant,
}

impl ImageEdit {
    /// Builds an edit from its wire name (`refine`, `auto_optimize`,
    /// `facial_expression`, `remove_background`, `ab_variant`).
    pub fn parse(operation: &str, prompt: Option<&str>) -> Result<Self> {
        let required_prompt = || {
            prompt
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .ok_or_else(|| {
                    ThumbError::RequestError(format!("Edit `{}` needs a prompt", operation))
                })
        };

        match operation.trim() {
            "refine" => Ok(ImageEdit::Refine(required_prompt()?)),
            "auto_optimize" => Ok(ImageEdit::AutoOptimize),
            "facial_expression" => Ok(ImageEdit::FacialExpression(required_prompt()?)),
            "remove_background" => Ok(ImageEdit::RemoveBackground),
            "ab_variant" => Ok(ImageEdit::AbVariant),
            other => Err(ThumbError::RequestError(format!("Unknown edit: {}", other))),
        }
    }

    pub fn instruction(&self) -> String {
        match self {
            ImageEdit::Refine(prompt) => format!(
                "Refine background image: {}. High cinematic quality. NO TEXT.",
                prompt.trim()
            ),
            ImageEdit::AutoOptimize => "Optimize this thumbnail background image for high CTR. \
                 Enhance lighting and composition. NO TEXT."
                .to_string(),
            ImageEdit::FacialExpression(emotion) => format!(
                "Modify the person's face to show {}. Keep identity. High cinematic quality.",
                emotion.trim()
            ),
            ImageEdit::RemoveBackground => "Isolate the main subject of this image. \
                 Remove the entire background and replace it with a clean, solid white background. \
                 Ensure edges are sharp and professional."
                .to_string(),
            ImageEdit::AbVariant => "Create a strategic variation of this thumbnail for an A/B test. \
                 Focus on: 1. Drastically increasing chromatic contrast. \
                 2. Making the subject's face more expressive and sharp. \
                 3. Changing the background to an opposite complementary colour to see which stands out more in the feed. \
                 Keep the same text elements but optimise legibility."
                .to_string(),
        }
    }

    /// Canvas shape requested from the model. Background removal keeps the
    /// source shape and A/B variants are always landscape.
    pub fn aspect_ratio(&self, current: AspectRatio) -> Option<AspectRatio> {
        match self {
            ImageEdit::RemoveBackground => None,
            ImageEdit::AbVariant => Some(AspectRatio::Landscape),
            _ => Some(current),
        }
    }
}

pub struct StudioTools {
    image: GeminiImageProvider,
    text: GeminiTextProvider,
}

impl StudioTools {
    pub fn new(image: GeminiImageProvider, text: GeminiTextProvider) -> Self {
        Self { image, text }
    }

    pub async fn edit(
        &self,
        image: &ImageReference,
        edit: &ImageEdit,
        aspect_ratio: AspectRatio,
    ) -> Result<ImageReference> {
        if let ImageEdit::Refine(prompt) | ImageEdit::FacialExpression(prompt) = edit {
            if prompt.trim().is_empty() {
                return Err(ThumbError::RequestError("Edit instruction must not be empty".into()));
            }
        }

        log::info!("Applying image edit: {:?}", edit);
        self.image
            .edit_image(image, &edit.instruction(), edit.aspect_ratio(aspect_ratio))
            .await
    }

    pub fn audit_instruction(niche: &str) -> String {
        format!(
            "Analyse this thumbnail for the \"{}\" niche.\n\
             Act as a visual clutter detector, YouTube policy specialist and retention strategist. Assess:\n\
             1. Excessive clickbait: is the promise exaggerated or unrealistic?\n\
             2. CAPS abuse: is the text shouting unnecessarily?\n\
             3. Risk elements: too many red arrows or circles that may cause audience fatigue?\n\
             4. Visual clutter: chaos that hurts legibility.\n\
             5. Balance: does it attract the right audience or only the curious who leave in the first 5 seconds?\n\
             \n\
             RETURN JSON WITH THIS STRUCTURE:\n\
             {{\n\
               \"viralScore\": [0-100],\n\
               \"safetyScore\": [0-100],\n\
               \"simplicityIndex\": [0-100],\n\
               \"feedback\": \"Text focused on retention balance...\",\n\
               \"alerts\": [{{\"type\": \"error|warning|success\", \"category\": \"Shadowban|Clickbait|CAPS|Clutter\", \"message\": \"Short message\"}}]\n\
             }}",
            niche.trim()
        )
    }

    /// Scores an uploaded thumbnail. Scores the model leaves out (or zero)
    /// read as 75 viral, 90 safety, 80 simplicity.
    pub async fn audit(&self, image: &ImageReference, niche: &str) -> Result<ThumbnailAudit> {
        let text = self
            .text
            .complete_json(&Self::audit_instruction(niche), Some(image), None)
            .await?;

        let raw: RawAudit = match text {
            Some(text) => serde_json::from_str(&text)
                .map_err(|e| ThumbError::ResponseError(format!("Malformed audit: {}", e)))?,
            None => RawAudit::default(),
        };
        Ok(raw.into())
    }

    pub fn hooks_instruction(topic: &str, trigger: &str) -> String {
        format!(
            "As a YouTube strategist, create 3 \"Visual Hooks\" (thumbnail headlines) for the topic: \"{}\".\n\
             Main psychological trigger: {}.\n\
             Each hook must be short (2-4 big words).\n\
             Return JSON with:\n\
             - text: the phrase\n\
             - emphasis: which word should be the biggest\n\
             - power: emotional impact score from 0 to 100\n\
             - reason: short explanation of the trigger used.",
            topic.trim(),
            trigger.trim()
        )
    }

    pub async fn visual_hooks(&self, topic: &str, trigger: &str) -> Result<Vec<VisualHook>> {
        if topic.trim().is_empty() {
            return Err(ThumbError::RequestError("Topic must not be empty".into()));
        }

        let schema = json!({
            "type": "ARRAY",
            "items": {
                "type": "OBJECT",
                "properties": {
                    "text": { "type": "STRING" },
                    "emphasis": { "type": "STRING" },
                    "power": { "type": "NUMBER" },
                    "reason": { "type": "STRING" }
                }
            }
        });

        let text = self
            .text
            .complete_json(&Self::hooks_instruction(topic, trigger), None, Some(schema))
            .await?;

        match text {
            Some(text) => serde_json::from_str(&text)
                .map_err(|e| ThumbError::ResponseError(format!("Malformed hooks: {}", e))),
            None => Ok(Vec::new()),
        }
    }
}
