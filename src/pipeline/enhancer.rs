use std::sync::Arc;
use std::time::Duration;

use crate::{
    error::ThumbError,
    models::AspectRatio,
    pipeline::chain::{first_success, Tier},
    providers::TextProvider,
};

/// Answers this short are treated as a refusal or noise.
const MIN_ENHANCED_LEN: usize = 10;

/// Rewrites raw topics into "viral thumbnail" prompts, degrading silently to
/// the raw input on any failure.
#[derive(Clone)]
pub struct PromptEnhancer {
    tier: Tier<dyn TextProvider>,
}

impl PromptEnhancer {
    pub fn new(provider: Arc<dyn TextProvider>, timeout: Duration) -> Self {
        Self {
            tier: Tier::new(provider).with_timeout(timeout),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.tier.timeout
    }

    pub fn instruction(prompt: &str, aspect_ratio: AspectRatio) -> String {
        format!(
            "You are an expert YouTube Thumbnail Designer.\n\
             Rewrite the following user prompt into a high-quality image generation prompt for a viral {} thumbnail.\n\
             \n\
             Rules:\n\
             - Hyper-realistic and viral YouTube thumbnail style, high contrast, ultra-detailed 8k.\n\
             - A central charismatic subject with an intense, expressive facial expression (wide-eyed shock or a confident smirk).\n\
             - Sharp rim lighting and vibrant neon glows (electric blue, fiery orange, or toxic green) to separate the subject from the background.\n\
             - The background is a clean, cinematic environment related to the theme.\n\
             - Dynamic composition with a shallow depth of field.\n\
             - Output ONLY the raw prompt text, no explanations.\n\
             \n\
             User Prompt: \"{}\"",
            aspect_ratio, prompt
        )
    }

    /// Returns the enhanced prompt, or `prompt` unchanged if the provider
    /// fails, times out, or answers with something unusable.
    pub async fn enhance(&self, prompt: &str, aspect_ratio: AspectRatio) -> String {
        let instruction = Self::instruction(prompt, aspect_ratio);
        let tiers = std::slice::from_ref(&self.tier);

        let instruction: &str = &instruction;

        let outcome = first_success(tiers, move |provider| async move {
            let text = provider.complete(instruction).await?;
            let text = text.trim();
            if text.len() <= MIN_ENHANCED_LEN {
                return Err(ThumbError::ResponseError(format!(
                    "Enhancement too short: {:?}",
                    text
                )));
            }
            Ok(text.to_string())
        })
        .await;

        match outcome.value {
            Some((enhanced, _)) => {
                log::debug!("Enhanced prompt: {}", enhanced);
                enhanced
            }
            None => {
                log::warn!("Prompt enhancement failed, using raw prompt");
                prompt.to_string()
            }
        }
    }
}
