pub mod gemini;
pub mod pollinations;
pub mod supabase;

use crate::{
    error::Result,
    models::{AspectRatio, ImageReference},
};
use async_trait::async_trait;

pub use gemini::{GeminiClient, GeminiImageProvider, GeminiTextProvider};
pub use pollinations::{ImageUrl, PollinationsImageProvider, PollinationsTextProvider};
pub use supabase::{Profile, SupabaseClient};

/// Identity of a provider tier, used in logs and attempt records.
pub trait ProviderInfo {
    fn name(&self) -> &str;
    fn model(&self) -> &str;
}

#[async_trait]
pub trait TextProvider: ProviderInfo + Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

#[async_trait]
pub trait ImageProvider: ProviderInfo + Send + Sync {
    async fn generate(&self, prompt: &str, aspect_ratio: AspectRatio) -> Result<ImageReference>;
}
