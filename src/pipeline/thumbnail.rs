use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use crate::{
    config::Config,
    error::{Result, ThumbError},
    logger::Timer,
    models::{DraftProject, GenerationRequest, GenerationResult, TitlesRequest},
    pipeline::{
        chain::{ProviderChain, Tier},
        enhancer::PromptEnhancer,
        studio::StudioTools,
        titles::TitleGenerator,
    },
    providers::{
        GeminiClient, ImageProvider, PollinationsImageProvider, PollinationsTextProvider,
        TextProvider,
    },
};

const TITLE_TIMEOUT: Duration = Duration::from_secs(8);

/// Prompt enhancement, the image chain and title generation behind one handle.
pub struct ThumbnailService {
    enhancer: Option<PromptEnhancer>,
    chain: ProviderChain,
    titles: TitleGenerator,
    studio: Option<StudioTools>,
}

impl ThumbnailService {
    pub fn new(enhancer: Option<PromptEnhancer>, chain: ProviderChain, titles: TitleGenerator) -> Self {
        Self {
            enhancer,
            chain,
            titles,
            studio: None,
        }
    }

    /// Enables the Gemini editor tools (edits, audit, hooks).
    pub fn with_studio(mut self, studio: StudioTools) -> Self {
        self.studio = Some(studio);
        self
    }

    /// Wires the default tiers: Gemini image models (when a key is present),
    /// then Pollinations, then the static fallback.
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("viralthumb/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ThumbError::ConfigError(format!("HTTP client: {}", e)))?;

        let pollinations_text: Arc<dyn TextProvider> =
            Arc::new(PollinationsTextProvider::new(http.clone(), &config.pollinations));

        let mut image_tiers: Vec<Tier<dyn ImageProvider>> = Vec::new();
        let mut title_tiers: Vec<Tier<dyn TextProvider>> = Vec::new();
        let mut studio = None;

        if config.gemini.is_configured() {
            let gemini = GeminiClient::new(http.clone(), &config.gemini)?;
            if let Some(edit_model) = config.gemini.image_models.first() {
                studio = Some(StudioTools::new(
                    gemini.image_model(edit_model.as_str()),
                    gemini.text_model(config.gemini.text_model.as_str()),
                ));
            }
            for model in &config.gemini.image_models {
                let provider: Arc<dyn ImageProvider> = Arc::new(gemini.image_model(model.as_str()));
                image_tiers.push(Tier::new(provider).with_timeout(config.gemini.timeout));
            }
            let text: Arc<dyn TextProvider> =
                Arc::new(gemini.text_model(config.gemini.text_model.as_str()));
            title_tiers.push(Tier::new(text).with_timeout(config.gemini.timeout));
        } else {
            log::warn!("GEMINI_API_KEY not set, Gemini tiers disabled");
        }

        let pollinations_image: Arc<dyn ImageProvider> =
            Arc::new(PollinationsImageProvider::new(&config.pollinations));
        image_tiers.push(Tier::new(pollinations_image));
        title_tiers.push(Tier::new(pollinations_text.clone()).with_timeout(TITLE_TIMEOUT));

        let enhancer = config
            .enhance_prompts
            .then(|| PromptEnhancer::new(pollinations_text, config.enhance_timeout));

        log::info!(
            "Image chain ready with {} tiers (+ static fallback)",
            image_tiers.len()
        );

        let service = Self::new(
            enhancer,
            ProviderChain::new(image_tiers),
            TitleGenerator::new(title_tiers),
        );
        Ok(match studio {
            Some(studio) => service.with_studio(studio),
            None => service,
        })
    }

    pub fn chain(&self) -> &ProviderChain {
        &self.chain
    }

    pub fn enhancer(&self) -> Option<&PromptEnhancer> {
        self.enhancer.as_ref()
    }

    /// `None` without a Gemini key; the editor hides those tools.
    pub fn studio(&self) -> Option<&StudioTools> {
        self.studio.as_ref()
    }

    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        let prompt = request.prompt.as_str();
        if prompt.trim().is_empty() {
            return Err(ThumbError::RequestError("Prompt must not be empty".into()));
        }

        let _timer = Timer::new("generate-thumbnail");

        let enhanced_prompt = match &self.enhancer {
            Some(enhancer) => enhancer.enhance(prompt, request.aspect_ratio).await,
            None => prompt.to_string(),
        };
        log::info!("Final prompt: {}", enhanced_prompt);

        let outcome = self.chain.run(&enhanced_prompt, request.aspect_ratio).await;

        Ok(GenerationResult {
            image_url: outcome.image.as_url(),
            enhanced_prompt,
            provider: outcome.provider,
            used_fallback: outcome.used_fallback,
            attempts: outcome.attempts,
        })
    }

    pub async fn titles(&self, request: &TitlesRequest) -> Result<Vec<String>> {
        let _timer = Timer::new("generate-titles");
        self.titles.generate(request).await
    }

    /// Generates the image, then asks for titles; the first title names the
    /// draft. Missing titles leave `title` empty instead of failing.
    pub async fn draft(&self, request: &GenerationRequest) -> Result<DraftProject> {
        let image = self.generate(request).await?;

        let title = match self.titles(&TitlesRequest::new(request.prompt.trim())).await {
            Ok(titles) => titles.into_iter().next(),
            Err(e) => {
                log::warn!("Title ideas unavailable: {}", e);
                None
            }
        };

        Ok(DraftProject {
            current_image: Some(image.image_url),
            title,
        })
    }
}
