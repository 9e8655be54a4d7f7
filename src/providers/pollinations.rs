use crate::{
    config::PollinationsConfig,
    error::{Result, ThumbError},
    models::{AspectRatio, Dimensions, ImageReference},
    providers::{ImageProvider, ProviderInfo, TextProvider},
};
use async_trait::async_trait;
use rand::Rng;
use reqwest::{Client, Url};

const PROVIDER_NAME: &str = "pollinations";

/// Parameters of a Pollinations image URL. The endpoint renders on GET, so the
/// URL itself is the image reference.
#[derive(Debug, Clone)]
pub struct ImageUrl<'a> {
    pub prompt: &'a str,
    pub dimensions: Dimensions,
    pub model: &'a str,
    pub seed: u32,
    pub nologo: bool,
    pub cache_bust: Option<i64>,
}

impl ImageUrl<'_> {
    pub fn build(&self, base_url: &str) -> Result<String> {
        let mut url = parse_base(base_url)?;
        url.path_segments_mut()
            .map_err(|_| ThumbError::ConfigError(format!("Cannot append to {}", base_url)))?
            .pop_if_empty()
            .push("prompt")
            .push(self.prompt);

        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("width", &self.dimensions.width.to_string())
                .append_pair("height", &self.dimensions.height.to_string())
                .append_pair("nologo", if self.nologo { "true" } else { "false" })
                .append_pair("model", self.model)
                .append_pair("seed", &self.seed.to_string());
            if let Some(t) = self.cache_bust {
                query.append_pair("t", &t.to_string());
            }
        }

        Ok(url.to_string())
    }
}

fn parse_base(base_url: &str) -> Result<Url> {
    Url::parse(base_url)
        .map_err(|e| ThumbError::ConfigError(format!("Invalid Pollinations URL {}: {}", base_url, e)))
}

pub fn random_seed() -> u32 {
    rand::thread_rng().gen_range(0..1000)
}

pub struct PollinationsTextProvider {
    client: Client,
    base_url: String,
    model: String,
}

impl PollinationsTextProvider {
    pub fn new(client: Client, config: &PollinationsConfig) -> Self {
        Self {
            client,
            base_url: config.text_url.clone(),
            model: config.text_model.clone(),
        }
    }
}

impl ProviderInfo for PollinationsTextProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TextProvider for PollinationsTextProvider {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let mut url = parse_base(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|_| ThumbError::ConfigError(format!("Cannot append to {}", self.base_url)))?
            .pop_if_empty()
            .push(prompt);
        url.query_pairs_mut().append_pair("model", &self.model);

        log::debug!("Calling Pollinations text model: {}", self.model);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ThumbError::provider(
                PROVIDER_NAME,
                format!("text endpoint returned {}", status),
            ));
        }

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Err(ThumbError::ResponseError("Pollinations returned an empty body".into()));
        }
        Ok(text)
    }
}

pub struct PollinationsImageProvider {
    base_url: String,
    model: String,
    seed: Option<u32>,
}

impl PollinationsImageProvider {
    pub fn new(config: &PollinationsConfig) -> Self {
        Self {
            base_url: config.image_url.clone(),
            model: config.image_model.clone(),
            seed: None,
        }
    }

    /// Pins the seed instead of drawing a fresh one per call.
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl ProviderInfo for PollinationsImageProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ImageProvider for PollinationsImageProvider {
    async fn generate(&self, prompt: &str, aspect_ratio: AspectRatio) -> Result<ImageReference> {
        if prompt.trim().is_empty() {
            return Err(ThumbError::RequestError("Empty prompt".into()));
        }

        let url = ImageUrl {
            prompt,
            dimensions: aspect_ratio.dimensions(),
            model: &self.model,
            seed: self.seed.unwrap_or_else(random_seed),
            nologo: true,
            cache_bust: None,
        }
        .build(&self.base_url)?;

        Ok(ImageReference::Url(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_image_url_encodes_prompt_and_dimensions() {
        let url = ImageUrl {
            prompt: "gato astronauta/lua",
            dimensions: AspectRatio::Portrait.dimensions(),
            model: "flux",
            seed: 42,
            nologo: true,
            cache_bust: Some(7),
        }
        .build("https://image.pollinations.ai")
        .unwrap();

        assert_eq!(
            url,
            "https://image.pollinations.ai/prompt/gato%20astronauta%2Flua?width=1080&height=1920&nologo=true&model=flux&seed=42&t=7"
        );
    }

    #[tokio::test]
    async fn test_image_provider_returns_url() {
        let provider = PollinationsImageProvider::new(&PollinationsConfig::new()).with_seed(5);
        let image = provider.generate("neon city", AspectRatio::Square).await.unwrap();
        let url = image.as_url();
        assert!(url.starts_with("https://image.pollinations.ai/prompt/neon%20city?"));
        assert!(url.contains("width=1080&height=1080"));
        assert!(url.contains("seed=5"));
    }

    #[tokio::test]
    async fn test_image_provider_rejects_blank_prompt() {
        let provider = PollinationsImageProvider::new(&PollinationsConfig::new());
        assert!(provider.generate("   ", AspectRatio::Square).await.is_err());
    }

    #[test]
    fn test_random_seed_range() {
        for _ in 0..100 {
            assert!(random_seed() < 1000);
        }
    }

    #[tokio::test]
    async fn test_text_provider_calls_prompt_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/hello%20world"))
            .and(query_param("model", "openai"))
            .respond_with(ResponseTemplate::new(200).set_body_string("rewritten prompt"))
            .mount(&server)
            .await;

        let config = PollinationsConfig::new().with_text_url(server.uri());
        let provider = PollinationsTextProvider::new(Client::new(), &config);
        assert_eq!(provider.complete("hello world").await.unwrap(), "rewritten prompt");
    }

    #[tokio::test]
    async fn test_text_provider_empty_body_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("  "))
            .mount(&server)
            .await;

        let config = PollinationsConfig::new().with_text_url(server.uri());
        let provider = PollinationsTextProvider::new(Client::new(), &config);
        assert!(provider.complete("x").await.is_err());
    }
}
