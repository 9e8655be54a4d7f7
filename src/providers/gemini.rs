use crate::{
    config::GeminiConfig,
    error::{Result, ThumbError},
    models::{AspectRatio, GenerateContentResponse, ImageReference},
    providers::{ImageProvider, ProviderInfo, TextProvider},
};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde_json::{json, Value};

const PROVIDER_NAME: &str = "gemini";

/// Shared connection to the Gemini `generateContent` API.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(client: Client, config: &GeminiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| ThumbError::ConfigError("GEMINI_API_KEY not configured".into()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn image_model(&self, model: impl Into<String>) -> GeminiImageProvider {
        GeminiImageProvider {
            gemini: self.clone(),
            model: model.into(),
        }
    }

    pub fn text_model(&self, model: impl Into<String>) -> GeminiTextProvider {
        GeminiTextProvider {
            gemini: self.clone(),
            model: model.into(),
        }
    }

    async fn generate_content(&self, model: &str, payload: Value) -> Result<GenerateContentResponse> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model);

        log::debug!("Invoking Gemini model: {}", model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ThumbError::provider(
                PROVIDER_NAME,
                format!("{} returned {}: {}", model, status, error_text),
            ));
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| ThumbError::ResponseError(format!("Malformed Gemini body: {}", e)))
    }
}

pub struct GeminiImageProvider {
    gemini: GeminiClient,
    model: String,
}

impl ProviderInfo for GeminiImageProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ImageProvider for GeminiImageProvider {
    async fn generate(&self, prompt: &str, aspect_ratio: AspectRatio) -> Result<ImageReference> {
        let payload = json!({
            "contents": [{
                "parts": [{
                    "text": format!("YouTube thumbnail background: {}. Cinematic, high quality, 8k, detailed, NO TEXT.", prompt)
                }]
            }],
            "generationConfig": {
                "responseModalities": ["TEXT", "IMAGE"],
                "imageConfig": { "aspectRatio": aspect_ratio.as_str() }
            }
        });

        let response = self.gemini.generate_content(&self.model, payload).await?;
        inline_image(&response)
    }
}

impl GeminiImageProvider {
    /// Image-to-image: sends `image` with `instruction` and returns the edited
    /// picture. Only inline images can be edited.
    pub async fn edit_image(
        &self,
        image: &ImageReference,
        instruction: &str,
        aspect_ratio: Option<AspectRatio>,
    ) -> Result<ImageReference> {
        let mut payload = json!({
            "contents": [{ "parts": [inline_part(image)?, { "text": instruction }] }]
        });
        if let Some(aspect_ratio) = aspect_ratio {
            payload["generationConfig"] =
                json!({ "imageConfig": { "aspectRatio": aspect_ratio.as_str() } });
        }

        let response = self.gemini.generate_content(&self.model, payload).await?;
        inline_image(&response)
    }
}

fn inline_part(image: &ImageReference) -> Result<Value> {
    match image {
        ImageReference::Inline { mime_type, data } if !data.is_empty() => Ok(json!({
            "inlineData": { "mimeType": mime_type, "data": data }
        })),
        ImageReference::Inline { .. } => Err(ThumbError::RequestError("Empty source image".into())),
        ImageReference::Url(_) => Err(ThumbError::RequestError(
            "Gemini needs an inline (base64) source image".into(),
        )),
    }
}

fn inline_image(response: &GenerateContentResponse) -> Result<ImageReference> {
    let inline = response.first_inline_image().ok_or_else(|| {
        ThumbError::ResponseError("Gemini returned success but no image data".into())
    })?;

    if inline.data.is_empty() {
        return Err(ThumbError::ResponseError("Gemini returned an empty image".into()));
    }
    STANDARD
        .decode(inline.data.as_bytes())
        .map_err(|e| ThumbError::ResponseError(format!("Invalid base64 image: {}", e)))?;

    Ok(ImageReference::Inline {
        mime_type: inline
            .mime_type
            .clone()
            .unwrap_or_else(|| "image/png".to_string()),
        data: inline.data.clone(),
    })
}

pub struct GeminiTextProvider {
    gemini: GeminiClient,
    model: String,
}

impl ProviderInfo for GeminiTextProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TextProvider for GeminiTextProvider {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let payload = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response = self.gemini.generate_content(&self.model, payload).await?;
        response
            .text()
            .ok_or_else(|| ThumbError::ResponseError("Gemini returned no text".into()))
    }
}

impl GeminiTextProvider {
    /// Asks for a JSON answer, optionally about an attached image and shaped
    /// by `schema`. `None` means the model sent no text at all.
    pub async fn complete_json(
        &self,
        prompt: &str,
        image: Option<&ImageReference>,
        schema: Option<Value>,
    ) -> Result<Option<String>> {
        let mut parts = Vec::with_capacity(2);
        if let Some(image) = image {
            parts.push(inline_part(image)?);
        }
        parts.push(json!({ "text": prompt }));

        let mut generation_config = json!({ "responseMimeType": "application/json" });
        if let Some(schema) = schema {
            generation_config["responseSchema"] = schema;
        }

        let payload = json!({
            "contents": [{ "parts": parts }],
            "generationConfig": generation_config
        });

        let response = self.gemini.generate_content(&self.model, payload).await?;
        Ok(response.text())
    }
}
