//! Client-side display of an asynchronously rendered Pollinations image.
//!
//! The browser drives this machine with native load/error events; it never
//! polls. Each mount owns one seed so retries across models stay comparable.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    models::Dimensions,
    pipeline::STATIC_FALLBACK_URL,
    providers::{pollinations::random_seed, ImageUrl},
};

/// Quality first, then speed, then whatever still answers.
pub const DISPLAY_MODELS: [&str; 3] = ["flux", "turbo", "osm"];

pub const RETRY_DELAY: Duration = Duration::from_millis(500);

const MAX_PROMPT_CHARS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DisplayState {
    Loading { model_index: usize, url: String },
    Loaded { url: String },
    Fallback { url: String },
}

/// What the host view must do after an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayEffect {
    /// Point the `<img>` at `url` after `delay`.
    Retry { url: String, delay: Duration },
    /// A usable URL is showing; tell the parent.
    NotifyLoaded(String),
    /// The terminal fallback was needed.
    NotifyFallback,
}

#[derive(Debug, Clone)]
pub struct ImageDisplay {
    prompt: String,
    dimensions: Dimensions,
    seed: u32,
    nologo: bool,
    base_url: String,
    state: DisplayState,
}

impl ImageDisplay {
    /// Mounts the display; `seed` defaults to a random one drawn once here.
    pub fn mount(
        base_url: impl Into<String>,
        prompt: impl Into<String>,
        dimensions: Dimensions,
        seed: Option<u32>,
    ) -> Result<Self> {
        let mut display = Self {
            prompt: prompt.into(),
            dimensions,
            seed: seed.unwrap_or_else(random_seed),
            nologo: true,
            base_url: base_url.into(),
            state: DisplayState::Loading {
                model_index: 0,
                url: String::new(),
            },
        };
        display.reset()?;
        Ok(display)
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    pub fn current_model(&self) -> Option<&'static str> {
        match self.state {
            DisplayState::Loading { model_index, .. } => Some(DISPLAY_MODELS[model_index]),
            _ => None,
        }
    }

    /// The URL the `<img>` element should currently show.
    pub fn current_url(&self) -> &str {
        match &self.state {
            DisplayState::Loading { url, .. }
            | DisplayState::Loaded { url }
            | DisplayState::Fallback { url } => url,
        }
    }

    /// Restarts at the first model with the same seed (prompt change or "try again").
    pub fn reset(&mut self) -> Result<()> {
        let url = self.url_for(0)?;
        self.state = DisplayState::Loading {
            model_index: 0,
            url,
        };
        Ok(())
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) -> Result<()> {
        self.prompt = prompt.into();
        self.reset()
    }

    pub fn image_loaded(&mut self) -> Vec<DisplayEffect> {
        match &self.state {
            DisplayState::Loading { url, .. } => {
                let url = url.clone();
                self.state = DisplayState::Loaded { url: url.clone() };
                vec![DisplayEffect::NotifyLoaded(url)]
            }
            _ => Vec::new(),
        }
    }

    pub fn image_failed(&mut self) -> Result<Vec<DisplayEffect>> {
        let DisplayState::Loading { model_index, .. } = self.state else {
            return Ok(Vec::new());
        };

        log::warn!(
            "Image load failed for model {}, retrying",
            DISPLAY_MODELS[model_index]
        );

        let next = model_index + 1;
        if next < DISPLAY_MODELS.len() {
            let url = self.url_for(next)?;
            self.state = DisplayState::Loading {
                model_index: next,
                url: url.clone(),
            };
            return Ok(vec![DisplayEffect::Retry {
                url,
                delay: RETRY_DELAY,
            }]);
        }

        log::error!("All display models failed, showing static fallback");
        let url = STATIC_FALLBACK_URL.to_string();
        self.state = DisplayState::Fallback { url: url.clone() };
        Ok(vec![
            DisplayEffect::NotifyLoaded(url),
            DisplayEffect::NotifyFallback,
        ])
    }

    fn url_for(&self, model_index: usize) -> Result<String> {
        let prompt = sanitize_prompt(&self.prompt);
        ImageUrl {
            prompt: &prompt,
            dimensions: self.dimensions,
            model: DISPLAY_MODELS[model_index],
            seed: self.seed,
            nologo: self.nologo,
            cache_bust: Some(chrono::Utc::now().timestamp_millis()),
        }
        .build(&self.base_url)
    }
}

/// Keeps the first 200 characters, then only ASCII letters, digits and spaces.
pub fn sanitize_prompt(prompt: &str) -> String {
    prompt
        .chars()
        .take(MAX_PROMPT_CHARS)
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .collect()
}
