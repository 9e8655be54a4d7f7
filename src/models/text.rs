use serde::{Deserialize, Serialize};

pub const DEFAULT_TITLE_LANGUAGE: &str = "pt-BR";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitlesRequest {
    pub topic: String,
    #[serde(default)]
    pub language: Option<String>,
}

impl TitlesRequest {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            language: None,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn language(&self) -> &str {
        self.language
            .as_deref()
            .filter(|lang| !lang.trim().is_empty())
            .unwrap_or(DEFAULT_TITLE_LANGUAGE)
    }
}
