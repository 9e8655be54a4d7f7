use thiserror::Error;

#[derive(Debug, Error)]
pub enum ThumbError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Request error: {0}")]
    RequestError(String),
    #[error("Response error: {0}")]
    ResponseError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Provider error ({provider}): {message}")]
    ProviderError { provider: String, message: String },
    #[error("Timed out after {0}ms")]
    Timeout(u64),
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ThumbError {
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        ThumbError::ProviderError {
            provider: provider.into(),
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for ThumbError {
    fn from(e: serde_json::Error) -> Self {
        ThumbError::SerializationError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ThumbError>;
