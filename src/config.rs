use std::env;
use std::time::Duration;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_POLLINATIONS_TEXT_URL: &str = "https://text.pollinations.ai";
pub const DEFAULT_POLLINATIONS_IMAGE_URL: &str = "https://image.pollinations.ai";

const SUPABASE_PLACEHOLDER_URL: &str = "https://your-project.supabase.co";
const SUPABASE_PLACEHOLDER_KEY: &str = "your-anon-key";

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub text_model: String,
    pub image_models: Vec<String>,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct PollinationsConfig {
    pub text_url: String,
    pub image_url: String,
    pub text_model: String,
    pub image_model: String,
}

#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub url: Option<String>,
    pub anon_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: Option<u16>,
    pub enhance_prompts: bool,
    pub enhance_timeout: Duration,
    pub gemini: GeminiConfig,
    pub pollinations: PollinationsConfig,
    pub supabase: SupabaseConfig,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        GeminiConfig {
            api_key: None,
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            text_model: "gemini-2.0-flash".to_string(),
            image_models: vec![
                "gemini-2.5-flash-image".to_string(),
                "gemini-2.0-flash-exp".to_string(),
            ],
            timeout: Duration::from_secs(30),
        }
    }
}

impl GeminiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `GEMINI_API_KEY`, falling back to the legacy `API_KEY`.
    pub fn from_env() -> Self {
        let api_key = env::var("GEMINI_API_KEY")
            .or_else(|_| env::var("API_KEY"))
            .ok()
            .filter(|key| !key.trim().is_empty());
        let base_url =
            env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_GEMINI_BASE_URL.to_string());

        GeminiConfig {
            api_key,
            base_url,
            ..Default::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_image_models(mut self, models: Vec<String>) -> Self {
        self.image_models = models;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Default for PollinationsConfig {
    fn default() -> Self {
        PollinationsConfig {
            text_url: DEFAULT_POLLINATIONS_TEXT_URL.to_string(),
            image_url: DEFAULT_POLLINATIONS_IMAGE_URL.to_string(),
            text_model: "openai".to_string(),
            image_model: "flux".to_string(),
        }
    }
}

impl PollinationsConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        PollinationsConfig {
            text_url: env::var("POLLINATIONS_TEXT_URL").unwrap_or(defaults.text_url),
            image_url: env::var("POLLINATIONS_IMAGE_URL").unwrap_or(defaults.image_url),
            ..defaults
        }
    }

    pub fn with_text_url(mut self, url: impl Into<String>) -> Self {
        self.text_url = url.into();
        self
    }

    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = url.into();
        self
    }
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        SupabaseConfig {
            url: None,
            anon_key: None,
        }
    }
}

impl SupabaseConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let url = env::var("SUPABASE_URL")
            .or_else(|_| env::var("VITE_SUPABASE_URL"))
            .ok();
        let anon_key = env::var("SUPABASE_ANON_KEY")
            .or_else(|_| env::var("VITE_SUPABASE_ANON_KEY"))
            .ok();

        SupabaseConfig { url, anon_key }
    }

    pub fn with_credentials(mut self, url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self.anon_key = Some(anon_key.into());
        self
    }

    /// Names of the settings that are absent or still hold deployment placeholders.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !is_real_value(self.url.as_deref(), SUPABASE_PLACEHOLDER_URL) {
            missing.push("SUPABASE_URL");
        }
        if !is_real_value(self.anon_key.as_deref(), SUPABASE_PLACEHOLDER_KEY) {
            missing.push("SUPABASE_ANON_KEY");
        }
        missing
    }

    pub fn is_configured(&self) -> bool {
        self.missing().is_empty()
    }
}

fn is_real_value(value: Option<&str>, placeholder: &str) -> bool {
    match value.map(str::trim) {
        Some(v) => !v.is_empty() && v != placeholder,
        None => false,
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: None,
            enhance_prompts: true,
            enhance_timeout: Duration::from_millis(4000),
            gemini: GeminiConfig::default(),
            pollinations: PollinationsConfig::default(),
            supabase: SupabaseConfig::default(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let port = env::var("PORT").ok().and_then(|port| port.parse().ok());
        let enhance_prompts = env::var("ENHANCE_PROMPTS")
            .ok()
            .map_or(true, |val| val != "false" && val != "0");
        let enhance_timeout = env::var("ENHANCE_TIMEOUT_MS")
            .ok()
            .and_then(|ms| ms.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or_else(|| Duration::from_millis(4000));

        Config {
            port,
            enhance_prompts,
            enhance_timeout,
            gemini: GeminiConfig::from_env(),
            pollinations: PollinationsConfig::from_env(),
            supabase: SupabaseConfig::from_env(),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_enhancement(mut self, enabled: bool) -> Self {
        self.enhance_prompts = enabled;
        self
    }

    pub fn with_enhance_timeout(mut self, timeout: Duration) -> Self {
        self.enhance_timeout = timeout;
        self
    }

    pub fn with_gemini(mut self, config: GeminiConfig) -> Self {
        self.gemini = config;
        self
    }

    pub fn with_pollinations(mut self, config: PollinationsConfig) -> Self {
        self.pollinations = config;
        self
    }

    pub fn with_supabase(mut self, config: SupabaseConfig) -> Self {
        self.supabase = config;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supabase_placeholders_count_as_missing() {
        let config = SupabaseConfig::new()
            .with_credentials("https://your-project.supabase.co", "your-anon-key");
        assert_eq!(config.missing(), vec!["SUPABASE_URL", "SUPABASE_ANON_KEY"]);

        let config = SupabaseConfig::new().with_credentials("https://abc.supabase.co", "  ");
        assert_eq!(config.missing(), vec!["SUPABASE_ANON_KEY"]);

        let config = SupabaseConfig::new().with_credentials("https://abc.supabase.co", "key");
        assert!(config.is_configured());
    }

    #[test]
    fn test_defaults() {
        let config = Config::new();
        assert!(config.enhance_prompts);
        assert_eq!(config.enhance_timeout, Duration::from_millis(4000));
        assert!(!config.gemini.is_configured());
        assert_eq!(
            config.gemini.image_models,
            vec!["gemini-2.5-flash-image", "gemini-2.0-flash-exp"]
        );
        assert_eq!(config.pollinations.image_model, "flux");
    }

    #[test]
    fn test_builders() {
        let config = Config::new()
            .with_port(9000)
            .with_enhancement(false)
            .with_gemini(GeminiConfig::new().with_api_key("k"));
        assert_eq!(config.port, Some(9000));
        assert!(!config.enhance_prompts);
        assert!(config.gemini.is_configured());
    }
}
