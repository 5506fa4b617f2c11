//! Completion client factory
//!
//! Validates provider configuration up front: a missing API key or unknown
//! provider name fails here, at construction time, before any discussion
//! event can be emitted.

use super::http::HttpCompletionClient;
use colloquy_application::ports::completion::{
    CompletionClient, CompletionError, CompletionFactory,
};
use colloquy_domain::ModelId;
use std::sync::Arc;
use std::time::Duration;

const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Supported completion providers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenRouter,
    OpenAi,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenRouter => "openrouter",
            Provider::OpenAi => "openai",
        }
    }

    fn default_base_url(&self) -> &'static str {
        match self {
            Provider::OpenRouter => OPENROUTER_BASE_URL,
            Provider::OpenAi => OPENAI_BASE_URL,
        }
    }

    fn api_key_env_var(&self) -> &'static str {
        match self {
            Provider::OpenRouter => "OPENROUTER_API_KEY",
            Provider::OpenAi => "OPENAI_API_KEY",
        }
    }
}

impl std::str::FromStr for Provider {
    type Err = CompletionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openrouter" => Ok(Provider::OpenRouter),
            "openai" => Ok(Provider::OpenAi),
            other => Err(CompletionError::UnsupportedProvider(other.to_string())),
        }
    }
}

/// Raw provider settings, typically deserialized from config
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub provider: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    /// Generate-level retries on the non-streaming path
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            provider: "openrouter".to_string(),
            api_key: None,
            base_url: None,
            max_retries: 2,
            retry_delay: Duration::from_millis(500),
        }
    }
}

/// Factory producing [`HttpCompletionClient`]s, one per model
pub struct HttpCompletionFactory {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    max_retries: u32,
    retry_delay: Duration,
}

impl HttpCompletionFactory {
    /// Validate settings and build the factory.
    ///
    /// The API key comes from the settings or from the provider's
    /// environment variable; neither being set is a hard error.
    pub fn new(settings: ProviderSettings) -> Result<Self, CompletionError> {
        let provider: Provider = settings.provider.parse()?;

        let api_key = settings
            .api_key
            .filter(|key| !key.trim().is_empty())
            .or_else(|| std::env::var(provider.api_key_env_var()).ok())
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| CompletionError::MissingCredentials(provider.as_str().to_string()))?;

        let base_url = settings
            .base_url
            .unwrap_or_else(|| provider.default_base_url().to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            api_key,
            max_retries: settings.max_retries,
            retry_delay: settings.retry_delay,
        })
    }
}

impl CompletionFactory for HttpCompletionFactory {
    fn create(&self, model: &ModelId) -> Result<Arc<dyn CompletionClient>, CompletionError> {
        Ok(Arc::new(HttpCompletionClient::new(
            self.http.clone(),
            model.clone(),
            self.base_url.clone(),
            self.api_key.clone(),
            self.max_retries,
            self.retry_delay,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_with_key(provider: &str) -> ProviderSettings {
        ProviderSettings {
            provider: provider.to_string(),
            api_key: Some("sk-test".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_provider_parse() {
        assert_eq!("openrouter".parse::<Provider>().unwrap(), Provider::OpenRouter);
        assert_eq!(" OpenAI ".parse::<Provider>().unwrap(), Provider::OpenAi);
        assert!(matches!(
            "azure".parse::<Provider>(),
            Err(CompletionError::UnsupportedProvider(_))
        ));
    }

    #[test]
    fn test_factory_accepts_explicit_key() {
        let factory = HttpCompletionFactory::new(settings_with_key("openrouter")).unwrap();
        assert_eq!(factory.base_url, OPENROUTER_BASE_URL);

        let client = factory.create(&ModelId::new("openai/gpt-4o")).unwrap();
        assert_eq!(client.model(), &ModelId::new("openai/gpt-4o"));
    }

    #[test]
    fn test_factory_rejects_blank_key() {
        let settings = ProviderSettings {
            provider: "openai".to_string(),
            api_key: Some("   ".to_string()),
            ..Default::default()
        };
        // No env fallback in tests; a blank key must fail fast
        if std::env::var("OPENAI_API_KEY").is_err() {
            assert!(matches!(
                HttpCompletionFactory::new(settings),
                Err(CompletionError::MissingCredentials(_))
            ));
        }
    }

    #[test]
    fn test_factory_rejects_unknown_provider() {
        assert!(matches!(
            HttpCompletionFactory::new(settings_with_key("bedrock")),
            Err(CompletionError::UnsupportedProvider(_))
        ));
    }

    #[test]
    fn test_custom_base_url_trailing_slash_trimmed() {
        let settings = ProviderSettings {
            base_url: Some("https://proxy.internal/v1/".to_string()),
            ..settings_with_key("openai")
        };
        let factory = HttpCompletionFactory::new(settings).unwrap();
        assert_eq!(factory.base_url, "https://proxy.internal/v1");
    }
}
