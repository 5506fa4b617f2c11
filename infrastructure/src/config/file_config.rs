//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the config file and are
//! deserialized directly. Conversion to richer types happens at the edges.

use crate::providers::ProviderSettings;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Discussion defaults
    pub discussion: FileDiscussionConfig,
    /// Completion provider settings
    pub provider: FileProviderConfig,
}

/// `[discussion]` section
///
/// # Example
///
/// ```toml
/// [discussion]
/// rounds = 4
/// language = "en"
/// moderator = false
/// model = "openai/gpt-4o-mini"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDiscussionConfig {
    /// Total rounds per discussion
    pub rounds: u32,
    /// Target language code for all generated text
    pub language: String,
    /// Whether moderator-prompt events are emitted
    pub moderator: bool,
    /// Fallback model for experts without an override
    pub model: String,
}

impl Default for FileDiscussionConfig {
    fn default() -> Self {
        Self {
            rounds: 3,
            language: "en".to_string(),
            moderator: false,
            model: "openai/gpt-4o-mini".to_string(),
        }
    }
}

/// `[provider]` section
///
/// # Example
///
/// ```toml
/// [provider]
/// name = "openrouter"
/// api_key = "sk-or-..."        # or set OPENROUTER_API_KEY
/// max_retries = 2
/// retry_delay_ms = 500
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Provider name: "openrouter" or "openai"
    pub name: String,
    /// API key; falls back to the provider's environment variable
    pub api_key: Option<String>,
    /// Override for the provider's base URL
    pub base_url: Option<String>,
    /// Generate-level retries on the non-streaming path
    pub max_retries: u32,
    /// Delay between generate-level retries, in milliseconds
    pub retry_delay_ms: u64,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            name: "openrouter".to_string(),
            api_key: None,
            base_url: None,
            max_retries: 2,
            retry_delay_ms: 500,
        }
    }
}

impl FileProviderConfig {
    /// Convert to the factory's settings type
    pub fn to_settings(&self) -> ProviderSettings {
        ProviderSettings {
            provider: self.name.clone(),
            api_key: self.api_key.clone(),
            base_url: self.base_url.clone(),
            max_retries: self.max_retries,
            retry_delay: Duration::from_millis(self.retry_delay_ms),
        }
    }
}
