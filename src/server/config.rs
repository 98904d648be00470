//! Server configuration types

use autodiag_llm::util::mask_api_key;
use autodiag_llm::{LlmConfig, ProviderKind, ProviderSettings};
use autodiag_search::SearchConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub llm: LlmAppConfig,
    #[serde(default)]
    pub enrichment: SearchConfig,
    #[serde(default)]
    pub pipeline: Pipeline,
}

/// Which handler pipeline the deployment runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pipeline {
    /// JSON schema output, normalized
    #[default]
    Structured,
    /// Plain-text guide with scraped links appended
    Enriched,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// LLM configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct LlmAppConfig {
    /// Provider used when the request names none
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Model used when the request names none; empty selects the provider default
    #[serde(default)]
    pub default_model: String,
    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,
    #[serde(default = "default_anthropic_base_url")]
    pub anthropic_base_url: String,
    #[serde(default, skip_serializing)]
    pub openai_api_key: Option<String>,
    #[serde(default, skip_serializing)]
    pub anthropic_api_key: Option<String>,
}

fn default_provider() -> String {
    ProviderKind::default().as_str().to_string()
}

fn default_openai_base_url() -> String {
    ProviderKind::OpenAi.default_base_url().to_string()
}

fn default_anthropic_base_url() -> String {
    ProviderKind::Anthropic.default_base_url().to_string()
}

impl Default for LlmAppConfig {
    fn default() -> Self {
        Self {
            default_provider: default_provider(),
            default_model: String::new(),
            openai_base_url: default_openai_base_url(),
            anthropic_base_url: default_anthropic_base_url(),
            openai_api_key: None,
            anthropic_api_key: None,
        }
    }
}

// SECURITY: Custom Debug implementation to mask API keys
impl fmt::Debug for LlmAppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmAppConfig")
            .field("default_provider", &self.default_provider)
            .field("default_model", &self.default_model)
            .field("openai_base_url", &self.openai_base_url)
            .field("anthropic_base_url", &self.anthropic_base_url)
            .field(
                "openai_api_key",
                &self.openai_api_key.as_deref().map(mask_api_key),
            )
            .field(
                "anthropic_api_key",
                &self.anthropic_api_key.as_deref().map(mask_api_key),
            )
            .finish()
    }
}

impl LlmAppConfig {
    /// Provider settings for the LLM client
    pub fn provider_settings(&self) -> LlmConfig {
        let with_key = |settings: ProviderSettings, key: &Option<String>| match key {
            Some(key) => settings.with_api_key(key.clone()),
            None => settings,
        };

        LlmConfig {
            openai: with_key(
                ProviderSettings::default().with_base_url(&self.openai_base_url),
                &self.openai_api_key,
            ),
            anthropic: with_key(
                ProviderSettings::default().with_base_url(&self.anthropic_base_url),
                &self.anthropic_api_key,
            ),
        }
    }
}
