//! Provider - tagged union over hosted LLM backends
//!
//! Each `ProviderKind` case owns its own request envelope and response path
//! (see the `openai` and `anthropic` modules). Adding a provider means adding
//! a case here and a module next to the existing ones.

use crate::error::{Error, Result};
use crate::util::mask_api_key;
use crate::{anthropic, openai};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::instrument;

/// Supported providers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// OpenAI Chat Completions (primary)
    #[default]
    OpenAi,
    /// Anthropic Messages (secondary)
    Anthropic,
}

impl ProviderKind {
    /// Identifier used in requests and configuration
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
        }
    }

    /// Human-readable name used in error messages
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::OpenAi => "OpenAI",
            Self::Anthropic => "Anthropic",
        }
    }

    /// Environment variable holding the credential
    #[must_use]
    pub fn credential_env(&self) -> &'static str {
        match self {
            Self::OpenAi => "OPENAI_API_KEY",
            Self::Anthropic => "ANTHROPIC_API_KEY",
        }
    }

    /// Model used when the caller does not name one
    #[must_use]
    pub fn default_model(&self) -> &'static str {
        match self {
            Self::OpenAi => openai::DEFAULT_MODEL,
            Self::Anthropic => anthropic::DEFAULT_MODEL,
        }
    }

    /// Public API origin
    #[must_use]
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::OpenAi => openai::DEFAULT_BASE_URL,
            Self::Anthropic => anthropic::DEFAULT_BASE_URL,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "openai" => Ok(Self::OpenAi),
            "anthropic" => Ok(Self::Anthropic),
            other => Err(Error::UnsupportedProvider(other.to_string())),
        }
    }
}

/// Shape of the text the caller expects back
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    /// A single JSON object; providers with a JSON mode are asked to enforce it
    #[default]
    Json,
    /// Free-form text
    Text,
}

/// Endpoint and credential for one provider
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ProviderSettings {
    /// API key, checked at call time
    pub api_key: Option<String>,
    /// API origin without trailing slash
    pub base_url: String,
}

// SECURITY: Custom Debug implementation to mask API key
impl fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("api_key", &self.api_key.as_deref().map(mask_api_key))
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ProviderSettings {
    /// Settings pointing at the provider's public API
    #[must_use]
    pub fn for_provider(kind: ProviderKind) -> Self {
        Self {
            api_key: None,
            base_url: kind.default_base_url().to_string(),
        }
    }

    /// Set the API key
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Whether a non-empty API key is configured
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.usable_key().is_some()
    }

    fn usable_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.is_empty())
    }

    /// The API key, or a configuration error naming the missing variable
    pub(crate) fn require_key(&self, kind: ProviderKind) -> Result<&str> {
        self.usable_key()
            .ok_or_else(|| Error::Configuration(kind.credential_env().to_string()))
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// Settings for every provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmConfig {
    /// OpenAI settings
    pub openai: ProviderSettings,
    /// Anthropic settings
    pub anthropic: ProviderSettings,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            openai: ProviderSettings::for_provider(ProviderKind::OpenAi),
            anthropic: ProviderSettings::for_provider(ProviderKind::Anthropic),
        }
    }
}

impl LlmConfig {
    /// Settings for the given provider
    #[must_use]
    pub fn settings(&self, kind: ProviderKind) -> &ProviderSettings {
        match kind {
            ProviderKind::OpenAi => &self.openai,
            ProviderKind::Anthropic => &self.anthropic,
        }
    }
}

/// Dispatches prompts to the selected provider
#[derive(Debug, Clone)]
pub struct LlmClient {
    http: Client,
    config: LlmConfig,
}

impl LlmClient {
    /// Create a client with the given provider settings
    pub fn new(config: LlmConfig) -> Result<Self> {
        let http = Client::builder()
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self { http, config })
    }

    /// Provider settings in use
    #[must_use]
    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Send one prompt and return the generated text
    ///
    /// An empty `model` selects the provider default. `format` switches on
    /// OpenAI's JSON mode; Anthropic has none and relies on the prompt. Fails with
    /// [`Error::Configuration`] before any network I/O when the provider has no key.
    #[instrument(
        skip(self, system, prompt),
        fields(provider = %provider, model = %model, format = ?format)
    )]
    pub async fn generate(
        &self,
        provider: ProviderKind,
        model: &str,
        format: OutputFormat,
        system: &str,
        prompt: &str,
    ) -> Result<String> {
        let settings = self.config.settings(provider);
        let api_key = settings.require_key(provider)?;
        let model = if model.is_empty() {
            provider.default_model()
        } else {
            model
        };

        match provider {
            ProviderKind::OpenAi => {
                openai::generate(&self.http, settings, api_key, model, format, system, prompt)
                    .await
            }
            ProviderKind::Anthropic => {
                anthropic::generate(&self.http, settings, api_key, model, system, prompt).await
            }
        }
    }
}

/// Send a prepared JSON request and return the parsed JSON response
///
/// Non-success statuses become [`Error::Upstream`] with the raw body.
pub(crate) async fn send_json<T: Serialize + ?Sized>(
    provider: ProviderKind,
    request: RequestBuilder,
    body: &T,
) -> Result<serde_json::Value> {
    let response = request
        .json(body)
        .send()
        .await
        .map_err(|e| Error::Network(e.to_string()))?;

    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| Error::Network(e.to_string()))?;

    if !status.is_success() {
        return Err(Error::Upstream {
            provider: provider.display_name(),
            status: status.as_u16(),
            body: text,
        });
    }

    serde_json::from_str(&text).map_err(|e| Error::InvalidResponse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::any;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_provider_from_str() {
        assert_eq!("openai".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAi);
        assert_eq!(
            "anthropic".parse::<ProviderKind>().unwrap(),
            ProviderKind::Anthropic
        );

        let err = "gemini".parse::<ProviderKind>().unwrap_err();
        assert_eq!(err.to_string(), "Unsupported provider: gemini");
    }

    #[test]
    fn test_provider_serde_names() {
        assert_eq!(
            serde_json::to_string(&ProviderKind::OpenAi).unwrap(),
            "\"openai\""
        );
        let kind: ProviderKind = serde_json::from_str("\"anthropic\"").unwrap();
        assert_eq!(kind, ProviderKind::Anthropic);
    }

    #[test]
    fn test_settings_debug_masks_key() {
        let settings = ProviderSettings::for_provider(ProviderKind::OpenAi)
            .with_api_key("sk-1234567890abcdefghij");
        let debug_str = format!("{:?}", settings);

        assert!(!debug_str.contains("1234567890"));
        assert!(debug_str.contains("sk-1...ghij"));
    }

    #[test]
    fn test_empty_key_is_not_a_key() {
        let settings = ProviderSettings::default();
        assert!(!settings.has_api_key());
        assert!(!settings.clone().with_api_key("").has_api_key());
        assert!(settings.with_api_key("sk-abc").has_api_key());
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let settings = ProviderSettings::default().with_base_url("http://localhost:9000/");
        assert_eq!(
            settings.endpoint("/v1/messages"),
            "http://localhost:9000/v1/messages"
        );
    }

    #[tokio::test]
    async fn test_missing_credential_fails_before_network() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let config = LlmConfig {
            openai: ProviderSettings::default().with_base_url(server.uri()),
            anthropic: ProviderSettings::default()
                .with_base_url(server.uri())
                .with_api_key(""),
        };
        let client = LlmClient::new(config).unwrap();

        let err = client
            .generate(ProviderKind::OpenAi, "", OutputFormat::Json, "system", "prompt")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Configuration(ref v) if v == "OPENAI_API_KEY"));

        let err = client
            .generate(ProviderKind::Anthropic, "", OutputFormat::Json, "system", "prompt")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Missing ANTHROPIC_API_KEY");
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_network_error() {
        // Port 9 (discard) is not expected to accept HTTP connections.
        let config = LlmConfig {
            openai: ProviderSettings::default()
                .with_base_url("http://127.0.0.1:9")
                .with_api_key("sk-test-key-123456"),
            ..LlmConfig::default()
        };
        let client = LlmClient::new(config).unwrap();

        let err = client
            .generate(ProviderKind::OpenAi, "", OutputFormat::Json, "system", "prompt")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Network(_)));
    }
}
