//! Configuration loading
//!
//! Handles loading configuration from embedded defaults, files, and environment.

use super::config::AppConfig;
use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};

/// Embedded default configuration (compiled into binary)
pub const DEFAULT_CONFIG: &str = include_str!("../../config/default.toml");

/// Unprefixed environment variables and the config keys they set
const PLAIN_ENV_KEYS: &[(&str, &str)] = &[
    ("DEFAULT_PROVIDER", "llm.default_provider"),
    ("DEFAULT_MODEL", "llm.default_model"),
    ("OPENAI_API_KEY", "llm.openai_api_key"),
    ("ANTHROPIC_API_KEY", "llm.anthropic_api_key"),
];

/// Load configuration from files and environment
pub fn load_config() -> Result<AppConfig> {
    let overrides: Vec<(&str, Option<String>)> = PLAIN_ENV_KEYS
        .iter()
        .map(|(var, key)| (*key, std::env::var(var).ok().filter(|v| !v.is_empty())))
        .collect();

    build_config(&overrides, true)
}

/// Layer embedded defaults, optional files, environment and explicit overrides
fn build_config(overrides: &[(&str, Option<String>)], read_env: bool) -> Result<AppConfig> {
    let mut builder = Config::builder()
        // 1. Embedded defaults (always available)
        .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
        // 2. Local overrides (optional)
        .add_source(File::with_name("config/local").required(false));

    // 3. Prefixed environment variables, e.g. AUTODIAG_SERVER__PORT=8080
    if read_env {
        builder = builder.add_source(
            Environment::with_prefix("AUTODIAG")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );
    }

    // 4. Plain provider variables (highest priority)
    for (key, value) in overrides {
        builder = builder
            .set_override_option(*key, value.clone())
            .with_context(|| format!("Failed to apply override for {key}"))?;
    }

    builder
        .build()
        .context("Failed to build configuration")?
        .try_deserialize()
        .context("Failed to deserialize configuration")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::config::Pipeline;

    #[test]
    fn test_embedded_defaults_parse() {
        let config = build_config(&[], false).unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.llm.default_provider, "openai");
        assert_eq!(config.llm.default_model, "");
        assert!(config.llm.openai_api_key.is_none());
        assert_eq!(config.pipeline, Pipeline::Structured);
        assert_eq!(
            config.enrichment.parts_base_url,
            "https://www.oreillyauto.com"
        );
    }

    #[test]
    fn test_plain_overrides_win() {
        let overrides = [
            ("llm.default_provider", Some("anthropic".to_string())),
            ("llm.default_model", Some("claude-haiku".to_string())),
            ("llm.anthropic_api_key", Some("sk-ant-abcdefghijkl".to_string())),
            ("llm.openai_api_key", None),
        ];
        let config = build_config(&overrides, false).unwrap();

        assert_eq!(config.llm.default_provider, "anthropic");
        assert_eq!(config.llm.default_model, "claude-haiku");
        assert_eq!(
            config.llm.anthropic_api_key.as_deref(),
            Some("sk-ant-abcdefghijkl")
        );
        assert!(config.llm.openai_api_key.is_none());
    }
}
