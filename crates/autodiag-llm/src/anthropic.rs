//! Anthropic - Claude Messages provider
//!
//! `x-api-key` authentication with a pinned API version. The generated text is
//! read from `content[0].text`.

use crate::error::Result;
use crate::provider::{send_json, ProviderKind, ProviderSettings};
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

/// Anthropic API version
const API_VERSION: &str = "2023-06-01";

/// Default model when the request names none
pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20240620";

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

const MAX_TOKENS: u32 = 2000;

// ============================================================================
// API Types
// ============================================================================

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: [UserMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct UserMessage<'a> {
    role: &'static str,
    content: &'a str,
}

fn build_request<'a>(model: &'a str, system: &'a str, prompt: &'a str) -> MessagesRequest<'a> {
    MessagesRequest {
        model,
        max_tokens: MAX_TOKENS,
        system,
        messages: [UserMessage {
            role: "user",
            content: prompt,
        }],
    }
}

/// First content block text, or empty if the shape is unrecognized
fn extract_text(response: &serde_json::Value) -> String {
    response
        .pointer("/content/0/text")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default()
        .to_string()
}

pub(crate) async fn generate(
    http: &Client,
    settings: &ProviderSettings,
    api_key: &str,
    model: &str,
    system: &str,
    prompt: &str,
) -> Result<String> {
    let url = settings.endpoint("/v1/messages");
    debug!("Sending request to Anthropic: {}", url);

    let request = http
        .post(&url)
        .header("x-api-key", api_key)
        .header("anthropic-version", API_VERSION);
    let body = build_request(model, system, prompt);
    let response = send_json(ProviderKind::Anthropic, request, &body).await?;

    Ok(extract_text(&response))
}
