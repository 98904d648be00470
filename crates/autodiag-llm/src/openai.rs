//! OpenAI - Chat Completions provider
//!
//! Bearer-token authentication, system + user messages, and JSON mode when the
//! caller expects a JSON object.
//! The generated text is read from `choices[0].message.content`.

use crate::error::Result;
use crate::provider::{send_json, OutputFormat, ProviderKind, ProviderSettings};
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

/// Default model when the request names none
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

const TEMPERATURE: f32 = 0.2;

// ============================================================================
// API Types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    r#type: &'static str,
}

fn build_request<'a>(
    model: &'a str,
    format: OutputFormat,
    system: &'a str,
    prompt: &'a str,
) -> ChatRequest<'a> {
    ChatRequest {
        model,
        messages: [
            ChatMessage {
                role: "system",
                content: system,
            },
            ChatMessage {
                role: "user",
                content: prompt,
            },
        ],
        temperature: TEMPERATURE,
        response_format: match format {
            OutputFormat::Json => Some(ResponseFormat {
                r#type: "json_object",
            }),
            OutputFormat::Text => None,
        },
    }
}

/// First completion text, or empty if the shape is unrecognized
fn extract_text(response: &serde_json::Value) -> String {
    response
        .pointer("/choices/0/message/content")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default()
        .to_string()
}

pub(crate) async fn generate(
    http: &Client,
    settings: &ProviderSettings,
    api_key: &str,
    model: &str,
    format: OutputFormat,
    system: &str,
    prompt: &str,
) -> Result<String> {
    let url = settings.endpoint("/v1/chat/completions");
    debug!("Sending request to OpenAI: {}", url);

    let request = http.post(&url).bearer_auth(api_key);
    let body = build_request(model, format, system, prompt);
    let response = send_json(ProviderKind::OpenAi, request, &body).await?;

    Ok(extract_text(&response))
}
