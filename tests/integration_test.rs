//! Integration tests for Autodiag
//!
//! These tests verify the integration between the workspace crates:
//! - autodiag-core: prompt construction and response normalization
//! - autodiag-llm: provider envelopes against a mock upstream
//! - autodiag-search: link enrichment against mock search pages

use autodiag_core::{
    build_prompt, build_text_prompt, coerce, normalize, search_query, DiagnosticRequest,
    Difficulty, SYSTEM_PROMPT, TEXT_SYSTEM_PROMPT,
};
use autodiag_llm::{
    Error, LlmClient, LlmConfig, OutputFormat, ProviderKind, ProviderSettings,
};
use autodiag_search::{LinkFinder, SearchConfig, MAX_LINKS};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn civic_request() -> DiagnosticRequest {
    DiagnosticRequest {
        year: Some("2012".to_string()),
        make: Some("Honda".to_string()),
        model: Some("Civic".to_string()),
        part: Some("ignition coil".to_string()),
        code: Some("P0301".to_string()),
        notes: Some("rough idle when cold".to_string()),
        ..DiagnosticRequest::default()
    }
}

fn client_for(server: &MockServer) -> LlmClient {
    let settings = ProviderSettings::default()
        .with_base_url(server.uri())
        .with_api_key("sk-integration-0123456789");
    LlmClient::new(LlmConfig {
        openai: settings.clone(),
        anthropic: settings,
    })
    .unwrap()
}

// ============================================================================
// Prompt -> Provider -> Normalize
// ============================================================================

#[tokio::test]
async fn test_openai_round_trip_normalizes_schema() {
    let server = MockServer::start().await;
    let request = civic_request();
    let prompt = build_prompt(&request);

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": prompt}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "```json\n{\"summary\":\"Cylinder 1 misfire\",\"trouble_code\":\"P0301\",\"estimated_difficulty\":\"hard\",\"tests\":[{\"name\":\"Swap coils\",\"steps\":[\"Move coil 1 to 2\",3]}]}\n```"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let raw = client_for(&server)
        .generate(ProviderKind::OpenAi, "", OutputFormat::Json, SYSTEM_PROMPT, &prompt)
        .await
        .unwrap();
    let result = normalize(&coerce(&raw));

    assert_eq!(result.summary, "Cylinder 1 misfire");
    assert_eq!(result.trouble_code, "P0301");
    assert_eq!(result.estimated_difficulty, Difficulty::Hard);
    assert_eq!(result.tests.len(), 1);
    assert_eq!(result.tests[0].steps, vec!["Move coil 1 to 2", "3"]);
    assert!(result.probable_causes.is_empty());
}

#[tokio::test]
async fn test_anthropic_round_trip_with_prose_reply() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "sk-integration-0123456789"))
        .and(header("anthropic-version", "2023-06-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{"type": "text", "text": "I need more details about the vehicle."}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let raw = client_for(&server)
        .generate(
            ProviderKind::Anthropic,
            "",
            OutputFormat::Json,
            SYSTEM_PROMPT,
            &build_prompt(&DiagnosticRequest::default()),
        )
        .await
        .unwrap();
    let result = normalize(&coerce(&raw));

    assert_eq!(result.summary, "I need more details about the vehicle.");
    assert_eq!(result.estimated_difficulty, Difficulty::Moderate);
    assert!(result.tests.is_empty());
}

#[tokio::test]
async fn test_missing_key_fails_before_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = LlmClient::new(LlmConfig {
        openai: ProviderSettings::default().with_base_url(server.uri()),
        ..LlmConfig::default()
    })
    .unwrap();

    let err = client
        .generate(ProviderKind::OpenAi, "", OutputFormat::Json, SYSTEM_PROMPT, "prompt")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Configuration(_)));
    assert_eq!(err.to_string(), "Missing OPENAI_API_KEY");
}

// ============================================================================
// Enrichment
// ============================================================================

#[tokio::test]
async fn test_text_prompt_and_links_for_same_request() {
    let server = MockServer::start().await;
    let request = civic_request();
    let query = search_query(&request);

    assert_eq!(query, "2012 Honda Civic ignition coil P0301");
    assert!(build_text_prompt(&request).contains("P0301"));
    assert!(!TEXT_SYSTEM_PROMPT.contains("JSON only"));

    let anchors: String = (1..=5)
        .map(|i| format!(r#"<a href="/detail/c/coil/{i}">Coil {i}</a>"#))
        .collect();
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", query.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string(anchors))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/results"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&server)
        .await;

    let links = LinkFinder::new(SearchConfig {
        parts_base_url: server.uri(),
        video_base_url: server.uri(),
    })
    .enrich(&query)
    .await;

    assert_eq!(links.parts.len(), MAX_LINKS);
    assert_eq!(links.parts[0], format!("{}/detail/c/coil/1", server.uri()));
    assert!(links.videos.is_empty());
    assert!(links.to_text().starts_with("🛒 Parts:\n"));
    assert!(!links.to_text().contains("Videos"));
}
