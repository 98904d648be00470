//! Diagnose endpoint
//!
//! `POST /diagnose` turns form fields into a prompt, asks the configured
//! provider, and returns either the normalized diagnostic schema or, for the
//! enriched pipeline, a plain-text guide with reference links appended.

use anyhow::Result;
use autodiag_core::{
    build_prompt, build_text_prompt, coerce, normalize, search_query, DiagnosticRequest,
    DiagnosticResult, SYSTEM_PROMPT, TEXT_SYSTEM_PROMPT,
};
use autodiag_llm::{LlmClient, OutputFormat, ProviderKind};
use autodiag_search::LinkFinder;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::post;
use axum::Router;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

use crate::server::config::{AppConfig, Pipeline};

/// Shared, read-only handler state
#[derive(Debug, Clone)]
pub struct DiagnoseState {
    pub llm: LlmClient,
    pub links: LinkFinder,
    pub default_provider: String,
    pub default_model: String,
    pub pipeline: Pipeline,
}

impl DiagnoseState {
    /// Build handler state from loaded configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            llm: LlmClient::new(config.llm.provider_settings())?,
            links: LinkFinder::new(config.enrichment.clone()),
            default_provider: config.llm.default_provider.clone(),
            default_model: config.llm.default_model.clone(),
            pipeline: config.pipeline,
        })
    }
}

/// Diagnosis payload
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DiagnosisData {
    /// Normalized schema (structured pipeline)
    Structured(DiagnosticResult),
    /// Guide text with links (enriched pipeline)
    Text(String),
}

/// Successful diagnosis with the raw model output
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnosis {
    pub data: DiagnosisData,
    pub raw: String,
}

/// Response envelope
#[derive(Debug, Serialize)]
pub struct DiagnoseResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<DiagnosisData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DiagnoseResponse {
    pub fn success(diagnosis: Diagnosis) -> Self {
        Self {
            ok: true,
            data: Some(diagnosis.data),
            raw: Some(diagnosis.raw),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            raw: None,
            error: Some(message.into()),
        }
    }
}

/// Run one diagnosis with the deployment's pipeline
pub async fn run_diagnosis(
    state: &DiagnoseState,
    request: &DiagnosticRequest,
) -> Result<Diagnosis> {
    let provider: ProviderKind = request
        .provider()
        .unwrap_or(state.default_provider.as_str())
        .parse()?;
    let model = request
        .model_name()
        .unwrap_or(state.default_model.as_str());

    info!(
        provider = %provider,
        pipeline = ?state.pipeline,
        "Running diagnosis"
    );

    match state.pipeline {
        Pipeline::Structured => {
            let prompt = build_prompt(request);
            let raw = state
                .llm
                .generate(provider, model, OutputFormat::Json, SYSTEM_PROMPT, &prompt)
                .await?;
            let data = normalize(&coerce(&raw));

            Ok(Diagnosis {
                data: DiagnosisData::Structured(data),
                raw,
            })
        }
        Pipeline::Enriched => {
            let prompt = build_text_prompt(request);
            let raw = state
                .llm
                .generate(provider, model, OutputFormat::Text, TEXT_SYSTEM_PROMPT, &prompt)
                .await?;

            let query = search_query(request);
            let links = if query.is_empty() {
                Default::default()
            } else {
                state.links.enrich(&query).await
            };

            let text = if links.is_empty() {
                raw.clone()
            } else {
                format!("{}\n\n{}", raw.trim_end(), links.to_text())
            };

            Ok(Diagnosis {
                data: DiagnosisData::Text(text),
                raw,
            })
        }
    }
}

/// Handle `POST /diagnose`
///
/// Malformed bodies get the same 500 envelope as every other failure.
async fn diagnose(
    State(state): State<Arc<DiagnoseState>>,
    body: Bytes,
) -> (StatusCode, Json<DiagnoseResponse>) {
    let outcome = match serde_json::from_slice::<DiagnosticRequest>(&body) {
        Ok(request) => run_diagnosis(&state, &request).await,
        Err(e) => Err(e.into()),
    };

    match outcome {
        Ok(diagnosis) => (StatusCode::OK, Json(DiagnoseResponse::success(diagnosis))),
        Err(e) => {
            error!("Diagnosis failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(DiagnoseResponse::error(e.to_string())),
            )
        }
    }
}

/// Create diagnose routes
pub fn diagnose_routes(state: Arc<DiagnoseState>) -> Router {
    Router::new()
        .route("/diagnose", post(diagnose))
        .with_state(state)
}
