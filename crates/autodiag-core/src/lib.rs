//! Autodiag Core - diagnostic data model and response handling
//!
//! This crate provides the provider-independent pieces of Autodiag:
//! - Types: `DiagnosticRequest` input and the fixed `DiagnosticResult` schema
//! - Prompt: natural-language prompt construction from request fields
//! - Normalize: best-effort JSON coercion of model output and total schema mapping

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod normalize;
pub mod prompt;
pub mod types;

pub use normalize::{coerce, normalize};
pub use prompt::{
    build_prompt, build_text_prompt, search_query, vehicle_query, SYSTEM_PROMPT,
    TEXT_SYSTEM_PROMPT,
};
pub use types::{DiagnosticRequest, DiagnosticResult, DiagnosticTest, Difficulty};
