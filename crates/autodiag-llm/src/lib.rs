//! Autodiag LLM - hosted model provider adapters
//!
//! This crate turns a single prompt into one blocking round trip against a
//! hosted text-generation API:
//! - Provider: `ProviderKind` tagged union and the `LlmClient` dispatcher
//! - OpenAI: Chat Completions envelope
//! - Anthropic: Messages envelope

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod anthropic;
pub mod error;
pub mod openai;
pub mod provider;
pub mod util;

pub use error::{Error, Result};
pub use provider::{LlmClient, LlmConfig, OutputFormat, ProviderKind, ProviderSettings};
