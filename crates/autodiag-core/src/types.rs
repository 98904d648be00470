//! Request and result types

use crate::normalize::{is_truthy, stringify};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Incoming diagnostic query
///
/// Every field is optional and accepts any JSON value. Numbers and booleans are
/// rendered as text; `null`, `false`, `0` and `""` count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticRequest {
    /// Model year, e.g. "2012"
    #[serde(default, deserialize_with = "loose_field")]
    pub year: Option<String>,
    /// Manufacturer, e.g. "Honda"
    #[serde(default, deserialize_with = "loose_field")]
    pub make: Option<String>,
    /// Vehicle model, e.g. "Civic"
    #[serde(default, deserialize_with = "loose_field")]
    pub model: Option<String>,
    /// Part the user suspects
    #[serde(default, deserialize_with = "loose_field")]
    pub part: Option<String>,
    /// OBD-II trouble code, e.g. "P0301"
    #[serde(default, deserialize_with = "loose_field")]
    pub code: Option<String>,
    /// Free-form symptoms
    #[serde(default, deserialize_with = "loose_field")]
    pub notes: Option<String>,
    /// Provider identifier ("openai" or "anthropic")
    #[serde(default, deserialize_with = "loose_field")]
    pub provider: Option<String>,
    /// Provider model name override
    #[serde(default, deserialize_with = "loose_field")]
    pub model_name: Option<String>,
}

/// Accept any JSON value for a form field, keeping only truthy ones as text
fn loose_field<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(is_truthy(&value).then(|| stringify(&value)))
}

/// Returns the field value if it is present and non-empty
pub(crate) fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

impl DiagnosticRequest {
    /// Provider requested by the caller, if any
    #[must_use]
    pub fn provider(&self) -> Option<&str> {
        non_empty(&self.provider)
    }

    /// Model name requested by the caller, if any
    #[must_use]
    pub fn model_name(&self) -> Option<&str> {
        non_empty(&self.model_name)
    }
}

/// Estimated repair difficulty
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Beginner-friendly
    Easy,
    /// Some experience needed
    #[default]
    Moderate,
    /// Shop-level job
    Hard,
}

impl Difficulty {
    /// Parse the exact lowercase label, rejecting anything else
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "easy" => Some(Self::Easy),
            "moderate" => Some(Self::Moderate),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }

    /// Returns the string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Moderate => "moderate",
            Self::Hard => "hard",
        }
    }
}

/// A single diagnostic test with its steps
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticTest {
    /// Test name
    pub name: String,
    /// Ordered steps
    pub steps: Vec<String>,
}

/// Normalized diagnostic guide
///
/// Every field is always present; see [`crate::normalize::normalize`] for the defaulting rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticResult {
    /// Plain-language overview
    pub summary: String,
    /// Trouble code discussed, if any
    pub trouble_code: String,
    /// Likely causes, most probable first
    pub probable_causes: Vec<String>,
    /// Tests to narrow down the cause
    pub tests: Vec<DiagnosticTest>,
    /// Parts that may need replacing
    pub recommended_parts: Vec<String>,
    /// Overall difficulty
    pub estimated_difficulty: Difficulty,
    /// What to do next
    pub next_actions: Vec<String>,
}
