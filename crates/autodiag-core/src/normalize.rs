//! Normalize - coerce model output into the diagnostic schema
//!
//! Model output arrives as free text that is usually, but not always, JSON.
//! [`coerce`] always produces some JSON value and [`normalize`] maps any JSON
//! value onto [`DiagnosticResult`]. Neither function can fail.

use crate::types::{DiagnosticResult, DiagnosticTest, Difficulty};
use regex::Regex;
use serde_json::{Map, Number, Value};
use std::sync::LazyLock;

/// Greedy match from the first opening bracket to the last closing one
static EMBEDDED_JSON_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([\[{][\s\S]*[\]}])").expect("EMBEDDED_JSON_REGEX is a compile-time constant")
});

/// Key used for the fallback object when no JSON can be recovered
pub const FALLBACK_KEY: &str = "message";

/// Best-effort extraction of a JSON value from arbitrary text
///
/// Tries, in order: the whole trimmed text, the first bracketed substring,
/// and finally `{"message": <trimmed text>}`.
#[must_use]
pub fn coerce(text: &str) -> Value {
    let raw = text.trim();

    if let Ok(value) = serde_json::from_str(raw) {
        return value;
    }

    if let Some(m) = EMBEDDED_JSON_REGEX.find(raw) {
        if let Ok(value) = serde_json::from_str(m.as_str()) {
            return value;
        }
    }

    let mut fallback = Map::new();
    fallback.insert(FALLBACK_KEY.to_string(), Value::String(raw.to_string()));
    Value::Object(fallback)
}

/// Map any JSON value onto the fixed diagnostic schema
///
/// Fields of the wrong type collapse to their zero value; `estimated_difficulty`
/// falls back to `moderate` unless it is exactly one of the three labels.
#[must_use]
pub fn normalize(value: &Value) -> DiagnosticResult {
    let field = |key: &str| value.get(key);

    let summary = match field("summary") {
        Some(Value::String(s)) => s.clone(),
        _ => field(FALLBACK_KEY)
            .filter(|v| is_truthy(v))
            .map(stringify)
            .unwrap_or_default(),
    };

    let trouble_code = match field("trouble_code") {
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    };

    let tests = match field("tests") {
        Some(Value::Array(items)) => items.iter().map(normalize_test).collect(),
        _ => Vec::new(),
    };

    let estimated_difficulty = field("estimated_difficulty")
        .and_then(Value::as_str)
        .and_then(Difficulty::from_label)
        .unwrap_or_default();

    DiagnosticResult {
        summary,
        trouble_code,
        probable_causes: string_list(field("probable_causes")),
        tests,
        recommended_parts: string_list(field("recommended_parts")),
        estimated_difficulty,
        next_actions: string_list(field("next_actions")),
    }
}

fn normalize_test(value: &Value) -> DiagnosticTest {
    DiagnosticTest {
        name: value
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        steps: string_list(value.get("steps")),
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().map(stringify).collect(),
        _ => Vec::new(),
    }
}

/// Render a JSON value the way a loosely-typed string conversion would
///
/// Strings are kept verbatim, arrays are joined with commas and objects
/// collapse to a fixed placeholder.
pub(crate) fn stringify(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_to_string(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => stringify(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

fn number_to_string(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() => float_to_string(f),
        _ => n.to_string(),
    }
}

/// Shortest round-trip form; exponent notation outside `[1e-6, 1e21)`
fn float_to_string(f: f64) -> String {
    if f == 0.0 {
        return "0".to_string();
    }

    let magnitude = f.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return format!("{f}");
    }

    let exponent_form = format!("{f:e}");
    match exponent_form.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => exponent_form,
    }
}

pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
