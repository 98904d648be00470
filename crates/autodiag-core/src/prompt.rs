//! Prompt construction for diagnostic queries

use crate::types::{non_empty, DiagnosticRequest};

/// System instruction for the JSON pipeline
pub const SYSTEM_PROMPT: &str =
    "You are a strict vehicle diagnostics expert. Always return JSON only.";

/// System instruction for the plain-text pipeline
pub const TEXT_SYSTEM_PROMPT: &str =
    "You are a friendly vehicle diagnostics expert. Answer in plain text, never JSON.";

const SCHEMA_HEADER: &[&str] = &[
    "Generate a structured automotive diagnostic and repair guide as JSON.",
    "Always return VALID JSON. No prose. Use these keys:",
    "{",
    "  \"summary\": string,",
    "  \"trouble_code\": string,",
    "  \"probable_causes\": string[],",
    "  \"tests\": { \"name\": string, \"steps\": string[] }[],",
    "  \"recommended_parts\": string[],",
    "  \"estimated_difficulty\": \"easy\" | \"moderate\" | \"hard\",",
    "  \"next_actions\": string[]",
    "}",
];

const TEXT_HEADER: &[&str] = &[
    "Write an automotive diagnostic and repair guide in plain text.",
    "Use short sections with emoji headings:",
    "🔍 Diagnosis, 🛠️ Repair Steps, 🧰 Tools Needed, ⏱️ Time Estimate, 💲 Cost Estimate.",
];

const AUDIENCE_LINE: &str = "Write as if explaining to someone with NO prior car repair \
                             experience. Be very clear and step-by-step.";

/// Year, make and model joined by spaces, skipping empty parts
#[must_use]
pub fn vehicle_query(request: &DiagnosticRequest) -> String {
    [&request.year, &request.make, &request.model]
        .into_iter()
        .filter_map(non_empty)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Keywords for link enrichment: vehicle, part and trouble code
#[must_use]
pub fn search_query(request: &DiagnosticRequest) -> String {
    let vehicle = vehicle_query(request);
    [Some(vehicle.as_str()), non_empty(&request.part), non_empty(&request.code)]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn vehicle_lines(request: &DiagnosticRequest) -> Vec<String> {
    let vehicle = vehicle_query(request);
    let mut lines = Vec::new();

    if !vehicle.is_empty() {
        lines.push(format!("Vehicle: {vehicle}"));
    }
    if let Some(part) = non_empty(&request.part) {
        lines.push(format!("Part: {part}"));
    }
    if let Some(code) = non_empty(&request.code) {
        lines.push(format!("OBD-II Code: {code}"));
    }
    if let Some(notes) = non_empty(&request.notes) {
        lines.push(format!("Notes: {notes}"));
    }

    lines
}

fn assemble(header: &[&str], request: &DiagnosticRequest) -> String {
    let mut lines: Vec<String> = header.iter().map(|s| (*s).to_string()).collect();
    lines.push(AUDIENCE_LINE.to_string());
    lines.extend(vehicle_lines(request));
    lines.join("\n")
}

/// Prompt asking for the JSON diagnostic schema
#[must_use]
pub fn build_prompt(request: &DiagnosticRequest) -> String {
    assemble(SCHEMA_HEADER, request)
}

/// Prompt asking for an emoji-formatted plain-text guide
#[must_use]
pub fn build_text_prompt(request: &DiagnosticRequest) -> String {
    assemble(TEXT_HEADER, request)
}
