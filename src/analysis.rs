//! Turns the summarizer's answer into the sections shown on the results page.
//!
//! The model is asked for a bare JSON object but regularly wraps it in a
//! markdown fence, drops keys, or answers with prose. Parsing never fails:
//! anything unusable degrades to placeholder text.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::utils::truncate_chars;

const NOT_AVAILABLE: &str = "Not available";
const PARSE_ERROR: &str = "Error parsing analysis";

/// The six sections of an explanation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSections {
    /// Frameworks, libraries and tools, comma separated
    pub tech_stack: String,
    /// Kind of project, e.g. "Web App"
    pub project_type: String,
    /// Mermaid graph source; empty when there is no diagram
    pub architecture_mermaid: String,
    /// Prose description of the architecture
    pub architecture_description: String,
    /// Main functionality
    pub what_it_does: String,
    /// Short non-technical summary
    pub recruiter_summary: String,
}

impl AnalysisSections {
    /// Placeholder sections for an answer that was not valid JSON
    pub fn parse_failure(raw: &str) -> Self {
        Self {
            tech_stack: PARSE_ERROR.to_string(),
            project_type: PARSE_ERROR.to_string(),
            architecture_mermaid: String::new(),
            architecture_description: PARSE_ERROR.to_string(),
            what_it_does: PARSE_ERROR.to_string(),
            recruiter_summary: format!("{}: {}...", PARSE_ERROR, truncate_chars(raw, 100)),
        }
    }

    /// Whether there is a diagram to render
    pub fn has_diagram(&self) -> bool {
        !self.architecture_mermaid.is_empty()
    }
}

/// Removes a surrounding markdown code fence, if any
pub fn strip_code_fence(text: &str) -> &str {
    let mut cleaned = text.trim();
    if let Some(rest) = cleaned.strip_prefix("```json") {
        cleaned = rest;
    }
    if let Some(rest) = cleaned.strip_prefix("```") {
        cleaned = rest;
    }
    if let Some(rest) = cleaned.strip_suffix("```") {
        cleaned = rest;
    }
    cleaned.trim()
}

/// Cleans a Mermaid graph: fences removed, a `graph TD;` header ensured
pub fn normalize_mermaid(raw: &str) -> String {
    let code = raw.replace("```mermaid", "").replace("```", "");
    let code = code.trim();

    if code.is_empty() || code.eq_ignore_ascii_case(NOT_AVAILABLE) {
        return String::new();
    }
    if code.starts_with("graph") {
        code.to_string()
    } else {
        format!("graph TD;\n{}", code)
    }
}

fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(value_to_text)
                .collect::<Vec<_>>()
                .join(", "),
        ),
        other => Some(other.to_string()),
    }
}

fn section(object: &Map<String, Value>, key: &str) -> String {
    object
        .get(key)
        .and_then(value_to_text)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Parses the summarizer's answer into sections
pub fn parse_analysis(text: &str) -> AnalysisSections {
    let cleaned = strip_code_fence(text);

    let object = match serde_json::from_str::<Value>(cleaned) {
        Ok(Value::Object(object)) => object,
        Ok(other) => {
            warn!("Analysis was JSON but not an object: {}", truncate_chars(&other.to_string(), 80));
            return AnalysisSections::parse_failure(text);
        }
        Err(e) => {
            warn!("Analysis was not valid JSON: {}", e);
            return AnalysisSections::parse_failure(text);
        }
    };

    let mermaid = object
        .get("architecture_mermaid")
        .and_then(value_to_text)
        .map(|m| normalize_mermaid(&m))
        .unwrap_or_default();

    AnalysisSections {
        tech_stack: section(&object, "tech_stack"),
        project_type: section(&object, "project_type"),
        architecture_mermaid: mermaid,
        architecture_description: section(&object, "architecture_description"),
        what_it_does: section(&object, "what_it_does"),
        recruiter_summary: section(&object, "recruiter_summary"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const FULL_ANSWER: &str = r#"{
        "tech_stack": ["Rust", "axum", "tokio"],
        "project_type": "Web App",
        "architecture_mermaid": "graph TD; Browser-->Server; Server-->GitHub;",
        "architecture_description": "A single server process.",
        "what_it_does": "Explains repositories.",
        "recruiter_summary": "A tool that explains code."
    }"#;

    #[test]
    fn test_full_answer() {
        let sections = parse_analysis(FULL_ANSWER);
        assert_eq!(
            sections,
            AnalysisSections {
                tech_stack: "Rust, axum, tokio".into(),
                project_type: "Web App".into(),
                architecture_mermaid: "graph TD; Browser-->Server; Server-->GitHub;".into(),
                architecture_description: "A single server process.".into(),
                what_it_does: "Explains repositories.".into(),
                recruiter_summary: "A tool that explains code.".into(),
            }
        );
        assert!(sections.has_diagram());
    }

    #[test]
    fn test_fenced_answer() {
        let fenced = format!("```json\n{}\n```", FULL_ANSWER);
        assert_eq!(parse_analysis(&fenced), parse_analysis(FULL_ANSWER));

        let bare_fence = format!("  ```\n{}\n```  ", FULL_ANSWER);
        assert_eq!(parse_analysis(&bare_fence), parse_analysis(FULL_ANSWER));
    }

    #[test]
    fn test_missing_keys_get_defaults() {
        let sections = parse_analysis(r#"{"project_type": "Library"}"#);
        assert_eq!(sections.project_type, "Library");
        assert_eq!(sections.tech_stack, "Not available");
        assert_eq!(sections.recruiter_summary, "Not available");
        assert_eq!(sections.architecture_mermaid, "");
        assert!(!sections.has_diagram());
    }

    #[test]
    fn test_tech_stack_as_string() {
        let sections = parse_analysis(r#"{"tech_stack": "Python, Flask"}"#);
        assert_eq!(sections.tech_stack, "Python, Flask");
    }

    #[test]
    fn test_mermaid_normalization() {
        assert_eq!(normalize_mermaid("```mermaid\nA-->B\n```"), "graph TD;\nA-->B");
        assert_eq!(normalize_mermaid("graph LR; A-->B"), "graph LR; A-->B");
        assert_eq!(normalize_mermaid("Not Available"), "");
        assert_eq!(normalize_mermaid("   "), "");
    }

    #[test]
    fn test_invalid_json_falls_back() {
        let sections = parse_analysis("Sorry, I cannot analyze this repository.");
        assert_eq!(sections.tech_stack, "Error parsing analysis");
        assert_eq!(sections.architecture_mermaid, "");
        assert_eq!(
            sections.recruiter_summary,
            "Error parsing analysis: Sorry, I cannot analyze this repository...."
        );
    }

    #[test]
    fn test_fallback_summary_is_truncated() {
        let long = "x".repeat(500);
        let sections = parse_analysis(&long);
        assert_eq!(sections.recruiter_summary.len(), "Error parsing analysis: ".len() + 100 + 3);
    }

    #[test]
    fn test_non_object_json_falls_back() {
        let sections = parse_analysis(r#"["not", "an", "object"]"#);
        assert_eq!(sections.what_it_does, "Error parsing analysis");
    }
}
