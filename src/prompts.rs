use std::fmt::Write;

use crate::github::RepoData;
use crate::utils::RepoRef;

/// Opening of every analysis prompt
pub const ANALYST_PREAMBLE: &str = r#"You are an expert software analyst helping recruiters and developers understand GitHub projects.
Analyze this repository and provide a clear, accurate analysis in JSON format."#;

/// Output format the model must follow
pub const ANALYSIS_INSTRUCTIONS: &str = r#"=== STRICT INSTRUCTIONS ===
1. Analyze the code structure and dependencies to understand the architecture.
2. Output valid JSON ONLY. No markdown formatting, no code blocks around it.
3. The JSON must have these exact keys:
   - "tech_stack": list of strings (frameworks, libs, tools used)
   - "project_type": string (e.g., "Web App", "API", "Library")
   - "architecture_mermaid": string (Mermaid.js graph TD syntax describing the architecture)
   - "architecture_description": string (Brief text explanation of architecture)
   - "what_it_does": string (Main functionality)
   - "recruiter_summary": string (Simple non-technical summary < 100 words)

Example of architecture_mermaid:
    "graph TD; Client-->LoadBalancer; LoadBalancer-->Server1; LoadBalancer-->Server2; Server1-->DB; Server2-->DB;"

=== STRICT MERMAID RULES ===
1. Quote ALL node labels using double quotes: e.g. id["Label Text"]
2. Remove ALL markdown formatting from labels (no bold, italics, code ticks).
3. Use only valid arrows: -->, ==>, -.->, --o
4. Remove or escape special characters in labels.
5. Do NOT use markdown backticks in the mermaid string.
6. Ensure the graph is "graph TD" or "graph LR" only.
7. No emojis in labels."#;

fn or_default<'a>(value: Option<&'a str>, fallback: &'a str) -> &'a str {
    value.filter(|v| !v.trim().is_empty()).unwrap_or(fallback)
}

/// One line per top-level entry, with a folder or file marker
pub fn structure_text(data: &RepoData) -> String {
    if data.structure.is_empty() {
        return "No structure data available".to_string();
    }
    data.structure
        .iter()
        .map(|entry| format!("  {} {}", if entry.is_dir() { "📁" } else { "📄" }, entry.name))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Dependency manifests as `--- name ---` blocks
pub fn dependencies_text(data: &RepoData) -> String {
    if data.dependencies.is_empty() {
        return "No dependency files found".to_string();
    }
    let mut text = String::new();
    for (name, content) in &data.dependencies {
        let _ = write!(text, "\n--- {} ---\n{}\n", name, content);
    }
    text
}

/// Builds the prompt sent to the summarizer
pub fn build_analysis_prompt(repo: &RepoRef, data: &RepoData) -> String {
    let topics = if data.topics.is_empty() {
        "None".to_string()
    } else {
        data.topics.join(", ")
    };

    format!(
        "{preamble}

=== REPOSITORY INFO ===
Repository: {repo}
Description: {description}
Primary Language: {language}
Topics/Tags: {topics}
Stars: {stars} | Forks: {forks}

=== README CONTENT ===
{readme}

=== REPOSITORY STRUCTURE ===
{structure}

=== DEPENDENCY FILES ===
{dependencies}

{instructions}
",
        preamble = ANALYST_PREAMBLE,
        repo = repo,
        description = or_default(data.description.as_deref(), "Not provided"),
        language = or_default(data.language.as_deref(), "Not specified"),
        topics = topics,
        stars = data.stars,
        forks = data.forks,
        readme = or_default(data.readme.as_deref(), "No README found"),
        structure = structure_text(data),
        dependencies = dependencies_text(data),
        instructions = ANALYSIS_INSTRUCTIONS,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::{EntryKind, TreeEntry};

    fn sample_data() -> RepoData {
        let mut data = RepoData {
            readme: Some("# Demo\nA demo project".into()),
            description: Some("Demo repository".into()),
            language: Some("Rust".into()),
            topics: vec!["cli".into(), "demo".into()],
            stars: 42,
            forks: 7,
            ..RepoData::default()
        };
        data.structure = vec![
            TreeEntry { name: "src".into(), kind: EntryKind::Dir, path: "src".into() },
            TreeEntry { name: "Cargo.toml".into(), kind: EntryKind::File, path: "Cargo.toml".into() },
        ];
        data.dependencies.insert("Cargo.toml".into(), "[package]\nname = \"demo\"".into());
        data
    }

    #[test]
    fn test_prompt_includes_metadata() {
        let prompt = build_analysis_prompt(&RepoRef::new("acme", "demo"), &sample_data());

        assert!(prompt.starts_with(ANALYST_PREAMBLE));
        assert!(prompt.contains("Repository: acme/demo"));
        assert!(prompt.contains("Description: Demo repository"));
        assert!(prompt.contains("Primary Language: Rust"));
        assert!(prompt.contains("Topics/Tags: cli, demo"));
        assert!(prompt.contains("Stars: 42 | Forks: 7"));
        assert!(prompt.contains("A demo project"));
        assert!(prompt.contains("  📁 src\n  📄 Cargo.toml"));
        assert!(prompt.contains("--- Cargo.toml ---\n[package]"));
        assert!(prompt.contains("\"recruiter_summary\""));
    }

    #[test]
    fn test_prompt_placeholders_for_missing_data() {
        let prompt = build_analysis_prompt(&RepoRef::new("acme", "empty"), &RepoData::default());

        assert!(prompt.contains("Description: Not provided"));
        assert!(prompt.contains("Primary Language: Not specified"));
        assert!(prompt.contains("Topics/Tags: None"));
        assert!(prompt.contains("No README found"));
        assert!(prompt.contains("No structure data available"));
        assert!(prompt.contains("No dependency files found"));
    }
}
