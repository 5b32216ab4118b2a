//! Server-side HTML for the three pages.
//!
//! Every interpolated value goes through [`escape_html`].

use std::fmt::Write;

use crate::error::ErrorKind;
use crate::explainer::Explanation;
use crate::github::RateLimitInfo;

const STYLE: &str = r#"
    body { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Arial, sans-serif; margin: 0; background: #f6f8fa; color: #24292f; }
    main { max-width: 960px; margin: 40px auto; padding: 0 20px; }
    h1 { margin-bottom: 4px; }
    .subtitle { color: #57606a; margin-top: 0; }
    .card { background: #fff; border: 1px solid #d0d7de; border-radius: 8px; padding: 20px; margin: 16px 0; }
    .warning { background: #fff8c5; border-color: #d4a72c; }
    .error { border-color: #cf222e; }
    .error-type { display: inline-block; font-size: 12px; text-transform: uppercase; color: #fff; background: #cf222e; border-radius: 4px; padding: 2px 8px; }
    .message { white-space: pre-line; }
    form { display: flex; gap: 8px; }
    input[type=url], input[type=text] { flex: 1; padding: 10px; font-size: 16px; border: 1px solid #d0d7de; border-radius: 6px; }
    button { padding: 10px 18px; font-size: 16px; background: #2da44e; color: #fff; border: none; border-radius: 6px; cursor: pointer; }
    .stats span { margin-right: 16px; }
    .topics span { display: inline-block; background: #ddf4ff; color: #0969da; border-radius: 12px; padding: 2px 10px; margin: 2px; font-size: 13px; }
    .languages li { list-style: none; }
    pre.mermaid { background: #fff; }
    a { color: #0969da; }
"#;

const MERMAID_SCRIPT: &str = r#"<script type="module">
    import mermaid from "https://cdn.jsdelivr.net/npm/mermaid@10/dist/mermaid.esm.min.mjs";
    mermaid.initialize({ startOnLoad: true, securityLevel: "strict" });
</script>"#;

/// Escapes text for use in HTML element content and quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn layout(title: &str, body: &str, extra_head: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>
    <style>{style}</style>
    {extra_head}
</head>
<body>
<main>
{body}
</main>
</body>
</html>
"#,
        title = escape_html(title),
        style = STYLE,
        extra_head = extra_head,
        body = body,
    )
}

/// The landing page with the repository form
pub fn index_page(show_rate_warning: bool, has_token: bool, rate: Option<&RateLimitInfo>) -> String {
    let mut body = String::from(
        r#"<h1>Explain My Repo</h1>
<p class="subtitle">Paste a public GitHub repository and get a plain-language explanation of what it is and how it is built.</p>
"#,
    );

    if show_rate_warning {
        let reset = rate
            .and_then(RateLimitInfo::reset_at)
            .map(|at| format!(" The limit resets at {} UTC.", at.format("%H:%M")))
            .unwrap_or_default();
        let remaining = rate.map(|r| r.remaining).unwrap_or(0);
        let _ = write!(
            body,
            r#"<div class="card warning">Only {} GitHub API requests left for this server.{} Add a <code>GITHUB_TOKEN</code> to raise the limit to 5000 requests/hour.</div>
"#,
            remaining,
            escape_html(&reset)
        );
    }

    body.push_str(
        r#"<div class="card">
<form method="post" action="/analyze">
    <input type="text" name="github_url" placeholder="https://github.com/username/repository" required autofocus>
    <button type="submit">Explain</button>
</form>
</div>
"#,
    );

    if !has_token {
        body.push_str(
            r#"<p class="subtitle">Running without a GitHub token: anonymous requests are limited to 60 per hour.</p>
"#,
        );
    }

    layout("Explain My Repo", &body, "")
}

fn section_card(title: &str, content: &str) -> String {
    format!(
        "<div class=\"card\">\n<h2>{}</h2>\n<p class=\"message\">{}</p>\n</div>\n",
        escape_html(title),
        escape_html(content)
    )
}

/// The explanation of a repository
pub fn results_page(explanation: &Explanation) -> String {
    let repo = &explanation.repo;
    let data = &explanation.data;
    let sections = &explanation.sections;
    let title = repo.to_string();

    let mut body = String::new();
    let _ = write!(
        body,
        "<h1><a href=\"{url}\">{title}</a></h1>\n<p class=\"subtitle\">{description}</p>\n",
        url = escape_html(&repo.html_url()),
        title = escape_html(&title),
        description = escape_html(data.description.as_deref().unwrap_or("No description provided")),
    );

    let _ = write!(
        body,
        "<div class=\"card stats\"><span>&#9733; {} stars</span><span>{} forks</span><span>{}</span></div>\n",
        data.stars,
        data.forks,
        escape_html(data.language.as_deref().unwrap_or("Language not specified")),
    );

    if !data.topics.is_empty() {
        body.push_str("<div class=\"topics\">");
        for topic in &data.topics {
            let _ = write!(body, "<span>{}</span>", escape_html(topic));
        }
        body.push_str("</div>\n");
    }

    body.push_str(&section_card("Summary", &sections.recruiter_summary));
    body.push_str(&section_card("What it does", &sections.what_it_does));
    body.push_str(&section_card("Project type", &sections.project_type));
    body.push_str(&section_card("Tech stack", &sections.tech_stack));

    body.push_str("<div class=\"card\">\n<h2>Architecture</h2>\n");
    if sections.has_diagram() {
        let _ = write!(
            body,
            "<pre class=\"mermaid\">{}</pre>\n",
            escape_html(&sections.architecture_mermaid)
        );
    }
    let _ = write!(
        body,
        "<p class=\"message\">{}</p>\n</div>\n",
        escape_html(&sections.architecture_description)
    );

    let breakdown = data.language_breakdown();
    if !breakdown.is_empty() {
        body.push_str("<div class=\"card languages\">\n<h2>Languages</h2>\n<ul>\n");
        for (language, share) in breakdown {
            let _ = write!(body, "<li>{} {:.1}%</li>\n", escape_html(&language), share);
        }
        body.push_str("</ul>\n</div>\n");
    }

    body.push_str("<p><a href=\"/\">Explain another repository</a></p>\n");

    let head = if sections.has_diagram() { MERMAID_SCRIPT } else { "" };
    layout(&format!("{} - Explain My Repo", title), &body, head)
}

/// A user-visible error
pub fn error_page(message: &str, kind: ErrorKind) -> String {
    let body = format!(
        r#"<h1>Something went wrong</h1>
<div class="card error">
<span class="error-type">{kind}</span>
<p class="message">{message}</p>
</div>
<p><a href="/">Try another repository</a></p>
"#,
        kind = escape_html(kind.label()),
        message = escape_html(message),
    );
    layout("Error - Explain My Repo", &body, "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisSections;
    use crate::github::RepoData;
    use crate::utils::RepoRef;

    fn explanation(mermaid: &str) -> Explanation {
        let mut data = RepoData {
            description: Some("<b>bold</b> claims".into()),
            language: Some("Rust".into()),
            topics: vec!["web".into()],
            stars: 12,
            forks: 3,
            ..RepoData::default()
        };
        data.languages.insert("Rust".into(), 900);
        data.languages.insert("HTML".into(), 100);

        Explanation {
            repo: RepoRef::new("acme", "site"),
            data,
            sections: AnalysisSections {
                tech_stack: "Rust, axum".into(),
                project_type: "Web App".into(),
                architecture_mermaid: mermaid.into(),
                architecture_description: "One process.".into(),
                what_it_does: "Serves pages & <scripts>".into(),
                recruiter_summary: "A website.".into(),
            },
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#x27;Jerry&#x27;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_results_page_escapes_content() {
        let html = results_page(&explanation(""));
        assert!(html.contains("&lt;b&gt;bold&lt;/b&gt; claims"));
        assert!(html.contains("Serves pages &amp; &lt;scripts&gt;"));
        assert!(!html.contains("<scripts>"));
        assert!(html.contains("https://github.com/acme/site"));
        assert!(html.contains("Rust 90.0%"));
        assert!(!html.contains("mermaid.esm"));
    }

    #[test]
    fn test_results_page_with_diagram() {
        let html = results_page(&explanation("graph TD; A-->B"));
        assert!(html.contains("<pre class=\"mermaid\">graph TD; A--&gt;B</pre>"));
        assert!(html.contains("mermaid.esm"));
    }

    #[test]
    fn test_error_page() {
        let html = error_page("Repository 'a/b' not found.", ErrorKind::GitHub);
        assert!(html.contains("<span class=\"error-type\">github</span>"));
        assert!(html.contains("Repository &#x27;a/b&#x27; not found."));
    }

    #[test]
    fn test_index_page_warning() {
        let rate = RateLimitInfo { limit: 60, remaining: 3, reset_time: 0 };
        let html = index_page(true, false, Some(&rate));
        assert!(html.contains("Only 3 GitHub API requests left"));
        assert!(html.contains("The limit resets at 00:00 UTC."));
        assert!(html.contains("name=\"github_url\""));

        let quiet = index_page(false, true, None);
        assert!(!quiet.contains("requests left"));
        assert!(!quiet.contains("without a GitHub token"));
    }
}
