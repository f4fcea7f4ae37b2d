//! HTML parsing and document-level lookups.
//!
//! [`Document`] wraps a parsed page and answers the questions the pipeline
//! asks of the raw HTML: its `<title>`, the inner markup of `<body>` (used by
//! the extraction fallback) and a short excerpt.
//!
//! # Example
//!
//! ```rust
//! use pagechunk_core::parse::Document;
//!
//! let html = "<html><head><title>Test</title></head><body><p>Hello</p></body></html>";
//! let doc = Document::parse(html);
//! assert_eq!(doc.title(), Some("Test".to_string()));
//! assert_eq!(doc.body_inner_html(), Some("<p>Hello</p>".to_string()));
//! ```

use scraper::{ElementRef, Html, Selector};

/// Maximum excerpt length in characters before truncation.
const EXCERPT_MAX_CHARS: usize = 300;

/// Paragraphs shorter than this are not used as an excerpt.
const EXCERPT_MIN_CHARS: usize = 50;

/// A parsed HTML document.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses HTML from a string. Parsing is lenient and never fails.
    pub fn parse(html: &str) -> Self {
        Self { html: Html::parse_document(html) }
    }

    /// Content of the `<title>` element, trimmed, if present and non-blank.
    pub fn title(&self) -> Option<String> {
        let text = self.first("title")?.text().collect::<String>();
        let text = text.trim();
        if text.is_empty() { None } else { Some(text.to_string()) }
    }

    /// Inner markup of `<body>`.
    pub fn body_inner_html(&self) -> Option<String> {
        self.first("body").map(|body| body.inner_html())
    }

    /// Short description of the page, by priority:
    /// 1. JSON-LD `description`
    /// 2. Open Graph `og:description`
    /// 3. Meta `description`
    /// 4. First substantial paragraph among the first five
    pub fn excerpt(&self) -> Option<String> {
        if let Some(json_ld) = self.json_ld()
            && let Some(value) = json_ld.get("description").and_then(|d| d.as_str())
        {
            return Some(value.to_string());
        }

        if let Some(desc) = self.meta_content("og:description") {
            return Some(desc);
        }

        if let Some(desc) = self.meta_content("description") {
            return Some(desc);
        }

        self.select("p").take(5).find_map(|el| {
            let text = el.text().collect::<String>();
            let text = text.trim();
            (text.chars().count() > EXCERPT_MIN_CHARS).then(|| truncate(text, EXCERPT_MAX_CHARS))
        })
    }

    /// Text inside `<body>`; empty when there is none.
    pub fn body_text(&self) -> String {
        self.first("body").map(|body| body.text().collect()).unwrap_or_default()
    }

    fn select<'a>(&'a self, selector: &str) -> Box<dyn Iterator<Item = ElementRef<'a>> + 'a> {
        match Selector::parse(selector) {
            Ok(sel) => Box::new(self.html.select(&sel).collect::<Vec<_>>().into_iter()),
            Err(_) => Box::new(std::iter::empty()),
        }
    }

    fn first(&self, selector: &str) -> Option<ElementRef<'_>> {
        self.select(selector).next()
    }

    /// Meta tag content by `name` or `property` attribute.
    fn meta_content(&self, attr: &str) -> Option<String> {
        ["name", "property"].iter().find_map(|key| {
            self.first(&format!("meta[{key}=\"{attr}\"]"))
                .and_then(|el| el.value().attr("content"))
                .map(str::trim)
                .filter(|content| !content.is_empty())
                .map(str::to_string)
        })
    }

    /// First parseable JSON-LD block.
    fn json_ld(&self) -> Option<serde_json::Value> {
        self.select("script[type=\"application/ld+json\"]").find_map(|el| {
            let text = el.text().collect::<String>();
            serde_json::from_str::<serde_json::Value>(text.trim()).ok()
        })
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_HTML: &str = r#"
        <!DOCTYPE html>
        <html lang="en">
        <head>
            <meta charset="UTF-8">
            <title> Test Page </title>
            <meta name="description" content="Meta description">
        </head>
        <body><h1>Heading</h1><p class="content">Paragraph 1</p></body>
        </html>
    "#;

    #[test]
    fn test_title() {
        let doc = Document::parse(SAMPLE_HTML);
        assert_eq!(doc.title(), Some("Test Page".to_string()));
        assert_eq!(Document::parse("<p>no title</p>").title(), None);
    }

    #[test]
    fn test_body_inner_html() {
        let doc = Document::parse(SAMPLE_HTML);
        let body = doc.body_inner_html().unwrap();
        assert!(body.starts_with("<h1>Heading</h1>"));
        assert!(body.contains(r#"<p class="content">Paragraph 1</p>"#));
    }

    #[test]
    fn test_empty_body() {
        let doc = Document::parse("<html><head></head><body></body></html>");
        assert_eq!(doc.body_inner_html().as_deref().map(str::trim), Some(""));
    }

    #[test]
    fn test_excerpt_prefers_json_ld() {
        let html = r#"<html><head>
            <script type="application/ld+json">{"description": "JSON-LD Description"}</script>
            <meta property="og:description" content="OG Description">
        </head><body></body></html>"#;
        assert_eq!(Document::parse(html).excerpt(), Some("JSON-LD Description".to_string()));
    }

    #[test]
    fn test_excerpt_from_open_graph() {
        let html = r#"<html><head><meta property="og:description" content="OG Description"></head></html>"#;
        assert_eq!(Document::parse(html).excerpt(), Some("OG Description".to_string()));
    }

    #[test]
    fn test_excerpt_from_meta() {
        assert_eq!(Document::parse(SAMPLE_HTML).excerpt(), Some("Meta description".to_string()));
    }

    #[test]
    fn test_excerpt_fallback_to_paragraph() {
        let html = r#"<html><body>
            <p>Short.</p>
            <p>This is a substantial paragraph that should be used as an excerpt because it is long enough.</p>
        </body></html>"#;
        let excerpt = Document::parse(html).excerpt().unwrap();
        assert!(excerpt.starts_with("This is a substantial paragraph"));
    }

    #[test]
    fn test_excerpt_truncates_on_char_boundary() {
        let long = "é".repeat(400);
        let html = format!("<html><body><p>{long}</p></body></html>");
        let excerpt = Document::parse(&html).excerpt().unwrap();
        assert!(excerpt.ends_with("..."));
        assert_eq!(excerpt.chars().count(), EXCERPT_MAX_CHARS + 3);
    }

    #[test]
    fn test_body_text() {
        let text = Document::parse(SAMPLE_HTML).body_text();
        assert!(text.contains("Heading"));
        assert!(text.contains("Paragraph 1"));
        assert!(!text.contains("Test Page"));

        let head_only = "<html><head><title>Only</title></head><body></body></html>";
        assert!(Document::parse(head_only).body_text().trim().is_empty());
    }
}
