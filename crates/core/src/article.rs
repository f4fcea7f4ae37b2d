//! Main-content extraction.
//!
//! An [`ArticleExtractor`] isolates the readable region of a page. The
//! production implementation, [`ReadabilityExtractor`], delegates to the
//! `readability` crate. When an extractor finds nothing, the pipeline falls
//! back to [`fallback_article`], which takes the whole `<body>`.

use std::io::Cursor;

use serde::Serialize;
use url::Url;

use crate::parse::Document;

/// Readable content isolated from a page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArticleContent {
    pub title: String,
    pub content_html: String,
    pub excerpt: String,
}

impl ArticleContent {
    /// `true` when there is no markup to convert.
    pub fn is_empty(&self) -> bool {
        self.content_html.trim().is_empty()
    }
}

/// Isolates the main content of an HTML document.
pub trait ArticleExtractor: Send + Sync {
    /// Returns `None` when no usable content was found. Never retries.
    fn extract(&self, html: &str, base_url: &Url) -> Option<ArticleContent>;
}

/// Extractor backed by the readability heuristic.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadabilityExtractor;

impl ArticleExtractor for ReadabilityExtractor {
    fn extract(&self, html: &str, base_url: &Url) -> Option<ArticleContent> {
        let mut cursor = Cursor::new(html.as_bytes());
        let product = readability::extractor::extract(&mut cursor, base_url).ok()?;

        // With no candidate the whole document comes back; only body text counts.
        if Document::parse(&product.content).body_text().trim().is_empty() {
            return None;
        }

        let excerpt = Document::parse(html).excerpt().unwrap_or_default();

        Some(ArticleContent { title: product.title.trim().to_string(), content_html: product.content, excerpt })
    }
}

/// Whole-body substitute for a failed extraction: document title (or empty)
/// and the inner markup of `<body>` (or empty).
pub fn fallback_article(html: &str) -> ArticleContent {
    let doc = Document::parse(html);

    ArticleContent {
        title: doc.title().unwrap_or_default(),
        content_html: doc.body_inner_html().unwrap_or_default(),
        excerpt: doc.excerpt().unwrap_or_default(),
    }
}
