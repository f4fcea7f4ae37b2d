//! Request and result types for a scrape.
//!
//! Every field is required; the JSON shape produced by serde is the API
//! contract: `{id, meta, md, chunks, fetched: {status}}`.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::fetch::RenderMode;
use crate::hash::fingerprint;
use crate::{Result, ScrapeError};

/// A validated scrape request. Construction parses the URL, so no network
/// I/O ever starts for a malformed one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeRequest {
    url: Url,
    render_mode: RenderMode,
    target_words: usize,
    raw_output: bool,
}

impl ScrapeRequest {
    /// Parses and validates `url`. `target_words` of zero is replaced by
    /// `default_target_words`.
    pub fn new(
        url: &str, render_mode: RenderMode, target_words: usize, raw_output: bool, default_target_words: usize,
    ) -> Result<Self> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ScrapeError::MissingUrl);
        }

        let url = Url::parse(url).map_err(|e| ScrapeError::InvalidUrl(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(ScrapeError::InvalidUrl(format!("unsupported URL: {url}")));
        }

        let target_words = if target_words == 0 { default_target_words } else { target_words };

        Ok(Self { url, render_mode, target_words, raw_output })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn render_mode(&self) -> RenderMode {
        self.render_mode
    }

    pub fn target_words(&self) -> usize {
        self.target_words
    }

    pub fn raw_output(&self) -> bool {
        self.raw_output
    }

    /// Content-addressed cache key over `(url, render flag, target words)`.
    pub fn cache_key(&self) -> String {
        fingerprint(&format!("{}|{}|{}", self.url, self.render_mode.is_rendered(), self.target_words))
    }
}

/// Metadata describing the scraped page; mirrored into the frontmatter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub title: String,
    pub url: String,
    pub domain: String,
    /// RFC 3339 UTC timestamp.
    pub crawled_at: String,
    /// Fingerprint of the Markdown body before frontmatter is added.
    pub content_hash: String,
    pub excerpt: String,
}

/// One overlapping segment of the composed Markdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub index: usize,
    pub text: String,
    pub approx_word_count: usize,
}

/// Outcome of the fetch step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchStatus {
    pub status: u16,
}

/// Complete result of a scrape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeResult {
    /// Fingerprint of `meta.url + meta.content_hash`; stable across re-crawls
    /// of unchanged content.
    pub id: String,
    pub meta: PageMeta,
    /// Markdown with frontmatter.
    pub md: String,
    pub chunks: Vec<Chunk>,
    pub fetched: FetchStatus,
}

impl ScrapeResult {
    /// Stable identity for a page's content.
    pub fn identity(meta: &PageMeta) -> String {
        fingerprint(&format!("{}{}", meta.url, meta.content_hash))
    }
}

/// What the pipeline hands back to its caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrapeOutput {
    /// Structured result (`raw = false`).
    Json(Box<ScrapeResult>),
    /// Composed Markdown only (`raw = true`).
    Markdown(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_validation() {
        let req = ScrapeRequest::new("https://example.com/a", RenderMode::Static, 500, false, 1000).unwrap();
        assert_eq!(req.url().as_str(), "https://example.com/a");
        assert_eq!(req.target_words(), 500);

        assert!(matches!(
            ScrapeRequest::new("", RenderMode::Static, 1000, false, 1000),
            Err(ScrapeError::MissingUrl)
        ));
        assert!(matches!(
            ScrapeRequest::new("not-a-url", RenderMode::Static, 1000, false, 1000),
            Err(ScrapeError::InvalidUrl(_))
        ));
        assert!(matches!(
            ScrapeRequest::new("mailto:someone@example.com", RenderMode::Static, 1000, false, 1000),
            Err(ScrapeError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_zero_target_uses_default() {
        let req = ScrapeRequest::new("https://example.com", RenderMode::Rendered, 0, true, 1000).unwrap();
        assert_eq!(req.target_words(), 1000);
        assert!(req.raw_output());
    }

    #[test]
    fn test_cache_key_covers_all_parameters() {
        let base = ScrapeRequest::new("https://example.com", RenderMode::Rendered, 1000, false, 1000).unwrap();
        let same = ScrapeRequest::new("https://example.com", RenderMode::Rendered, 1000, true, 1000).unwrap();
        let static_mode = ScrapeRequest::new("https://example.com", RenderMode::Static, 1000, false, 1000).unwrap();
        let other_size = ScrapeRequest::new("https://example.com", RenderMode::Rendered, 800, false, 1000).unwrap();

        assert_eq!(base.cache_key(), same.cache_key());
        assert_ne!(base.cache_key(), static_mode.cache_key());
        assert_ne!(base.cache_key(), other_size.cache_key());
        assert_eq!(base.cache_key(), fingerprint("https://example.com/|true|1000"));
    }

    #[test]
    fn test_identity_ignores_crawl_time() {
        let mut meta = PageMeta {
            title: "T".into(),
            url: "https://example.com/".into(),
            domain: "example.com".into(),
            crawled_at: "2024-01-01T00:00:00Z".into(),
            content_hash: fingerprint("body"),
            excerpt: String::new(),
        };
        let first = ScrapeResult::identity(&meta);
        meta.crawled_at = "2025-06-01T12:00:00Z".into();
        assert_eq!(first, ScrapeResult::identity(&meta));
    }

    #[test]
    fn test_result_json_shape() {
        let result = ScrapeResult {
            id: "abc".into(),
            meta: PageMeta {
                title: "T".into(),
                url: "https://example.com/".into(),
                domain: "example.com".into(),
                crawled_at: "2024-01-01T00:00:00Z".into(),
                content_hash: "h".into(),
                excerpt: "e".into(),
            },
            md: "---\n---\n\nbody".into(),
            chunks: vec![Chunk { index: 0, text: "body".into(), approx_word_count: 1 }],
            fetched: FetchStatus { status: 200 },
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["fetched"]["status"], 200);
        assert_eq!(json["meta"]["crawled_at"], "2024-01-01T00:00:00Z");
        assert_eq!(json["meta"]["content_hash"], "h");
        assert_eq!(json["chunks"][0]["approx_word_count"], 1);
        assert_eq!(json["md"], "---\n---\n\nbody");
    }
}
