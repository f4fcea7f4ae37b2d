//! Scrape orchestration.
//!
//! [`Pipeline::run`] drives one request through
//! `ROBOTS_CHECK → CACHE_LOOKUP → (hit: DONE) | FETCHING → EXTRACTING →
//! CONVERTING → CHUNKING → CACHING → DONE`. Stages run strictly in order.
//! Any failure ends the request with no cache write; the cache only ever
//! sees complete results.
//!
//! # Example
//!
//! ```rust,no_run
//! use pagechunk_core::{DefaultFetcher, Pipeline, RenderMode, ResultCache, ScrapeConfig, ScrapeRequest};
//!
//! # async fn example() -> pagechunk_core::Result<()> {
//! let config = ScrapeConfig::default();
//! let fetcher = DefaultFetcher::new(&config)?.shared();
//! let pipeline = Pipeline::new(config, fetcher)?.with_cache(ResultCache::new(".cache"));
//!
//! let request = ScrapeRequest::new("https://example.com", RenderMode::Static, 1000, false, 1000)?;
//! let output = pipeline.run(&request).await?;
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::sync::Arc;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{debug, info, warn};

use crate::article::{ArticleContent, ArticleExtractor, ReadabilityExtractor, fallback_article};
use crate::cache::{CacheEntry, ResultCache};
use crate::chunk::{ChunkConfig, chunk};
use crate::fetch::{FetchedPage, PageFetcher};
use crate::formatters::{MarkdownConverter, compose_frontmatter};
use crate::hash::fingerprint;
use crate::result::{FetchStatus, PageMeta, ScrapeOutput, ScrapeRequest, ScrapeResult};
use crate::robots::RobotsGate;
use crate::{Result, ScrapeConfig, ScrapeError};

/// Pipeline states, used to label log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    RobotsCheck,
    CacheLookup,
    Fetching,
    Extracting,
    Converting,
    Chunking,
    Caching,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::RobotsCheck => "robots_check",
            Stage::CacheLookup => "cache_lookup",
            Stage::Fetching => "fetching",
            Stage::Extracting => "extracting",
            Stage::Converting => "converting",
            Stage::Chunking => "chunking",
            Stage::Caching => "caching",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Sequences robots check, cache, fetch, extraction, conversion and chunking.
pub struct Pipeline {
    config: ScrapeConfig,
    robots: RobotsGate,
    fetcher: Arc<dyn PageFetcher>,
    extractor: Arc<dyn ArticleExtractor>,
    converter: MarkdownConverter,
    cache: Option<ResultCache>,
}

impl Pipeline {
    /// Pipeline with the readability extractor and no cache.
    pub fn new(config: ScrapeConfig, fetcher: Arc<dyn PageFetcher>) -> Result<Self> {
        Ok(Self {
            robots: RobotsGate::new(&config)?,
            config,
            fetcher,
            extractor: Arc::new(ReadabilityExtractor),
            converter: MarkdownConverter::new(),
            cache: None,
        })
    }

    /// Persists results to (and serves hits from) `cache`.
    pub fn with_cache(mut self, cache: ResultCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Replaces the main-content extractor.
    pub fn with_extractor(mut self, extractor: Arc<dyn ArticleExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }

    /// Runs a validated request end to end.
    pub async fn run(&self, request: &ScrapeRequest) -> Result<ScrapeOutput> {
        match self.run_stages(request).await {
            Ok(output) => Ok(output),
            Err(e) => {
                warn!(stage = %Stage::Failed, url = %request.url(), error = %e, "scrape failed");
                Err(e)
            }
        }
    }

    async fn run_stages(&self, request: &ScrapeRequest) -> Result<ScrapeOutput> {
        let url = request.url();

        debug!(stage = %Stage::RobotsCheck, %url);
        if !self.robots.check_allowed(url).await {
            return Err(ScrapeError::RobotsBlocked);
        }

        let key = request.cache_key();
        debug!(stage = %Stage::CacheLookup, %url, %key);
        if let Some(cache) = &self.cache
            && let Some(entry) = cache.get(&key).await
        {
            info!(stage = %Stage::Done, %url, %key, "cache hit");
            return Ok(respond(request, entry));
        }

        debug!(stage = %Stage::Fetching, %url, mode = ?request.render_mode());
        let page = self.fetcher.fetch(url, request.render_mode()).await?;

        let result = self.process_page(&page, request.target_words())?;
        let entry = CacheEntry { md: result.md.clone(), json: result };

        if let Some(cache) = &self.cache {
            debug!(stage = %Stage::Caching, %url, %key);
            if let Err(e) = cache.set(&key, &entry).await {
                warn!(%url, %key, error = %e, "cache write failed, result not persisted");
            }
        }

        info!(
            stage = %Stage::Done,
            %url,
            final_url = %entry.json.meta.url,
            status = entry.json.fetched.status,
            chunks = entry.json.chunks.len(),
            "scrape complete"
        );
        Ok(respond(request, entry))
    }

    /// Extraction through chunking for an already fetched page.
    ///
    /// Domain and hashes derive from `page.final_url`.
    pub fn process_page(&self, page: &FetchedPage, target_words: usize) -> Result<ScrapeResult> {
        debug!(stage = %Stage::Extracting, url = %page.final_url);
        let article = self.extract(page)?;

        debug!(stage = %Stage::Converting, url = %page.final_url);
        let body = self.converter.convert(&article.content_html);

        let meta = PageMeta {
            title: article.title,
            url: page.final_url.to_string(),
            domain: page.final_url.host_str().unwrap_or_default().to_string(),
            crawled_at: timestamp(),
            content_hash: fingerprint(&body),
            excerpt: article.excerpt,
        };
        let md = compose_frontmatter(&body, &meta);

        debug!(stage = %Stage::Chunking, url = %page.final_url, target_words);
        let chunk_config = ChunkConfig::new(target_words, self.config.overlap_for(target_words));
        let chunks = chunk(&md, &chunk_config);

        Ok(ScrapeResult {
            id: ScrapeResult::identity(&meta),
            meta,
            md,
            chunks,
            fetched: FetchStatus { status: page.status_code },
        })
    }

    /// Primary extraction, then the whole-body fallback.
    fn extract(&self, page: &FetchedPage) -> Result<ArticleContent> {
        if let Some(article) = self.extractor.extract(&page.html, &page.final_url)
            && !article.is_empty()
        {
            return Ok(article);
        }

        debug!(url = %page.final_url, "readability found nothing, using document body");
        let fallback = fallback_article(&page.html);
        if fallback.is_empty() { Err(ScrapeError::NoContent) } else { Ok(fallback) }
    }
}

fn respond(request: &ScrapeRequest, entry: CacheEntry) -> ScrapeOutput {
    if request.raw_output() { ScrapeOutput::Markdown(entry.md) } else { ScrapeOutput::Json(Box::new(entry.json)) }
}

/// Current UTC time as RFC 3339.
pub fn timestamp() -> String {
    OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default()
}
