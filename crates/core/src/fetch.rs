//! Page retrieval.
//!
//! A [`PageFetcher`] turns a URL into a [`FetchedPage`]. [`HttpFetcher`]
//! performs a plain GET; [`DefaultFetcher`] dispatches on [`RenderMode`],
//! sending rendered requests to a shared
//! [`RenderingEngine`](crate::render::RenderingEngine) when one was supplied.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

#[cfg(feature = "render")]
use crate::render::RenderingEngine;
use crate::{Result, ScrapeConfig, ScrapeError};

/// HTTP client configuration for fetching web pages.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// Custom User-Agent string.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout: 20, user_agent: crate::config::DEFAULT_USER_AGENT.to_string() }
    }
}

/// How a page is retrieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Direct HTTP GET, body used verbatim.
    Static,
    /// Navigate in a headless browser and serialize the resulting DOM.
    Rendered,
}

impl RenderMode {
    /// `true` for [`RenderMode::Rendered`]; the flag that enters the cache key.
    pub fn is_rendered(self) -> bool {
        matches!(self, RenderMode::Rendered)
    }

    pub fn from_flag(render: bool) -> Self {
        if render { RenderMode::Rendered } else { RenderMode::Static }
    }
}

/// A retrieved page.
///
/// `final_url` is where the request ended up after redirects; every
/// downstream domain and hash computation uses it instead of the request URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub html: String,
    pub final_url: Url,
    pub status_code: u16,
}

/// Retrieves pages for the pipeline.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches `url` in the given mode.
    ///
    /// Fails with a fetch-kind [`ScrapeError`] on timeout, network failure,
    /// or rendered navigation failure.
    async fn fetch(&self, url: &Url, mode: RenderMode) -> Result<FetchedPage>;
}

/// Static fetcher backed by a reusable reqwest client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: u64,
}

impl HttpFetcher {
    /// Builds the client once; redirects are followed, the timeout applies
    /// to the whole request.
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { client, timeout: config.timeout })
    }

    /// Performs the GET and returns the body verbatim.
    pub async fn get(&self, url: &Url) -> Result<FetchedPage> {
        let response = self
            .client
            .get(url.clone())
            .header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let final_url = response.url().clone();
        let status_code = response.status().as_u16();
        let html = response.text().await.map_err(|e| self.classify(e))?;

        Ok(FetchedPage { html, final_url, status_code })
    }

    fn classify(&self, err: reqwest::Error) -> ScrapeError {
        if err.is_timeout() { ScrapeError::Timeout { timeout: self.timeout } } else { ScrapeError::Http(err) }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url, _mode: RenderMode) -> Result<FetchedPage> {
        self.get(url).await
    }
}

/// Production fetcher: static requests over HTTP, rendered requests through
/// the shared rendering engine.
pub struct DefaultFetcher {
    http: HttpFetcher,
    #[cfg(feature = "render")]
    engine: Option<Arc<RenderingEngine>>,
}

impl DefaultFetcher {
    /// Fetcher without a rendering engine; rendered requests fail.
    pub fn new(config: &ScrapeConfig) -> Result<Self> {
        Ok(Self {
            http: HttpFetcher::new(&config.fetch_config())?,
            #[cfg(feature = "render")]
            engine: None,
        })
    }

    /// Attaches a launched engine for rendered requests.
    #[cfg(feature = "render")]
    pub fn with_engine(mut self, engine: Arc<RenderingEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Wraps the fetcher for sharing across requests.
    pub fn shared(self) -> Arc<dyn PageFetcher> {
        Arc::new(self)
    }
}

#[async_trait]
impl PageFetcher for DefaultFetcher {
    async fn fetch(&self, url: &Url, mode: RenderMode) -> Result<FetchedPage> {
        match mode {
            RenderMode::Static => self.http.get(url).await,
            #[cfg(feature = "render")]
            RenderMode::Rendered => match &self.engine {
                Some(engine) => engine.render(url).await,
                None => Err(ScrapeError::Render("rendering engine unavailable".to_string())),
            },
            #[cfg(not(feature = "render"))]
            RenderMode::Rendered => Err(ScrapeError::Render("rendering engine unavailable".to_string())),
        }
    }
}
