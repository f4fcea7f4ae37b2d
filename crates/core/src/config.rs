//! Pipeline configuration.
//!
//! [`ScrapeConfig`] gathers every tunable used across the pipeline: agent
//! strings, timeouts, the rendering viewport and the chunk sizing defaults.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use pagechunk_core::ScrapeConfig;
//!
//! let config = ScrapeConfig::builder()
//!     .robots_agent("MyBot")
//!     .fetch_timeout(Duration::from_secs(10))
//!     .build();
//! assert_eq!(config.robots_agent, "MyBot");
//! ```

use std::time::Duration;

use crate::fetch::FetchConfig;

/// Agent string sent with every page and robots.txt request.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; PageChunkBot/0.1; +https://github.com/pagechunk/pagechunk)";

/// Browser viewport used for rendered fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { width: 1280, height: 800 }
    }
}

/// Configuration shared by every pipeline stage.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// User-Agent for page fetches, robots.txt fetches and rendered contexts.
    pub user_agent: String,

    /// Crawler identifier matched against `User-agent` groups in robots.txt
    /// (default: `PageChunkBot`).
    pub robots_agent: String,

    /// Deadline for the robots.txt request (default: 5s).
    pub robots_timeout: Duration,

    /// Deadline for a page fetch, static or rendered (default: 20s).
    pub fetch_timeout: Duration,

    /// Pause after `DOMContentLoaded` before the DOM is captured (default: 300ms).
    pub settle_delay: Duration,

    /// Viewport for rendered fetches (default: 1280x800).
    pub viewport: Viewport,

    /// Target chunk size when the request does not name one (default: 1000).
    pub default_target_words: usize,

    /// Hard ceiling on chunk overlap (default: 250).
    pub max_overlap_words: usize,

    /// Overlap as a fraction of the target size (default: 0.2).
    pub overlap_ratio: f64,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            robots_agent: "PageChunkBot".to_string(),
            robots_timeout: Duration::from_secs(5),
            fetch_timeout: Duration::from_secs(20),
            settle_delay: Duration::from_millis(300),
            viewport: Viewport::default(),
            default_target_words: 1000,
            max_overlap_words: 250,
            overlap_ratio: 0.2,
        }
    }
}

impl ScrapeConfig {
    /// Creates a new builder for ScrapeConfig.
    pub fn builder() -> ScrapeConfigBuilder {
        ScrapeConfigBuilder::new()
    }

    /// Overlap for a given target size: `min(max_overlap_words, floor(ratio * target))`.
    pub fn overlap_for(&self, target_words: usize) -> usize {
        let scaled = (self.overlap_ratio * target_words as f64).floor() as usize;
        scaled.min(self.max_overlap_words)
    }

    /// HTTP settings for the static fetcher.
    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig { timeout: self.fetch_timeout.as_secs(), user_agent: self.user_agent.clone() }
    }
}

/// Builder for ScrapeConfig.
pub struct ScrapeConfigBuilder {
    config: ScrapeConfig,
}

impl ScrapeConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self { config: ScrapeConfig::default() }
    }

    /// Sets the User-Agent string.
    pub fn user_agent(mut self, value: impl Into<String>) -> Self {
        self.config.user_agent = value.into();
        self
    }

    /// Sets the crawler identifier used for robots.txt matching.
    pub fn robots_agent(mut self, value: impl Into<String>) -> Self {
        self.config.robots_agent = value.into();
        self
    }

    /// Sets the robots.txt deadline.
    pub fn robots_timeout(mut self, value: Duration) -> Self {
        self.config.robots_timeout = value;
        self
    }

    /// Sets the page fetch deadline.
    pub fn fetch_timeout(mut self, value: Duration) -> Self {
        self.config.fetch_timeout = value;
        self
    }

    /// Sets the post-load settle delay for rendered fetches.
    pub fn settle_delay(mut self, value: Duration) -> Self {
        self.config.settle_delay = value;
        self
    }

    /// Sets the rendering viewport.
    pub fn viewport(mut self, width: u32, height: u32) -> Self {
        self.config.viewport = Viewport { width, height };
        self
    }

    /// Sets the default chunk target.
    pub fn default_target_words(mut self, value: usize) -> Self {
        self.config.default_target_words = value;
        self
    }

    /// Sets the overlap ceiling.
    pub fn max_overlap_words(mut self, value: usize) -> Self {
        self.config.max_overlap_words = value;
        self
    }

    /// Builds the config.
    pub fn build(self) -> ScrapeConfig {
        self.config
    }
}

impl Default for ScrapeConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
