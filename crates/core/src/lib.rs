pub mod article;
pub mod cache;
pub mod chunk;
pub mod config;
pub mod error;
pub mod fetch;
pub mod formatters;
pub mod hash;
pub mod parse;
pub mod pipeline;
#[cfg(feature = "render")]
pub mod render;
pub mod result;
pub mod robots;

pub use article::{ArticleContent, ArticleExtractor, ReadabilityExtractor, fallback_article};
pub use cache::{CacheEntry, ResultCache};
pub use chunk::{ChunkConfig, chunk, count_words};
pub use config::{DEFAULT_USER_AGENT, ScrapeConfig, ScrapeConfigBuilder, Viewport};
pub use error::{CacheWriteFailure, ErrorKind, Result, ScrapeError};
pub use fetch::{DefaultFetcher, FetchConfig, FetchedPage, HttpFetcher, PageFetcher, RenderMode};
pub use formatters::{MarkdownConverter, compose_frontmatter};
pub use hash::fingerprint;
pub use parse::Document;
pub use pipeline::{Pipeline, Stage, timestamp};
#[cfg(feature = "render")]
pub use render::RenderingEngine;
pub use result::{Chunk, FetchStatus, PageMeta, ScrapeOutput, ScrapeRequest, ScrapeResult};
pub use robots::RobotsGate;
