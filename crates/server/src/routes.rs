use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use pagechunk_core::{Pipeline, RenderMode, ScrapeOutput, ScrapeRequest, timestamp};
use serde::Deserialize;
use serde_json::json;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<Pipeline>,
}

impl AppState {
    pub fn new(pipeline: Pipeline) -> Self {
        Self { pipeline: Arc::new(pipeline) }
    }
}

/// Raw query string values; anything unparseable falls back to its default.
#[derive(Debug, Deserialize)]
pub struct ScrapeQuery {
    url: Option<String>,
    render: Option<String>,
    target_words: Option<String>,
    raw: Option<String>,
}

impl ScrapeQuery {
    fn into_request(self, default_target_words: usize) -> Result<ScrapeRequest, ApiError> {
        let url = self.url.unwrap_or_default();
        let render = RenderMode::from_flag(flag(self.render.as_deref(), true));
        let target_words = self
            .target_words
            .as_deref()
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(default_target_words);
        let raw = flag(self.raw.as_deref(), false);

        Ok(ScrapeRequest::new(&url, render, target_words, raw, default_target_words)?)
    }
}

fn flag(value: Option<&str>, default: bool) -> bool {
    match value.map(str::trim) {
        Some("true") | Some("1") => true,
        Some("false") | Some("0") => false,
        _ => default,
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(scrape))
        .route("/health", get(health))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn scrape(
    State(state): State<AppState>,
    query: Result<Query<ScrapeQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    let request = query.into_request(state.pipeline.config().default_target_words)?;

    match state.pipeline.run(&request).await? {
        ScrapeOutput::Json(result) => Ok(Json(*result).into_response()),
        ScrapeOutput::Markdown(md) => Ok(([(header::CONTENT_TYPE, "text/markdown; charset=utf-8")], md).into_response()),
    }
}

async fn health() -> impl IntoResponse {
    Json(json!({ "ok": true, "ts": timestamp() }))
}
