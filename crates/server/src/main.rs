use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use pagechunk_core::{DefaultFetcher, Pipeline, RenderingEngine, ResultCache, ScrapeConfig};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod routes;

use config::Args;
use routes::{AppState, router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = args.scrape_config();

    let engine = if args.no_browser { None } else { launch_engine(&config).await };

    let mut fetcher = DefaultFetcher::new(&config).context("Failed to build HTTP client")?;
    if let Some(engine) = &engine {
        fetcher = fetcher.with_engine(Arc::clone(engine));
    }

    let pipeline = Pipeline::new(config, fetcher.shared())
        .context("Failed to build pipeline")?
        .with_cache(ResultCache::new(&args.cache_dir));

    let listener = TcpListener::bind((args.host.as_str(), args.port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", args.host, args.port))?;
    info!(
        addr = %listener.local_addr()?,
        cache_dir = %args.cache_dir.display(),
        rendering = engine.is_some(),
        "pagechunk server listening"
    );

    axum::serve(listener, router(AppState::new(pipeline)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    if let Some(engine) = engine {
        match Arc::try_unwrap(engine) {
            Ok(engine) => engine.shutdown().await,
            Err(_) => warn!("rendering engine still in use at shutdown, leaving browser to exit with the process"),
        }
    }

    info!("shutdown complete");
    Ok(())
}

async fn launch_engine(config: &ScrapeConfig) -> Option<Arc<RenderingEngine>> {
    match RenderingEngine::launch(config).await {
        Ok(engine) => {
            info!("headless browser launched");
            Some(Arc::new(engine))
        }
        Err(e) => {
            warn!(error = %e, "headless browser unavailable, rendered requests will fail");
            None
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}
