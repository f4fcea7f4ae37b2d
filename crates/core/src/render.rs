//! Headless browser rendering.
//!
//! [`RenderingEngine`] owns one Chromium process for the lifetime of the
//! program. It is launched explicitly at startup and handed to the fetcher
//! as an `Arc`; [`RenderingEngine::shutdown`] closes it on termination.
//!
//! Every [`render`](RenderingEngine::render) call runs in its own browser
//! context so concurrent requests never share cookies or storage. The page
//! and context are released on every exit path, including navigation
//! failure and timeout.

use std::time::Duration;

use chromiumoxide::Page;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::browser::{BrowserContextId, CloseParams};
use chromiumoxide::cdp::browser_protocol::emulation::{SetDeviceMetricsOverrideParams, SetUserAgentOverrideParams};
use chromiumoxide::cdp::browser_protocol::network::{EnableParams, EventResponseReceived, ResourceType};
use chromiumoxide::cdp::browser_protocol::page::{EventDomContentEventFired, NavigateParams};
use chromiumoxide::cdp::browser_protocol::target::{
    CreateBrowserContextParams, CreateTargetParams, DisposeBrowserContextParams,
};
use futures::{FutureExt, StreamExt};
use tokio::task::JoinHandle;
use tokio::time::{Instant, timeout_at};
use tracing::{debug, warn};
use url::Url;

use crate::config::{ScrapeConfig, Viewport};
use crate::fetch::FetchedPage;
use crate::{Result, ScrapeError};

/// Shared handle to a launched headless browser.
pub struct RenderingEngine {
    browser: Browser,
    handler: JoinHandle<()>,
    user_agent: String,
    viewport: Viewport,
    timeout: Duration,
    settle_delay: Duration,
}

impl RenderingEngine {
    /// Launches the browser and starts driving its event loop.
    pub async fn launch(config: &ScrapeConfig) -> Result<Self> {
        let browser_config = BrowserConfig::builder()
            .no_sandbox()
            .args(["--disable-gpu", "--disable-dev-shm-usage", "--disable-extensions"])
            .build()
            .map_err(ScrapeError::Render)?;

        let (browser, mut handler) = Browser::launch(browser_config).await.map_err(render_error)?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        debug!("rendering engine launched");

        Ok(Self {
            browser,
            handler,
            user_agent: config.user_agent.clone(),
            viewport: config.viewport,
            timeout: config.fetch_timeout,
            settle_delay: config.settle_delay,
        })
    }

    /// Renders `url` in a fresh browser context and returns the serialized DOM.
    ///
    /// The fetch timeout bounds the whole call: context creation, page
    /// creation, navigation and capture share one deadline.
    pub async fn render(&self, url: &Url) -> Result<FetchedPage> {
        let deadline = Instant::now() + self.timeout;

        let context = timeout_at(deadline, self.browser.execute(CreateBrowserContextParams::default()))
            .await
            .map_err(|_| self.timed_out())?
            .map_err(render_error)?
            .result
            .browser_context_id;

        let outcome = match timeout_at(deadline, self.open_page(&context)).await {
            Ok(Ok(page)) => {
                let captured = timeout_at(deadline, self.capture(&page, url)).await;
                if let Err(e) = page.close().await {
                    warn!(%url, error = %e, "failed to close rendered page");
                }
                captured.unwrap_or_else(|_| Err(self.timed_out()))
            }
            Ok(Err(e)) => Err(e),
            Err(_) => Err(self.timed_out()),
        };

        // Disposing the context also closes any page a timed-out `open_page` left behind.
        if let Err(e) = self.browser.execute(DisposeBrowserContextParams::new(context)).await {
            warn!(%url, error = %e, "failed to dispose browser context");
        }

        outcome
    }

    /// Closes the browser and stops the event loop.
    pub async fn shutdown(self) {
        if let Err(e) = self.browser.execute(CloseParams::default()).await {
            warn!(error = %e, "browser did not close cleanly");
        }
        self.handler.abort();
        debug!("rendering engine stopped");
    }

    async fn open_page(&self, context: &BrowserContextId) -> Result<Page> {
        let target = CreateTargetParams::builder()
            .url("about:blank")
            .browser_context_id(context.clone())
            .build()
            .map_err(ScrapeError::Render)?;

        let page = self.browser.new_page(target).await.map_err(render_error)?;

        let configured = async {
            page.execute(SetUserAgentOverrideParams::new(self.user_agent.clone())).await?;
            page.execute(SetDeviceMetricsOverrideParams::new(
                i64::from(self.viewport.width),
                i64::from(self.viewport.height),
                1.0,
                false,
            ))
            .await?;
            page.execute(EnableParams::default()).await?;
            Ok::<_, chromiumoxide::error::CdpError>(())
        }
        .await;

        match configured {
            Ok(()) => Ok(page),
            Err(e) => {
                if let Err(close) = page.close().await {
                    warn!(error = %close, "failed to close unconfigured page");
                }
                Err(render_error(e))
            }
        }
    }

    /// Navigates, waits for the initial DOM plus the settle delay, then
    /// serializes the document.
    async fn capture(&self, page: &Page, url: &Url) -> Result<FetchedPage> {
        let mut dom_ready = page.event_listener::<EventDomContentEventFired>().await.map_err(render_error)?;
        let mut responses = page.event_listener::<EventResponseReceived>().await.map_err(render_error)?;

        let navigation = page.execute(NavigateParams::new(url.as_str())).await.map_err(render_error)?;
        if let Some(reason) = navigation.result.error_text.as_ref() {
            return Err(ScrapeError::Render(format!("navigation to {url} failed: {reason}")));
        }

        dom_ready.next().await;
        tokio::time::sleep(self.settle_delay).await;

        let html = page.content().await.map_err(render_error)?;
        let final_url = page
            .url()
            .await
            .map_err(render_error)?
            .and_then(|u| Url::parse(&u).ok())
            .unwrap_or_else(|| url.clone());

        let mut status_code = 200;
        while let Some(Some(event)) = responses.next().now_or_never() {
            if event.r#type == ResourceType::Document {
                status_code = u16::try_from(event.response.status).unwrap_or(200);
                break;
            }
        }

        Ok(FetchedPage { html, final_url, status_code })
    }

    fn timed_out(&self) -> ScrapeError {
        ScrapeError::Timeout { timeout: self.timeout.as_secs() }
    }
}

fn render_error(err: chromiumoxide::error::CdpError) -> ScrapeError {
    ScrapeError::Render(err.to_string())
}
