//! robots.txt politeness check.
//!
//! [`RobotsGate`] fetches `{scheme}://{host}/robots.txt` once per check and
//! asks whether either the named crawler or the wildcard agent may fetch the
//! URL. Any fetch failure (timeout, network error, non-success status,
//! undecodable body) fails open: the check answers "allowed".

use reqwest::Client;
use robotstxt::DefaultMatcher;
use tracing::{debug, warn};
use url::Url;

use crate::{Result, ScrapeConfig};

/// Best-effort robots.txt checker.
#[derive(Debug, Clone)]
pub struct RobotsGate {
    client: Client,
    agent: String,
}

impl RobotsGate {
    pub fn new(config: &ScrapeConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.robots_timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { client, agent: config.robots_agent.clone() })
    }

    /// `true` unless a retrieved robots.txt disallows `url` for both the
    /// named crawler and `*`.
    pub async fn check_allowed(&self, url: &Url) -> bool {
        let Some(robots_url) = robots_url(url) else {
            return true;
        };

        match self.fetch(&robots_url).await {
            Ok(Some(body)) => {
                let allowed = is_allowed(&body, &self.agent, url.as_str());
                debug!(%url, allowed, "robots.txt evaluated");
                allowed
            }
            Ok(None) => true,
            Err(e) => {
                warn!(%robots_url, error = %e, "robots.txt check failed, allowing");
                true
            }
        }
    }

    /// Body of robots.txt, or `None` when the server reports no such file.
    async fn fetch(&self, robots_url: &Url) -> std::result::Result<Option<String>, reqwest::Error> {
        let response = self.client.get(robots_url.clone()).send().await?;
        if !response.status().is_success() {
            debug!(%robots_url, status = %response.status(), "no robots.txt");
            return Ok(None);
        }
        response.text().await.map(Some)
    }
}

/// `{scheme}://{host[:port]}/robots.txt` for `url`.
pub fn robots_url(url: &Url) -> Option<Url> {
    url.host_str()?;
    url.join("/robots.txt").ok()
}

/// Permission for `agent` OR the wildcard agent.
pub fn is_allowed(robots_body: &str, agent: &str, url: &str) -> bool {
    let mut matcher = DefaultMatcher::default();
    if matcher.one_agent_allowed_by_robots(robots_body, agent, url) {
        return true;
    }

    let mut matcher = DefaultMatcher::default();
    matcher.one_agent_allowed_by_robots(robots_body, "*", url)
}
