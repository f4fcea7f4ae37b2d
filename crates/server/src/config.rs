use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use pagechunk_core::ScrapeConfig;

/// Scrape web pages into frontmatter Markdown and overlapping chunks over HTTP
#[derive(Parser, Debug, Clone)]
#[command(name = "pagechunk-server")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Interface to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Directory holding cached results
    #[arg(long, env = "CACHE_DIR", default_value = ".cache", value_name = "DIR")]
    pub cache_dir: PathBuf,

    /// Do not launch the headless browser; rendered requests will fail
    #[arg(long, env = "PAGECHUNK_NO_BROWSER")]
    pub no_browser: bool,

    /// User-Agent for page fetches and rendering
    #[arg(long, env = "PAGECHUNK_USER_AGENT", value_name = "UA")]
    pub user_agent: Option<String>,

    /// Page fetch/render timeout in seconds
    #[arg(long, env = "PAGECHUNK_FETCH_TIMEOUT", default_value_t = 20, value_name = "SECS")]
    pub fetch_timeout: u64,
}

impl Args {
    pub fn scrape_config(&self) -> ScrapeConfig {
        let mut builder = ScrapeConfig::builder().fetch_timeout(Duration::from_secs(self.fetch_timeout));
        if let Some(ua) = &self.user_agent {
            builder = builder.user_agent(ua.clone());
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["pagechunk-server"]).unwrap();
        assert_eq!(args.port, 3000);
        assert_eq!(args.cache_dir, PathBuf::from(".cache"));
        assert!(!args.no_browser);

        let config = args.scrape_config();
        assert_eq!(config.fetch_timeout, Duration::from_secs(20));
        assert_eq!(config.user_agent, pagechunk_core::DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_overrides() {
        let args = Args::try_parse_from([
            "pagechunk-server",
            "--port",
            "8080",
            "--no-browser",
            "--user-agent",
            "TestAgent/1.0",
            "--fetch-timeout",
            "5",
        ])
        .unwrap();

        assert_eq!(args.port, 8080);
        assert!(args.no_browser);
        let config = args.scrape_config();
        assert_eq!(config.user_agent, "TestAgent/1.0");
        assert_eq!(config.fetch_timeout, Duration::from_secs(5));
    }
}
