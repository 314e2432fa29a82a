//! Runtime configuration, read from flags or `BLOTTER_*` environment variables

use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::{
    ConfigError, FetchError, HttpFetcher, PageWalker,
    fetch::DEFAULT_USER_AGENT,
    leaderboard::DEFAULT_TOP_N,
    walker::{DEFAULT_DATE_SCAN_PAGES, DEFAULT_HEADERS_PER_PAGE, DEFAULT_MAX_PAGES},
};

pub const DEFAULT_START_URL: &str = "https://brownsvillepd.blogspot.com/";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Everything needed to walk the blog and size the leaderboard
#[derive(Debug, Clone, PartialEq, Eq, clap::Args, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// First listing page of the blog
    #[arg(long, env = "BLOTTER_START_URL", default_value = DEFAULT_START_URL)]
    pub start_url: String,

    /// Maximum number of pages to walk
    #[arg(long, env = "BLOTTER_MAX_PAGES", default_value_t = DEFAULT_MAX_PAGES)]
    pub max_pages: usize,

    /// Number of leaderboard rows
    #[arg(long, env = "BLOTTER_TOP_N", default_value_t = DEFAULT_TOP_N)]
    pub top_n: usize,

    /// Final pages whose date headings set the earliest date (0 disables)
    #[arg(long, env = "BLOTTER_DATE_SCAN_PAGES", default_value_t = DEFAULT_DATE_SCAN_PAGES)]
    pub date_scan_pages: usize,

    /// Date headings considered per page
    #[arg(long, env = "BLOTTER_DATE_HEADERS_PER_PAGE", default_value_t = DEFAULT_HEADERS_PER_PAGE)]
    pub date_headers_per_page: usize,

    /// Pause between page fetches, in milliseconds
    #[arg(long, env = "BLOTTER_DELAY_MS", default_value_t = 0)]
    pub delay_ms: u64,

    /// Per-request timeout, in seconds
    #[arg(long, env = "BLOTTER_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// User-Agent header sent with every request
    #[arg(long, env = "BLOTTER_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            start_url: DEFAULT_START_URL.to_string(),
            max_pages: DEFAULT_MAX_PAGES,
            top_n: DEFAULT_TOP_N,
            date_scan_pages: DEFAULT_DATE_SCAN_PAGES,
            date_headers_per_page: DEFAULT_HEADERS_PER_PAGE,
            delay_ms: 0,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl BoardConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match Url::parse(&self.start_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => {
                return Err(ConfigError::InvalidStartUrl {
                    url: self.start_url.clone(),
                    reason: format!("unsupported scheme '{}'", url.scheme()),
                });
            }
            Err(error) => {
                return Err(ConfigError::InvalidStartUrl {
                    url: self.start_url.clone(),
                    reason: error.to_string(),
                });
            }
        }
        if self.max_pages == 0 {
            return Err(ConfigError::InvalidMaxPages(0));
        }
        if self.top_n == 0 {
            return Err(ConfigError::InvalidTopN(0));
        }
        if self.date_headers_per_page == 0 {
            return Err(ConfigError::InvalidHeadersPerPage(0));
        }
        Ok(())
    }

    /// Build a walker with this config's budget, date policy and pacing
    pub fn walker(&self) -> Result<PageWalker, ConfigError> {
        PageWalker::builder()
            .max_pages(self.max_pages)
            .date_scan_pages(self.date_scan_pages)
            .date_headers_per_page(self.date_headers_per_page)
            .delay(Duration::from_millis(self.delay_ms))
            .build()
    }

    pub fn http_fetcher(&self) -> Result<HttpFetcher, FetchError> {
        HttpFetcher::new(&self.user_agent, Duration::from_secs(self.timeout_secs))
    }
}
