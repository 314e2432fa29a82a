//! Retrieving listing pages

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::FetchError;

/// Default `User-Agent` sent with every request
pub const DEFAULT_USER_AGENT: &str = concat!("blotter/", env!("CARGO_PKG_VERSION"));

/// Source of listing page HTML
///
/// The walker only ever asks for one page at a time and treats any error as
/// fatal to the walk. Implement this to serve pages from somewhere other
/// than the network, or to add retries around [`HttpFetcher`].
///
/// # Example
///
/// ```ignore
/// use blotter::{FetchError, PageFetcher};
///
/// struct Fixture(String);
///
/// #[async_trait::async_trait]
/// impl PageFetcher for Fixture {
///     async fn fetch(&self, _url: &str) -> Result<String, FetchError> {
///         Ok(self.0.clone())
///     }
/// }
/// ```
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the body of `url`
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

#[async_trait]
impl<T: PageFetcher + ?Sized> PageFetcher for std::sync::Arc<T> {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        (**self).fetch(url).await
    }
}

/// [`PageFetcher`] backed by a `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a client with the given user agent and per-request timeout
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|error| FetchError::Client { error })?;
        Ok(Self { client })
    }

    /// Wrap a client configured elsewhere, e.g. with proxies or extra headers
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        debug!(%url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|error| FetchError::Request {
                url: url.to_string(),
                error,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|error| FetchError::Request {
            url: url.to_string(),
            error,
        })
    }
}
