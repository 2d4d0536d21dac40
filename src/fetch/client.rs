use async_trait::async_trait;
use reqwest::{Request, Response};
use std::time::Duration;
use tracing::warn;

/// Default per-request timeout for remote CSV sources.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// `User-Agent` sent with every remote fetch.
pub const USER_AGENT: &str = concat!("sales_charts/", env!("CARGO_PKG_VERSION"));

/// Transport used by the loader for remote CSV sources.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}

/// `reqwest` client that identifies itself and gives up after a timeout.
#[derive(Debug, Clone)]
pub struct BasicClient {
    inner: reqwest::Client,
}

impl BasicClient {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Like [`BasicClient::try_with_timeout`], but falls back to a plain
    /// client (no timeout, default user agent) with a warning on failure.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::try_with_timeout(timeout).unwrap_or_else(|e| {
            warn!(error = %e, "HTTP client setup failed; using defaults without timeout");
            Self {
                inner: reqwest::Client::new(),
            }
        })
    }

    pub fn try_with_timeout(timeout: Duration) -> reqwest::Result<Self> {
        let inner = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { inner })
    }
}

impl Default for BasicClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for BasicClient {
    async fn execute(&self, req: Request) -> reqwest::Result<Response> {
        self.inner.execute(req).await
    }
}
