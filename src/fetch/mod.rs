//! HTTP retrieval of remote CSV sources.

mod client;

pub use client::{BasicClient, DEFAULT_TIMEOUT, HttpClient};

use crate::error::LoadError;
use tracing::debug;

/// Returns `true` if `source` should be fetched over HTTP rather than read
/// from disk.
pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// GETs `url` and returns the body. Non-2xx responses are errors.
pub async fn fetch_bytes<C: HttpClient + ?Sized>(client: &C, url: &str) -> Result<Vec<u8>, LoadError> {
    let fetch_error = |message: String| LoadError::Fetch {
        url: url.to_string(),
        message,
    };

    let parsed = reqwest::Url::parse(url).map_err(|e| fetch_error(e.to_string()))?;
    let mut req = reqwest::Request::new(reqwest::Method::GET, parsed);
    req.headers_mut().insert(
        reqwest::header::ACCEPT,
        reqwest::header::HeaderValue::from_static("text/csv, text/plain;q=0.9, */*;q=0.1"),
    );

    let resp = client
        .execute(req)
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(|e| fetch_error(e.to_string()))?;

    let bytes = resp.bytes().await.map_err(|e| fetch_error(e.to_string()))?;
    debug!(url, bytes = bytes.len(), "Fetched remote source");
    Ok(bytes.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_remote() {
        assert!(is_remote("https://example.com/superstore.csv"));
        assert!(is_remote("http://localhost:8000/data.csv"));
        assert!(!is_remote("./datasets/superstore.csv"));
        assert!(!is_remote("httpdocs/superstore.csv"));
    }

    #[tokio::test]
    async fn test_fetch_bytes_rejects_bad_url() {
        let client = BasicClient::new();
        let err = fetch_bytes(&client, "http://").await.unwrap_err();
        assert!(matches!(err, LoadError::Fetch { .. }));
    }

    struct RecordingClient {
        accept: std::sync::Mutex<Option<String>>,
        inner: BasicClient,
    }

    #[async_trait::async_trait]
    impl HttpClient for RecordingClient {
        async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
            *self.accept.lock().unwrap() = req
                .headers()
                .get(reqwest::header::ACCEPT)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            self.inner.execute(req).await
        }
    }

    #[tokio::test]
    async fn test_fetch_bytes_asks_for_csv_and_reports_connection_errors() {
        let client = RecordingClient {
            accept: std::sync::Mutex::new(None),
            inner: BasicClient::with_timeout(std::time::Duration::from_secs(2)),
        };
        let err = fetch_bytes(&client, "http://127.0.0.1:9/superstore.csv")
            .await
            .unwrap_err();

        assert!(matches!(err, LoadError::Fetch { ref url, .. } if url.ends_with("superstore.csv")));
        let accept = client.accept.lock().unwrap().clone().unwrap();
        assert!(accept.starts_with("text/csv"));
    }
}
