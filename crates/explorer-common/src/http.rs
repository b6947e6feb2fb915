/// Plain-text HTTP client used to pull tabular feeds.
///
/// Requests are issued exactly once. Retrying is a caller decision, so a
/// failed fetch is surfaced immediately as a `CommonError`.
use std::time::Duration;

use futures::StreamExt;
use tracing::{debug, warn};

use crate::error::CommonError;

#[derive(Clone, Debug)]
pub struct FeedClientConfig {
    pub timeout: Duration,
    pub user_agent: String,
    pub max_error_body_bytes: usize,
}

impl Default for FeedClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: "explorer/location-explorer".to_string(),
            max_error_body_bytes: 8 * 1024,
        }
    }
}

impl FeedClientConfig {
    /// Optional:
    /// - `EXPLORER_FETCH_TIMEOUT_SECS` (default: 30)
    /// - `EXPLORER_USER_AGENT` (default: "explorer/location-explorer")
    /// - `EXPLORER_MAX_ERROR_BODY_BYTES` (default: 8192)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let timeout = std::env::var("EXPLORER_FETCH_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);

        let user_agent = std::env::var("EXPLORER_USER_AGENT")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.user_agent);

        let max_error_body_bytes = std::env::var("EXPLORER_MAX_ERROR_BODY_BYTES")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(defaults.max_error_body_bytes);

        Self {
            timeout,
            user_agent,
            max_error_body_bytes,
        }
    }
}

#[derive(Clone)]
pub struct FeedClient {
    config: FeedClientConfig,
    http: reqwest::Client,
}

impl FeedClient {
    pub fn new(config: FeedClientConfig) -> Result<Self, CommonError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()?;
        Ok(Self { config, http })
    }

    /// GET `url` and return the body as text. Any non-2xx status is an error.
    pub async fn fetch_text(&self, url: &str) -> Result<String, CommonError> {
        debug!(url, "fetching feed");
        let resp = self.http.get(url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = read_limited_text(resp, self.config.max_error_body_bytes).await;
            return Err(CommonError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let text = resp.text().await?;
        debug!(url, bytes = text.len(), "feed fetched");
        Ok(text)
    }
}

async fn read_limited_text(resp: reqwest::Response, max_bytes: usize) -> String {
    let mut stream = resp.bytes_stream();
    let mut buf: Vec<u8> = Vec::new();
    while let Some(next) = stream.next().await {
        match next {
            Ok(chunk) => {
                let room = max_bytes.saturating_sub(buf.len());
                buf.extend_from_slice(&chunk[..chunk.len().min(room)]);
                if buf.len() >= max_bytes {
                    break;
                }
            }
            Err(e) => {
                warn!(error = %e, "failed to read upstream error body");
                if buf.is_empty() {
                    return "<failed to read error body>".to_string();
                }
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::{Router, http::StatusCode, routing::get};
    use tokio::net::TcpListener;

    async fn spawn_server(app: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve");
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn fetch_text_returns_body() {
        let base = spawn_server(Router::new().route("/feed", get(|| async { "a,b\n1,2" }))).await;
        let client = FeedClient::new(FeedClientConfig::default()).expect("client");
        let text = client.fetch_text(&format!("{base}/feed")).await.expect("fetch");
        assert_eq!(text, "a,b\n1,2");
    }

    #[tokio::test]
    async fn non_success_status_is_upstream_error() {
        let base = spawn_server(Router::new().route(
            "/gone",
            get(|| async { (StatusCode::NOT_FOUND, "no such sheet") }),
        ))
        .await;
        let client = FeedClient::new(FeedClientConfig::default()).expect("client");
        let err = client
            .fetch_text(&format!("{base}/gone"))
            .await
            .expect_err("404 must fail");
        assert_eq!(err.status(), Some(404));
        match err {
            CommonError::Upstream { body, .. } => assert_eq!(body, "no such sheet"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn error_body_is_truncated() {
        let base = spawn_server(Router::new().route(
            "/boom",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "x".repeat(100)) }),
        ))
        .await;
        let config = FeedClientConfig {
            max_error_body_bytes: 10,
            ..FeedClientConfig::default()
        };
        let client = FeedClient::new(config).expect("client");
        let err = client
            .fetch_text(&format!("{base}/boom"))
            .await
            .expect_err("500 must fail");
        match err {
            CommonError::Upstream { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body.len(), 10);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
