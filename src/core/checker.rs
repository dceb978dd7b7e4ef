/// Liveness probing for platform services
///
/// A probe is a plain HTTP GET against the service root. Every failure mode
/// (connection refused, timeout, non-2xx) is absorbed into `Offline`.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use reqwest::Client;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::core::registry::ServiceStatus;

/// Why a probe classified a service as offline
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("HTTP {0}")]
    Status(u16),
}

impl ProbeError {
    fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            ProbeError::Timeout(timeout)
        } else if err.is_connect() {
            ProbeError::Connect(err.to_string())
        } else {
            ProbeError::Request(err.to_string())
        }
    }
}

/// Result of a single probe, ready to be merged into the registry
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeOutcome {
    pub status: ServiceStatus,
    pub response_time_ms: u64,
    pub checked_at: DateTime<Utc>,
    pub error: Option<String>,
}

impl ProbeOutcome {
    pub fn online(response_time_ms: u64) -> Self {
        Self {
            status: ServiceStatus::Online,
            response_time_ms,
            checked_at: Utc::now(),
            error: None,
        }
    }

    pub fn offline(response_time_ms: u64, err: &ProbeError) -> Self {
        Self {
            status: ServiceStatus::Offline,
            response_time_ms,
            checked_at: Utc::now(),
            error: Some(err.to_string()),
        }
    }
}

/// Something that can check one service port.
///
/// Returned futures are `'static` so the scheduler can spawn them.
pub trait Probe: Send + Sync + 'static {
    fn probe(&self, port: u16) -> BoxFuture<'static, ProbeOutcome>;
}

#[derive(Clone)]
pub struct StatusChecker {
    client: Client,
    host: String,
    timeout: Duration,
}

impl StatusChecker {
    pub fn new(host: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            // Services are probed directly, never through a system proxy
            .no_proxy()
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            host: host.into(),
            timeout,
        })
    }

    pub fn url_for(&self, port: u16) -> String {
        format!("http://{}:{}/", self.host, port)
    }

    /// Probe one port. Never fails: errors become an `Offline` outcome.
    pub async fn check(&self, port: u16) -> ProbeOutcome {
        let url = self.url_for(port);
        let start = Instant::now();

        match self.request(&url).await {
            Ok(()) => {
                let elapsed = start.elapsed().as_millis() as u64;
                tracing::debug!(%url, elapsed_ms = elapsed, "probe succeeded");
                ProbeOutcome::online(elapsed)
            }
            Err(e) => {
                let elapsed = start.elapsed().as_millis() as u64;
                tracing::debug!(%url, error = %e, "probe failed");
                ProbeOutcome::offline(elapsed, &e)
            }
        }
    }

    async fn request(&self, url: &str) -> std::result::Result<(), ProbeError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ProbeError::from_reqwest(e, self.timeout))?;

        classify(response.status())
    }
}

impl Probe for StatusChecker {
    fn probe(&self, port: u16) -> BoxFuture<'static, ProbeOutcome> {
        let checker = self.clone();
        Box::pin(async move { checker.check(port).await })
    }
}

/// Only 2xx counts as online
fn classify(status: reqwest::StatusCode) -> std::result::Result<(), ProbeError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(ProbeError::Status(status.as_u16()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Minimal HTTP/1.1 responder that answers every connection with `status_line`
    async fn spawn_stub(status_line: &'static str, delay: Duration) -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                tokio::spawn(async move {
                    let mut buf = [0u8; 1024];
                    let _ = socket.read(&mut buf).await;
                    tokio::time::sleep(delay).await;
                    let response = format!(
                        "HTTP/1.1 {}\r\ncontent-length: 2\r\nconnection: close\r\n\r\nok",
                        status_line
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                });
            }
        });

        port
    }

    async fn closed_port() -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    }

    #[test]
    fn test_classify() {
        assert!(classify(reqwest::StatusCode::OK).is_ok());
        assert!(classify(reqwest::StatusCode::NO_CONTENT).is_ok());
        assert!(matches!(
            classify(reqwest::StatusCode::INTERNAL_SERVER_ERROR),
            Err(ProbeError::Status(500))
        ));
        assert!(matches!(
            classify(reqwest::StatusCode::NOT_FOUND),
            Err(ProbeError::Status(404))
        ));
    }

    #[test]
    fn test_url_for() {
        let checker = StatusChecker::new("localhost", Duration::from_secs(1)).unwrap();
        assert_eq!(checker.url_for(8002), "http://localhost:8002/");
    }

    #[tokio::test]
    async fn test_http_200_is_online() {
        let port = spawn_stub("200 OK", Duration::ZERO).await;
        let checker = StatusChecker::new("127.0.0.1", Duration::from_secs(2)).unwrap();

        let outcome = checker.check(port).await;
        assert_eq!(outcome.status, ServiceStatus::Online);
        assert!(outcome.error.is_none());
    }

    #[tokio::test]
    async fn test_http_500_is_offline() {
        let port = spawn_stub("500 Internal Server Error", Duration::ZERO).await;
        let checker = StatusChecker::new("127.0.0.1", Duration::from_secs(2)).unwrap();

        let outcome = checker.check(port).await;
        assert_eq!(outcome.status, ServiceStatus::Offline);
        assert_eq!(outcome.error.as_deref(), Some("HTTP 500"));
    }

    #[tokio::test]
    async fn test_unreachable_is_offline() {
        let port = closed_port().await;
        let checker = StatusChecker::new("127.0.0.1", Duration::from_secs(2)).unwrap();

        let outcome = checker.check(port).await;
        assert_eq!(outcome.status, ServiceStatus::Offline);
        assert!(outcome.error.is_some());
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let port = spawn_stub("200 OK", Duration::from_secs(5)).await;
        let checker = StatusChecker::new("127.0.0.1", Duration::from_millis(200)).unwrap();

        let outcome = checker.check(port).await;
        assert_eq!(outcome.status, ServiceStatus::Offline);
    }

    #[tokio::test]
    async fn test_probe_trait_matches_check() {
        let port = spawn_stub("202 Accepted", Duration::ZERO).await;
        let checker = StatusChecker::new("127.0.0.1", Duration::from_secs(2)).unwrap();

        let outcome = checker.probe(port).await;
        assert_eq!(outcome.status, ServiceStatus::Online);
    }
}
