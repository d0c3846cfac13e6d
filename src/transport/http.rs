use async_trait::async_trait;
use std::time::Duration;

use super::Transport;
use crate::consts::DEFAULT_TIMEOUT_SECS;
use crate::error::Result;

/// Options for [`HttpTransport`].
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub timeout: Duration,
    /// Skip TLS peer verification. Off unless explicitly requested.
    pub danger_accept_invalid_certs: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            danger_accept_invalid_certs: false,
        }
    }
}

/// HTTPS transport on top of `reqwest`.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: HttpConfig) -> Result<Self> {
        if config.danger_accept_invalid_certs {
            tracing::warn!("TLS certificate verification is disabled");
        }
        let client = reqwest::Client::builder()
            .user_agent(concat!("corezoid-rs/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.danger_accept_invalid_certs)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, url: &str, body: &str) -> Result<String> {
        let resp = self
            .client
            .post(url)
            .header("content-type", "application/json")
            .body(body.to_string())
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            // The body is still handed back; interpreting it is the caller's call.
            tracing::warn!(%status, "platform returned non-success status");
        }
        Ok(resp.text().await?)
    }
}
