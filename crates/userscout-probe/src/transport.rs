//! HTTP transport seam used by the probe engine.
//!
//! The engine only needs "GET this URL, give me the status and maybe the
//! body". Keeping that behind [`HttpTransport`] lets tests script responses
//! without touching the network.

use crate::error::{ProbeError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::trace;

/// Response observed for one probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body, present only when it was asked for
    pub body: Option<String>,
}

/// Failure of a single probe request.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// Request did not complete in time
    #[error("request timed out")]
    Timeout,

    /// Connection could not be established (DNS, refused, TLS)
    #[error("connection failed: {0}")]
    Connect(String),

    /// Redirect policy was violated
    #[error("redirect error: {0}")]
    Redirect(String),

    /// Response body could not be read
    #[error("failed to read response body: {0}")]
    Body(String),

    /// Response body could not be decoded
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// Request failed while being sent
    #[error("request failed: {0}")]
    Request(String),

    /// Profile URL could not be parsed
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// Anything else
    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// Short stable tag used as the diagnostic note on a failed probe.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Connect(_) => "connect",
            Self::Redirect(_) => "redirect",
            Self::Body(_) => "body",
            Self::Decode(_) => "decode",
            Self::Request(_) => "request",
            Self::InvalidUrl(_) => "invalid_url",
            Self::Other(_) => "error",
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let message = err.to_string();
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_builder() {
            Self::InvalidUrl(message)
        } else if err.is_connect() {
            Self::Connect(message)
        } else if err.is_redirect() {
            Self::Redirect(message)
        } else if err.is_body() {
            Self::Body(message)
        } else if err.is_decode() {
            Self::Decode(message)
        } else if err.is_request() {
            Self::Request(message)
        } else {
            Self::Other(message)
        }
    }
}

/// Minimal HTTP client interface the engine probes through.
///
/// Implementations are shared across every concurrent probe of an engine and
/// must be thread-safe.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Issue a GET request.
    ///
    /// When `read_body` is false the body must not be downloaded and
    /// [`TransportResponse::body`] is `None`.
    async fn get(
        &self,
        url: &str,
        read_body: bool,
    ) -> std::result::Result<TransportResponse, TransportError>;
}

/// Default transport backed by a pooled [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a transport with a fixed user agent and a request timeout.
    ///
    /// The timeout is a backstop; the engine enforces its own deadline.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| ProbeError::Transport(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(
        &self,
        url: &str,
        read_body: bool,
    ) -> std::result::Result<TransportResponse, TransportError> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        trace!(url, status, read_body, "received response headers");

        let body = if read_body {
            Some(response.text().await?)
        } else {
            None
        };

        Ok(TransportResponse { status, body })
    }
}
