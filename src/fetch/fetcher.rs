//! HTTP fetcher implementation
//!
//! One call to `fetch_once` is one GET request. The fetcher never lets a transport
//! error escape as anything but a `FetchFailure` value.

use crate::target::RequestTarget;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;

/// Substring of the Content-Type header that marks a response as binary
const BINARY_CONTENT_MARKER: &str = "image";

/// Body of a successful response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Textual response, decoded using the declared charset
    Text(String),
    /// Binary response (declared content type contains "image"), raw bytes
    Binary(Vec<u8>),
}

impl Payload {
    pub fn is_binary(&self) -> bool {
        matches!(self, Self::Binary(_))
    }
}

/// Why a single fetch attempt failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchFailure {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("server responded with HTTP {0}")]
    Status(u16),

    #[error("failed to read response body: {0}")]
    Body(String),

    #[error("transport error: {0}")]
    Transport(String),
}

impl FetchFailure {
    fn from_reqwest(e: &reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_connect() {
            Self::Connect(e.to_string())
        } else if e.is_body() || e.is_decode() {
            Self::Body(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

/// A source of documents, one request per call
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Issues exactly one request for `target`
    async fn fetch_once(&self, target: &RequestTarget) -> Result<Payload, FetchFailure>;
}

#[async_trait]
impl<F: Fetcher + ?Sized> Fetcher for std::sync::Arc<F> {
    async fn fetch_once(&self, target: &RequestTarget) -> Result<Payload, FetchFailure> {
        (**self).fetch_once(target).await
    }
}

/// Builds the HTTP client used for document fetches
///
/// # Arguments
///
/// * `connect_timeout` - Upper bound on establishing a connection
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(connect_timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .connect_timeout(connect_timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetcher backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_once(&self, target: &RequestTarget) -> Result<Payload, FetchFailure> {
        tracing::debug!("GET {} ({})", target, target.scheme().as_str());

        let response = match self.client.get(target.url().clone()).send().await {
            Ok(response) => response,
            Err(e) => {
                let failure = FetchFailure::from_reqwest(&e);
                tracing::warn!("Request to {} failed: {}", target, failure);
                return Err(failure);
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Request to {} returned {}", target, status);
            return Err(status.into());
        }

        let is_binary = is_binary_content_type(
            response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or(""),
        );

        let payload = if is_binary {
            response
                .bytes()
                .await
                .map(|bytes| Payload::Binary(bytes.to_vec()))
        } else {
            response.text().await.map(Payload::Text)
        };

        payload.map_err(|e| {
            let failure = FetchFailure::from_reqwest(&e);
            tracing::warn!("Reading body of {} failed: {}", target, failure);
            failure
        })
    }
}

/// Returns true when a Content-Type header marks the body as binary
///
/// This is a plain case-sensitive substring test, not a MIME parse.
pub(crate) fn is_binary_content_type(content_type: &str) -> bool {
    content_type.contains(BINARY_CONTENT_MARKER)
}

impl From<StatusCode> for FetchFailure {
    fn from(status: StatusCode) -> Self {
        Self::Status(status.as_u16())
    }
}
