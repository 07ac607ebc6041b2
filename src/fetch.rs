//! Download collaborator
//!
//! The retrieval orchestrator only needs a `download(url, user_agent)`
//! capability, expressed here as the [`Fetcher`] trait so tests can stand in
//! a scripted implementation. [`HttpFetcher`] is the real one, backed by
//! reqwest. Downloads carry no built-in timeout; a caller needing bounded
//! latency wraps the collaborator with an external deadline.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::{Client, StatusCode};
use thiserror::Error;

/// Errors produced while downloading content
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never produced a response (DNS, connect, I/O)
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("server returned {status} for {url}")]
    Status { status: StatusCode, url: String },
}

/// Something that can download the content behind a URL
#[async_trait]
pub trait Fetcher {
    /// Downloads the content at `url`.
    ///
    /// An empty `user_agent` means the transport default (no header is sent).
    async fn download(&self, url: &str, user_agent: &str) -> Result<Vec<u8>, FetchError>;
}

/// HTTP implementation of [`Fetcher`]
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpFetcher {
    /// Creates an HttpFetcher with a default client
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Creates an HttpFetcher with a custom HTTP client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn download(&self, url: &str, user_agent: &str) -> Result<Vec<u8>, FetchError> {
        let mut request = self.client.get(url).header(ACCEPT, "text/plain");
        if !user_agent.is_empty() {
            request = request.header(USER_AGENT, user_agent);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                url: url.to_string(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}
