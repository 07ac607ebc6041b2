//! Request construction and cache locator derivation
//!
//! Turns a resolved query string into a normalized URL plus the `(namespace,
//! key)` locator that addresses its cache slot. The namespace covers the
//! origin (scheme, host, explicit port) and the key covers the path, both
//! URL-safe base64 encoded so they are valid, non-traversing path components.

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine as _;
use thiserror::Error;
use url::Url;

use crate::cache::Locator;

/// Runtime configuration for a single invocation
///
/// Assembled from config-file defaults and command-line flags, then possibly
/// adjusted once by template overrides. Immutable afterward.
#[derive(Debug, Clone)]
pub struct RequestParams {
    /// The resolved query string (literal URL or built from a template)
    pub query: String,
    /// User-agent header value; empty means the transport default
    pub user_agent: String,
    /// Freshness window for cache reads, in minutes
    pub max_age_minutes: u64,
    /// Whether the cache may satisfy the request
    pub cache_read: bool,
    /// Whether fetched content is written back to the cache
    pub cache_write: bool,
    /// Whether to emit the diagnostic provenance line
    pub verbose: bool,
}

/// Errors produced while normalizing a query into a request
#[derive(Debug, Error)]
pub enum RequestError {
    /// The query string is not a parseable URL
    #[error("invalid URL '{raw}': {source}")]
    InvalidUrl {
        raw: String,
        #[source]
        source: url::ParseError,
    },
}

/// A normalized request ready for cache lookup and download
#[derive(Debug, Clone)]
pub struct Request {
    url: Url,
    origin: String,
    path: String,
}

impl Request {
    /// Normalizes a query string into a request.
    ///
    /// A query without a scheme (`wttr.in/tokyo`) defaults to `https`.
    ///
    /// # Errors
    /// Returns [`RequestError::InvalidUrl`] if the query cannot be parsed as
    /// an HTTP(S) URL even after prepending the default scheme.
    pub fn new(query: &str) -> Result<Self, RequestError> {
        let url = match Url::parse(query) {
            // "localhost:8080/x" parses as scheme "localhost"; treat anything
            // without an http(s) host as schemeless and retry
            Ok(url) if url.host().is_some() && matches!(url.scheme(), "http" | "https") => url,
            _ => Url::parse(&format!("https://{query}")).map_err(|source| {
                RequestError::InvalidUrl {
                    raw: query.to_string(),
                    source,
                }
            })?,
        };

        let mut origin = format!("{}://{}", url.scheme(), url.host_str().unwrap_or_default());
        if let Some(port) = url.port() {
            origin.push(':');
            origin.push_str(&port.to_string());
        }
        let path = url.path().to_string();

        Ok(Self { url, origin, path })
    }

    /// The full normalized URL to download
    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// The cache slot for this request
    ///
    /// Derived from origin and path only; the query string does not
    /// participate, matching the slot granularity of the cache layout.
    pub fn locator(&self) -> Locator {
        Locator::new(
            URL_SAFE.encode(self.origin.as_bytes()),
            URL_SAFE.encode(self.path.as_bytes()),
        )
    }
}
