//! Retrieval orchestration
//!
//! Sequences the cache check, the network fetch and the stale-cache fallback
//! into one policy: prefer fresh cached content, otherwise download, and on
//! a failed download fall back to whatever cache entry exists, however
//! stale. A forced refresh (cache reads disabled) never touches the cache on
//! the way in, so a failed download then has no fallback. Content is never
//! fabricated: when both sources are unavailable the error propagates.

use std::fmt;
use std::io;

use thiserror::Error;
use tracing::{debug, warn};

use crate::cache::{CacheStatus, CacheStore};
use crate::fetch::{FetchError, Fetcher};
use crate::request::{Request, RequestParams};

/// Where returned content came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// A fresh cache entry satisfied the request
    Cached,
    /// The content was downloaded
    Received,
    /// The download failed and a stale cache entry stood in
    CacheBackup,
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Provenance::Cached => "cached",
            Provenance::Received => "received",
            Provenance::CacheBackup => "cache-backup",
        };
        f.write_str(label)
    }
}

/// Content plus the provenance tag describing its origin
#[derive(Debug, Clone)]
pub struct Outcome {
    pub content: Vec<u8>,
    pub provenance: Provenance,
}

/// Errors that leave the orchestrator without content
#[derive(Debug, Error)]
pub enum RetrieveError {
    /// The store claimed an entry exists but could not deliver it
    #[error("failed to read cached content: {0}")]
    CacheRead(#[source] io::Error),

    /// The download failed and no cache entry was available to fall back on
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Retrieves the content for `request` according to `params`.
///
/// Cache write failures after a successful download are logged and do not
/// change the reported outcome or provenance.
///
/// # Errors
/// - [`RetrieveError::CacheRead`] when a cache entry known to exist cannot
///   be read (fatal in both the fresh-hit and the fallback path),
/// - [`RetrieveError::Fetch`] when the download fails and no entry exists.
pub async fn retrieve(
    cache: &CacheStore,
    fetcher: &dyn Fetcher,
    request: &Request,
    params: &RequestParams,
) -> Result<Outcome, RetrieveError> {
    let locator = request.locator();

    let status = if params.cache_read {
        cache.check(&locator, params.max_age_minutes)
    } else {
        CacheStatus::MISS
    };

    if status.exists && status.fresh {
        debug!("serving {} from cache", request.url());
        let content = cache.read(&locator).map_err(RetrieveError::CacheRead)?;
        return Ok(Outcome {
            content,
            provenance: Provenance::Cached,
        });
    }

    match fetcher.download(request.url(), &params.user_agent).await {
        Ok(content) => {
            if params.cache_write {
                if let Err(err) = cache.write(&locator, &content) {
                    warn!("unable to write {} to cache: {err}", request.url());
                }
            }
            Ok(Outcome {
                content,
                provenance: Provenance::Received,
            })
        }
        Err(err) if status.exists => {
            warn!("using old cache for {} due to server failure: {err}", request.url());
            let content = cache.read(&locator).map_err(RetrieveError::CacheRead)?;
            Ok(Outcome {
                content,
                provenance: Provenance::CacheBackup,
            })
        }
        Err(err) => Err(err.into()),
    }
}
