//! On-disk response cache
//!
//! This module provides a blob store that persists downloaded content to the
//! filesystem, keyed by a two-part locator. Freshness is judged from the
//! file's last-write time; stale entries are kept around (there is no
//! eviction) so they can back up a failed download.

mod store;

pub use store::{CacheStatus, CacheStore, Locator};
