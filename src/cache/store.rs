//! Filesystem-backed blob store with age-based freshness
//!
//! Entries live at `<root>/<namespace>/<key>` as raw content bytes. The
//! last-write time of the file decides freshness; nothing is ever deleted,
//! so the store grows without bound and staleness only changes read
//! preference. Writes go through `fs::write`, a single replacing write;
//! cross-process atomicity is best-effort only and a concurrent writer can
//! overwrite an entry mid-read by another process (last-writer-wins).

use chrono::{DateTime, Utc};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::SystemTime;

/// Two-part address of a cache slot
///
/// Both components must be single, non-traversing path components; the
/// request layer guarantees this by base64-encoding them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    namespace: String,
    key: String,
}

impl Locator {
    /// Creates a locator from its namespace and key components
    pub fn new(namespace: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            key: key.into(),
        }
    }

    /// The grouping component (one directory per namespace)
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The entry component (one file per key)
    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Result of a cache existence/freshness probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStatus {
    /// Whether a blob is present for the locator
    pub exists: bool,
    /// Whether the blob's age is within the freshness window
    pub fresh: bool,
}

impl CacheStatus {
    /// Status reported for an absent (or unreadable) entry
    pub const MISS: CacheStatus = CacheStatus {
        exists: false,
        fresh: false,
    };
}

/// Manages reading and writing cached response blobs on disk
#[derive(Debug, Clone)]
pub struct CacheStore {
    /// Directory under which all cache entries are stored
    root: PathBuf,
}

impl CacheStore {
    /// Creates a CacheStore rooted at the given directory
    ///
    /// The application resolves the directory once at startup (see
    /// `AppContext`) and passes it in; tests point this at a temp dir.
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Returns the file path backing a locator
    fn entry_path(&self, locator: &Locator) -> PathBuf {
        self.root.join(locator.namespace()).join(locator.key())
    }

    /// Probes existence and freshness of a cache entry
    ///
    /// Never fails: any stat error is reported as a plain miss. Freshness is
    /// inclusive at the boundary; an entry exactly `max_age_minutes` old is
    /// still fresh.
    pub fn check(&self, locator: &Locator, max_age_minutes: u64) -> CacheStatus {
        let modified = match fs::metadata(self.entry_path(locator)).and_then(|m| m.modified()) {
            Ok(modified) => modified,
            Err(_) => return CacheStatus::MISS,
        };

        CacheStatus {
            exists: true,
            fresh: age_within(modified, Utc::now(), max_age_minutes),
        }
    }

    /// Reads the blob stored for a locator
    ///
    /// # Errors
    /// Surfaces the underlying I/O error, including `NotFound` for an absent
    /// entry.
    pub fn read(&self, locator: &Locator) -> io::Result<Vec<u8>> {
        fs::read(self.entry_path(locator))
    }

    /// Persists a blob for a locator, replacing any previous version
    ///
    /// Creates the namespace directory if it does not exist yet.
    ///
    /// # Errors
    /// Surfaces the underlying I/O error from directory creation or the
    /// write itself.
    pub fn write(&self, locator: &Locator, content: &[u8]) -> io::Result<()> {
        fs::create_dir_all(self.root.join(locator.namespace()))?;
        fs::write(self.entry_path(locator), content)
    }
}

/// Whether `modified` is at most `max_age_minutes` old at `now`, inclusive
///
/// Ages are truncated to whole minutes, so an entry becomes stale one full
/// minute past the window.
fn age_within(modified: SystemTime, now: DateTime<Utc>, max_age_minutes: u64) -> bool {
    let modified: DateTime<Utc> = modified.into();
    let age = now.signed_duration_since(modified);
    age.num_minutes() <= max_age_minutes as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::TempDir;

    fn create_test_store() -> (CacheStore, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = CacheStore::new(temp_dir.path().to_path_buf());
        (store, temp_dir)
    }

    fn locator() -> Locator {
        Locator::new("aG9zdA==", "cGF0aA==")
    }

    #[test]
    fn test_check_reports_miss_for_absent_entry() {
        let (store, _temp_dir) = create_test_store();

        let status = store.check(&locator(), 60);

        assert_eq!(status, CacheStatus::MISS);
    }

    #[test]
    fn test_write_then_check_reports_fresh_entry() {
        let (store, _temp_dir) = create_test_store();

        store.write(&locator(), b"content").expect("Write should succeed");
        let status = store.check(&locator(), 60);

        assert!(status.exists, "Entry should exist after write");
        assert!(status.fresh, "Just-written entry should be fresh");
    }

    #[test]
    fn test_write_creates_namespace_directory() {
        let (store, temp_dir) = create_test_store();

        store.write(&locator(), b"content").expect("Write should succeed");

        assert!(temp_dir.path().join("aG9zdA==").is_dir());
        assert!(temp_dir.path().join("aG9zdA==").join("cGF0aA==").is_file());
    }

    #[test]
    fn test_read_returns_written_content() {
        let (store, _temp_dir) = create_test_store();

        store.write(&locator(), b"hello cache").expect("Write should succeed");
        let content = store.read(&locator()).expect("Read should succeed");

        assert_eq!(content, b"hello cache");
    }

    #[test]
    fn test_read_missing_entry_is_not_found() {
        let (store, _temp_dir) = create_test_store();

        let err = store.read(&locator()).expect_err("Read should fail");

        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_write_overwrites_previous_content() {
        let (store, _temp_dir) = create_test_store();

        store.write(&locator(), b"first").expect("First write should succeed");
        store.write(&locator(), b"second").expect("Second write should succeed");

        let content = store.read(&locator()).expect("Read should succeed");
        assert_eq!(content, b"second", "Cache should contain latest content");
    }

    #[test]
    fn test_zero_max_age_keeps_just_written_entry_fresh() {
        let (store, _temp_dir) = create_test_store();

        store.write(&locator(), b"content").expect("Write should succeed");
        let status = store.check(&locator(), 0);

        // age truncates to 0 whole minutes, which is within an inclusive
        // 0-minute window
        assert!(status.exists);
        assert!(status.fresh);
    }

    #[test]
    fn test_age_within_is_inclusive_at_the_boundary() {
        let now = Utc::now();
        let modified: SystemTime = (now - Duration::minutes(30)).into();

        assert!(age_within(modified, now, 30), "Exactly max-age old is fresh");
    }

    #[test]
    fn test_age_within_rejects_one_minute_past_the_boundary() {
        let now = Utc::now();
        let modified: SystemTime = (now - Duration::minutes(31)).into();

        assert!(!age_within(modified, now, 30), "One minute past max-age is stale");
    }

    #[test]
    fn test_age_within_accepts_partial_minute_past_the_boundary() {
        let now = Utc::now();
        let modified: SystemTime = (now - Duration::minutes(30) - Duration::seconds(30)).into();

        // ages truncate to whole minutes, so 30.5 minutes still counts as 30
        assert!(age_within(modified, now, 30));
    }
}
