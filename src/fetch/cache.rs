//! On-disk cache for fetched script bodies, grounded on
//! `install/cache.rs`'s `MetadataCache`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Default cache TTL: 1 hour.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Caches script bytes on disk, keyed by a hash of the source URL, so
/// repeated runs against one origin during development don't re-download
/// the same challenge script.
pub struct Cache {
    cache_dir: PathBuf,
    ttl: Duration,
}

impl Cache {
    pub fn new(cache_dir: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            ttl,
        }
    }

    pub fn with_default_ttl(cache_dir: impl Into<PathBuf>) -> Self {
        Self::new(cache_dir, DEFAULT_CACHE_TTL)
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{key}.cache"))
    }

    /// Reads cached content if it exists and is still fresh; `None`
    /// otherwise (cache miss or staleness, never an error).
    pub fn read(&self, key: &str) -> Option<String> {
        let path = self.entry_path(key);
        if !path.exists() {
            return None;
        }

        let metadata = fs::metadata(&path).ok()?;
        let modified = metadata.modified().ok()?;
        let age = SystemTime::now().duration_since(modified).ok()?;
        if age > self.ttl {
            return None;
        }

        fs::read_to_string(&path).ok()
    }

    pub fn write(&self, key: &str, content: &str) -> io::Result<()> {
        fs::create_dir_all(&self.cache_dir)?;
        fs::write(self.entry_path(key), content)
    }
}

/// Stable cache key for a URL: not cryptographic, just collision-resistant
/// enough to keep cache file names filesystem-safe.
pub fn cache_key(url: &str) -> String {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};
    let mut hasher = DefaultHasher::new();
    url.hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn write_then_read_round_trips() {
        let temp = tempdir().expect("failed to create temp dir");
        let cache = Cache::with_default_ttl(temp.path());
        cache.write("k", "script body").expect("write should succeed");
        assert_eq!(cache.read("k").as_deref(), Some("script body"));
    }

    #[test]
    fn read_returns_none_for_missing_entry() {
        let temp = tempdir().expect("failed to create temp dir");
        let cache = Cache::with_default_ttl(temp.path());
        assert!(cache.read("missing").is_none());
    }

    #[test]
    fn read_respects_ttl() {
        let temp = tempdir().expect("failed to create temp dir");
        let cache = Cache::new(temp.path(), Duration::from_secs(0));
        cache.write("k", "content").expect("write should succeed");
        std::thread::sleep(Duration::from_millis(10));
        assert!(cache.read("k").is_none());
    }

    #[test]
    fn cache_key_is_stable_for_the_same_url() {
        assert_eq!(cache_key("https://example.com/main.js"), cache_key("https://example.com/main.js"));
        assert_ne!(cache_key("https://example.com/a.js"), cache_key("https://example.com/b.js"));
    }
}
