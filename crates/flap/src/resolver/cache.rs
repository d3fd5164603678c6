use std::sync::Arc;

use moka::sync::Cache;
use tracing::{debug, warn};

use super::{fallback_path, Resolve};

/// Process-lifetime memo of `(pid, fd)` lookups shared by all workers.
///
/// Entries are never evicted or refreshed. A failed lookup stores the
/// `pid::fd` placeholder so the resolver is not asked again for that key.
/// Concurrent misses on the same key are coalesced into one lookup.
pub struct ResolverCache {
    resolver: Arc<dyn Resolve>,
    entries: Cache<(String, String), String>,
}

impl ResolverCache {
    pub fn new(resolver: Arc<dyn Resolve>) -> Self {
        Self {
            resolver,
            entries: Cache::builder().build(),
        }
    }

    pub fn resolve(&self, pid: &str, fd: &str) -> String {
        let key = (pid.to_string(), fd.to_string());
        self.entries
            .get_with(key, || match self.resolver.resolve(pid, fd) {
                Ok(path) => {
                    debug!(pid, fd, path = %path, "resolved descriptor");
                    path
                }
                Err(e) => {
                    warn!(pid, fd, error = %e, "resolution failed, using placeholder");
                    fallback_path(pid, fd)
                }
            })
    }

    /// Returns the stored value without consulting the resolver.
    pub fn get(&self, pid: &str, fd: &str) -> Option<String> {
        self.entries.get(&(pid.to_string(), fd.to_string()))
    }

    pub fn len(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for ResolverCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolverCache")
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}
