//! Lookup of `(pid, fd)` pairs into the path the descriptor points at.

pub mod cache;
pub mod command;
pub mod procfs;

pub use cache::ResolverCache;
pub use command::CommandResolver;
pub use procfs::ProcfsResolver;

use crate::error::ResolveError;

/// A capability that maps a process id and file descriptor to a path.
///
/// Implementations are expected to be deterministic for a given key; the
/// cache in front of them never revalidates.
pub trait Resolve: Send + Sync {
    fn resolve(&self, pid: &str, fd: &str) -> Result<String, ResolveError>;
}

impl<F> Resolve for F
where
    F: Fn(&str, &str) -> Result<String, ResolveError> + Send + Sync,
{
    fn resolve(&self, pid: &str, fd: &str) -> Result<String, ResolveError> {
        self(pid, fd)
    }
}

/// Placeholder stored when a lookup fails.
pub fn fallback_path(pid: &str, fd: &str) -> String {
    format!("{}::{}", pid, fd)
}
