use std::path::PathBuf;

use super::Resolve;
use crate::error::ResolveError;

pub const DEFAULT_PROC_ROOT: &str = "/proc";

/// Resolves by reading the `<root>/<pid>/fd/<fd>` symlink directly.
///
/// Needs the same privileges as the traced process; descriptors of
/// processes that already exited cannot be resolved.
#[derive(Debug, Clone)]
pub struct ProcfsResolver {
    root: PathBuf,
}

impl ProcfsResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Default for ProcfsResolver {
    fn default() -> Self {
        Self::new(DEFAULT_PROC_ROOT)
    }
}

impl Resolve for ProcfsResolver {
    fn resolve(&self, pid: &str, fd: &str) -> Result<String, ResolveError> {
        let link = self.root.join(pid).join("fd").join(fd);
        let target =
            std::fs::read_link(&link).map_err(|e| ResolveError::ReadLink { path: link, source: e })?;
        Ok(target.to_string_lossy().to_string())
    }
}
