pub mod parser;

pub use parser::{render, replacement_name, Tag};

use std::sync::Arc;

use crate::resolver::ResolverCache;

/// Applies the tag transform to single lines, resolving references through
/// the shared cache.
#[derive(Debug, Clone)]
pub struct Annotator {
    cache: Arc<ResolverCache>,
}

impl Annotator {
    pub fn new(cache: Arc<ResolverCache>) -> Self {
        Self { cache }
    }

    /// Returns the line to emit, or `None` when the line is dropped.
    pub fn annotate(&self, line: &[u8]) -> Option<Vec<u8>> {
        match Tag::parse(line) {
            Tag::Malformed => None,
            Tag::Plain | Tag::Opaque { .. } | Tag::UnparsedBody { .. } => Some(line.to_vec()),
            Tag::Reference {
                name,
                pid,
                fd,
                payload,
            } => {
                let path = self.cache.resolve(pid, fd);
                Some(render(name, &path, payload))
            }
        }
    }
}
