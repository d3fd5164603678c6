//! Recognizer for the `@name[...]` tag syntax emitted by the tracing scripts.
//!
//! A tag line looks like `@un_read[1234, 5]: 42 bytes`. Only tags whose name
//! starts with `un` carry a `(pid, fd)` reference that needs resolving; every
//! other tag is passed through as-is.
//!
//! Lines are matched as raw bytes. Names, pids and fds are ASCII by
//! construction of the patterns; the payload may hold any bytes.

use std::sync::LazyLock;

use regex::bytes::{Match, Regex};

/// First byte of every tag line.
pub const TAG_SENTINEL: u8 = b'@';

/// Names with this prefix carry an unresolved `(pid, fd)` reference.
pub const UNRESOLVED_PREFIX: &str = "un";

/// Stripped from the name once the reference has been resolved.
pub const RENAME_PREFIX: &str = "un_";

static RE_TAG_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@([a-zA-Z0-9_]+)\[").unwrap());
static RE_TAG_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^@([a-zA-Z0-9_]+)\[([0-9]+),[\t\n\f\r ]*([0-9]+)\]:[\t\n\f\r ]*((?-u:.)*)$").unwrap()
});

/// Classification of a single output line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tag<'a> {
    /// Not a tag line at all.
    Plain,
    /// Starts with `@` but has no `name[` after it. These lines are dropped.
    Malformed,
    /// A well-formed tag that needs no resolution.
    Opaque { name: &'a str },
    /// An `un*` tag whose body is not `[pid, fd]: payload`.
    UnparsedBody { name: &'a str },
    /// An `un*` tag carrying a reference to resolve.
    Reference {
        name: &'a str,
        pid: &'a str,
        fd: &'a str,
        payload: &'a [u8],
    },
}

impl<'a> Tag<'a> {
    pub fn parse(line: &'a [u8]) -> Self {
        if line.first() != Some(&TAG_SENTINEL) {
            return Tag::Plain;
        }

        let Some(name) = RE_TAG_PREFIX
            .captures(line)
            .and_then(|caps| ascii(caps.get(1)))
        else {
            return Tag::Malformed;
        };

        if !name.starts_with(UNRESOLVED_PREFIX) {
            return Tag::Opaque { name };
        }

        RE_TAG_REFERENCE
            .captures(line)
            .and_then(|caps| {
                Some(Tag::Reference {
                    name,
                    pid: ascii(caps.get(2))?,
                    fd: ascii(caps.get(3))?,
                    payload: caps.get(4).map_or(&[][..], |m| m.as_bytes()),
                })
            })
            .unwrap_or(Tag::UnparsedBody { name })
    }
}

fn ascii<'h>(m: Option<Match<'h>>) -> Option<&'h str> {
    m.and_then(|m| std::str::from_utf8(m.as_bytes()).ok())
}

/// Name used in the rewritten tag.
///
/// Only the exact `un_` prefix is removed: `ungrouped` enters the resolving
/// branch but keeps its name.
pub fn replacement_name(name: &str) -> &str {
    name.strip_prefix(RENAME_PREFIX).unwrap_or(name)
}

/// Formats the rewritten tag line `@name[path]: payload`.
pub fn render(name: &str, path: &str, payload: &[u8]) -> Vec<u8> {
    let name = replacement_name(name);
    let mut line = Vec::with_capacity(name.len() + path.len() + payload.len() + 5);
    line.push(TAG_SENTINEL);
    line.extend_from_slice(name.as_bytes());
    line.push(b'[');
    line.extend_from_slice(path.as_bytes());
    line.extend_from_slice(b"]: ");
    line.extend_from_slice(payload);
    line
}
