/*!
 * Core types and data structures for treedump
 */

use serde::{Serialize, Serializer};

/// Kind of a filesystem entry, derived from metadata at visit time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum EntryKind {
    /// Regular file
    File,
    /// Directory
    Dir,
    /// Symbolic link
    Symlink,
}

/// How much file text to capture per entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentPolicy {
    /// Structure only, no content is read
    None,
    /// At most the first N lines
    Preview(usize),
    /// The entire file text
    Full,
}

/// One discovered filesystem node.
///
/// Paths are relative to the scan root and normalized to forward-slash
/// segments. An entry is created when the walker visits the node and is
/// immutable afterward.
#[derive(Debug, Clone, Serialize)]
pub struct Entry {
    /// Root-relative path
    #[serde(rename = "Path")]
    pub path: String,

    /// Entry kind; `None` when the node could not be resolved
    #[serde(rename = "Kind", serialize_with = "serialize_kind")]
    pub kind: Option<EntryKind>,

    /// Size in bytes (0 for directories)
    #[serde(rename = "Size")]
    pub size: u64,

    /// Path segments between the scan root and this entry
    #[serde(rename = "Depth")]
    pub depth: usize,

    /// Text content, when requested and the file is readable text
    #[serde(rename = "Content", skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Ignore-pattern flag carried on the wire; pruned entries are never
    /// emitted, so emitted entries always report false
    #[serde(rename = "Ignored")]
    pub ignored: bool,

    /// Per-node diagnostic; an entry with an error never carries content
    #[serde(rename = "Error", skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Entry {
    /// Create an entry for a resolved node.
    pub fn new(path: String, kind: EntryKind, size: u64, depth: usize) -> Self {
        Self {
            path,
            kind: Some(kind),
            size,
            depth,
            content: None,
            ignored: false,
            error: None,
        }
    }

    /// Create an error entry for a node that could not be resolved.
    pub fn from_error(path: String, depth: usize, message: String) -> Self {
        Self {
            path,
            kind: None,
            size: 0,
            depth,
            content: None,
            ignored: false,
            error: Some(message),
        }
    }

    /// String form of the kind; empty for unresolved entries.
    pub fn kind_str(&self) -> String {
        self.kind.map(|k| k.to_string()).unwrap_or_default()
    }
}

fn serialize_kind<S: Serializer>(kind: &Option<EntryKind>, s: S) -> Result<S::Ok, S::Error> {
    match kind {
        Some(k) => s.collect_str(k),
        None => s.serialize_str(""),
    }
}
