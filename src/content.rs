/*!
 * File content reading with binary detection
 */

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

use crate::types::ContentPolicy;

/// Bytes sniffed from the start of a file to classify it as text or binary.
pub const SNIFF_CHUNK_SIZE: usize = 8192;

/// Read the text content of a file under the given policy.
///
/// A NUL byte in the first [`SNIFF_CHUNK_SIZE`] bytes classifies the file
/// as binary and yields `Ok(None)` without an error. The sniff is a
/// heuristic; exotic encodings can be misclassified either way.
///
/// On accept the file is re-read from the start and decoded lossily.
/// `Preview(n)` returns at most the first `n` newline-delimited lines
/// joined with `\n`; `Full` returns the entire text. Open or read
/// failures are returned as errors for the caller to attach to the
/// entry.
pub fn read_content(path: &Path, policy: ContentPolicy) -> io::Result<Option<String>> {
    let limit = match policy {
        ContentPolicy::None => return Ok(None),
        ContentPolicy::Preview(n) => Some(n),
        ContentPolicy::Full => None,
    };

    let mut file = File::open(path)?;

    let mut sniff = vec![0u8; SNIFF_CHUNK_SIZE];
    let read = file.read(&mut sniff)?;
    if sniff[..read].contains(&0) {
        return Ok(None);
    }

    file.seek(SeekFrom::Start(0))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    let text = String::from_utf8_lossy(&bytes);

    Ok(Some(match limit {
        Some(n) => text.lines().take(n).collect::<Vec<_>>().join("\n"),
        None => text.into_owned(),
    }))
}
