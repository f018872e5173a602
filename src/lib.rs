/*!
 * treedump - Serialize directory structure and file contents for LLM context
 *
 * This library walks a directory tree depth-first and streams each
 * discovered entry through an incremental Markdown or JSON formatter,
 * so arbitrarily large trees are dumped in bounded memory.
 */

pub mod config;
pub mod content;
pub mod error;
pub mod language;
pub mod report;
pub mod scanner;
pub mod types;
pub mod utils;
pub mod writer;

#[cfg(test)]
mod tests;

// Re-export main components for easier access
pub use config::{Args, Config, FormatMode};
pub use error::{Result, TreeDumpError};
pub use report::{Reporter, ScanReport, ScanStats};
pub use scanner::{EntryIter, Scanner};
pub use types::{ContentPolicy, Entry, EntryKind};
pub use utils::{count_files, format_file_size};
pub use writer::StreamWriter;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
