/*!
 * Streaming Markdown and JSON writers
 */

use std::io::Write;

use crate::config::FormatMode;
use crate::error::Result;
use crate::language::fence_tag;
use crate::types::Entry;

/// Incremental entry serializer.
///
/// Entries are rendered to the sink in arrival order, one at a time.
/// The only ordering state is whether a JSON element has been written
/// yet, which drives comma placement; the sequence stays valid JSON for
/// empty, single-entry, and multi-entry runs alike.
pub struct StreamWriter<W: Write> {
    mode: FormatMode,
    sink: W,
    wrote_entry: bool,
}

impl<W: Write> StreamWriter<W> {
    /// Create a new stream writer over a sink
    pub fn new(mode: FormatMode, sink: W) -> Self {
        Self {
            mode,
            sink,
            wrote_entry: false,
        }
    }

    /// Open the output document.
    ///
    /// For JSON this emits the array opener before the first entry is
    /// known.
    pub fn begin(&mut self) -> Result<()> {
        if self.mode == FormatMode::Json {
            write!(self.sink, "[")?;
        }
        Ok(())
    }

    /// Render one entry to the sink.
    pub fn write_entry(&mut self, entry: &Entry) -> Result<()> {
        match self.mode {
            FormatMode::Markdown => self.write_markdown(entry)?,
            FormatMode::Json => self.write_json(entry)?,
        }
        self.wrote_entry = true;
        Ok(())
    }

    /// Close the output document, flush, and hand the sink back.
    pub fn finish(mut self) -> Result<W> {
        if self.mode == FormatMode::Json {
            writeln!(self.sink, "]")?;
        }
        self.sink.flush()?;
        Ok(self.sink)
    }

    fn write_markdown(&mut self, entry: &Entry) -> Result<()> {
        writeln!(self.sink)?;
        writeln!(self.sink, "### {}", entry.path)?;
        writeln!(self.sink, "@type: {}", entry.kind_str())?;
        writeln!(self.sink, "@size: {} bytes", entry.size)?;
        writeln!(self.sink, "@depth: {}", entry.depth)?;

        if let Some(error) = &entry.error {
            writeln!(self.sink, "⚠️ Error: {}", error)?;
        }

        if let Some(content) = entry.content.as_deref() {
            if !content.is_empty() {
                // Content containing a fence marker breaks the block; an
                // accepted rendering quirk, not escaped.
                match fence_tag(&entry.path) {
                    Some(tag) => writeln!(self.sink, "```{}", tag)?,
                    None => writeln!(self.sink, "```")?,
                }
                if content.ends_with('\n') {
                    write!(self.sink, "{}", content)?;
                } else {
                    writeln!(self.sink, "{}", content)?;
                }
                writeln!(self.sink, "```")?;
            }
        }

        writeln!(self.sink, "---")?;
        Ok(())
    }

    fn write_json(&mut self, entry: &Entry) -> Result<()> {
        if self.wrote_entry {
            write!(self.sink, ",")?;
        }
        serde_json::to_writer(&mut self.sink, entry)?;
        Ok(())
    }
}
