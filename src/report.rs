/*!
 * Reporting functionality for treedump
 *
 * Provides formatted post-run reports of scan results using the tabled
 * library for clean, consistent table rendering.
 */

use std::time::Duration;

use chrono::Local;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::types::{Entry, EntryKind};
use crate::utils::format_file_size;

/// Running statistics accumulated while entries stream through the
/// pipeline. Recording happens entry-by-entry in the drive loop; the
/// report never buffers entries.
#[derive(Debug, Clone, Default)]
pub struct ScanStats {
    /// Number of file entries
    pub files: usize,
    /// Number of directory entries
    pub dirs: usize,
    /// Number of symlink entries
    pub symlinks: usize,
    /// Entries whose kind could not be resolved
    pub unresolved: usize,
    /// Entries carrying a per-node error
    pub errors: usize,
    /// Total bytes across file entries
    pub total_bytes: u64,
    /// Characters of content captured
    pub content_chars: usize,
    /// Per-file sizes, for the largest-files table
    pub file_sizes: Vec<(String, u64)>,
}

impl ScanStats {
    /// Record one entry as it passes through the drive loop.
    pub fn record(&mut self, entry: &Entry) {
        match entry.kind {
            Some(EntryKind::File) => {
                self.files += 1;
                self.total_bytes += entry.size;
                self.file_sizes.push((entry.path.clone(), entry.size));
            }
            Some(EntryKind::Dir) => self.dirs += 1,
            Some(EntryKind::Symlink) => self.symlinks += 1,
            None => self.unresolved += 1,
        }
        if entry.error.is_some() {
            self.errors += 1;
        }
        if let Some(content) = &entry.content {
            self.content_chars += content.chars().count();
        }
    }

    /// Total entries emitted
    pub fn entries(&self) -> usize {
        self.files + self.dirs + self.symlinks + self.unresolved
    }
}

/// Summary of a finished dump
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// Output destination
    pub output_file: String,
    /// Time taken to scan and write
    pub duration: Duration,
    /// Accumulated statistics
    pub stats: ScanStats,
}

/// Format of the report output
pub enum ReportFormat {
    /// Console table output
    ConsoleTable,
    // Other formats could be added in the future
}

/// Report generator for scan results
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Format a number with human-readable units
    fn format_number(&self, num: usize) -> String {
        if num >= 1_000_000 {
            format!("{:.1}M", num as f64 / 1_000_000.0)
        } else if num >= 1_000 {
            format!("{:.1}K", num as f64 / 1_000.0)
        } else {
            num.to_string()
        }
    }

    /// Generate a report string based on scan statistics
    pub fn generate_report(&self, report: &ScanReport) -> String {
        match self.format {
            ReportFormat::ConsoleTable => self.generate_console_report(report),
        }
    }

    /// Print the report to stderr, keeping stdout clean for dumps
    pub fn print_report(&self, report: &ScanReport) {
        eprintln!("\n{}", self.generate_report(report));
    }

    // Truncate a path for table display, keeping the tail segments
    fn format_path(&self, path: &str, max_len: usize) -> String {
        if path.len() <= max_len {
            return path.to_string();
        }
        format!("...{}", &path[path.len().saturating_sub(max_len - 3)..])
    }

    // Create a summary table using the tabled crate
    fn create_summary_table(&self, report: &ScanReport) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: String,

            #[tabled(rename = "Value")]
            value: String,
        }

        let stats = &report.stats;
        let estimated_tokens = stats.content_chars / 4;

        let rows = vec![
            SummaryRow {
                key: "📂 Output".to_string(),
                value: report.output_file.clone(),
            },
            SummaryRow {
                key: "⏱️ Process Time".to_string(),
                value: format!("{:.4?}", report.duration),
            },
            SummaryRow {
                key: "🗂️ Entries".to_string(),
                value: self.format_number(stats.entries()),
            },
            SummaryRow {
                key: "📄 Files".to_string(),
                value: self.format_number(stats.files),
            },
            SummaryRow {
                key: "📁 Directories".to_string(),
                value: self.format_number(stats.dirs),
            },
            SummaryRow {
                key: "🔗 Symlinks".to_string(),
                value: self.format_number(stats.symlinks),
            },
            SummaryRow {
                key: "⚠️ Errors".to_string(),
                value: self.format_number(stats.errors),
            },
            SummaryRow {
                key: "💾 Total Size".to_string(),
                value: format_file_size(stats.total_bytes),
            },
            SummaryRow {
                key: "📦 LLM Tokens".to_string(),
                value: format!("{} tokens (estimated)", self.format_number(estimated_tokens)),
            },
            SummaryRow {
                key: "🏁 Completed".to_string(),
                value: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            },
        ];

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    // Create a largest-files table using the tabled crate
    fn create_files_table(&self, report: &ScanReport) -> String {
        #[derive(Tabled)]
        struct FileRow {
            #[tabled(rename = "File Path")]
            path: String,

            #[tabled(rename = "Size")]
            size: String,
        }

        let mut files = report.stats.file_sizes.clone();
        files.sort_by(|(_, a), (_, b)| b.cmp(a));

        let files_to_show = if files.len() > 15 {
            &files[0..10]
        } else {
            &files[..]
        };

        let rows: Vec<FileRow> = files_to_show
            .iter()
            .map(|(path, size)| FileRow {
                path: self.format_path(path, 60),
                size: format_file_size(*size),
            })
            .collect();

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    // Generate a console table report
    fn generate_console_report(&self, report: &ScanReport) -> String {
        let summary_table = self.create_summary_table(report);

        let summary_title = "✅  DUMP COMPLETE";

        if report.stats.files == 0 {
            return format!("{}\n{}", summary_title, summary_table);
        }

        let files_table = self.create_files_table(report);
        let files_title = if report.stats.file_sizes.len() > 15 {
            "📋  TOP 10 LARGEST FILES"
        } else {
            "📋  PROCESSED FILES"
        };

        format!(
            "{}\n{}\n\n{}\n{}",
            files_title, files_table, summary_title, summary_table
        )
    }
}
