/*!
 * Configuration handling for treedump
 */

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use clap_complete::Shell;

use crate::ensure;
use crate::error::Result;
use crate::types::ContentPolicy;

/// Output wire format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum FormatMode {
    /// Line-oriented, human-readable Markdown
    Markdown,
    /// A single JSON array
    Json,
}

/// Command-line arguments for treedump
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "treedump",
    version = env!("CARGO_PKG_VERSION"),
    about = "Serialize directory structure and file contents for LLM context",
    long_about = "Recursively walks a directory, reading both structure and file contents, and streams AI-friendly Markdown or JSON output to the console or a file."
)]
pub struct Args {
    /// Target directory to process
    #[clap(default_value = ".")]
    pub directory_path: String,

    /// Limit recursion depth (negative means unlimited)
    #[clap(long, default_value = "-1", allow_hyphen_values = true)]
    pub max_depth: i32,

    /// Maximum bytes of a file to include as content
    #[clap(long, default_value = "64000")]
    pub max_size: u64,

    /// Output format
    #[clap(long = "format", value_enum, default_value_t = FormatMode::Markdown)]
    pub format: FormatMode,

    /// Comma-separated list of substring patterns to ignore
    #[clap(long = "ignore", value_delimiter = ',', default_value = ".git,node_modules")]
    pub ignore_patterns: Vec<String>,

    /// Structure only, no content
    #[clap(long)]
    pub summary: bool,

    /// Number of lines to preview per file in Markdown output
    #[clap(long, default_value = "10")]
    pub lines: usize,

    /// Write output to a file instead of stdout
    #[clap(long)]
    pub output: Option<String>,

    /// Respect .gitignore files
    #[clap(long)]
    pub respect_gitignore: bool,

    /// Path to custom .gitignore file
    #[clap(long)]
    pub gitignore_path: Option<String>,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Target directory to process
    pub target_dir: PathBuf,

    /// Output file path; `None` streams to stdout
    pub output_file: Option<PathBuf>,

    /// Output wire format
    pub format: FormatMode,

    /// Recursion depth limit, negative means unlimited
    pub max_depth: i32,

    /// Content-size cutoff in bytes; larger files keep their entry but
    /// carry no content
    pub max_size: u64,

    /// Substring patterns to prune from the traversal
    pub ignore_patterns: Vec<String>,

    /// Structure only, no content for any file
    pub summary: bool,

    /// Preview line count for Markdown output
    pub preview_lines: usize,

    /// Whether to respect .gitignore files
    pub respect_gitignore: bool,

    /// Path to custom .gitignore file
    pub gitignore_path: Option<PathBuf>,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args(args: Args) -> Self {
        Self {
            target_dir: PathBuf::from(args.directory_path),
            output_file: args.output.map(PathBuf::from),
            format: args.format,
            max_depth: args.max_depth,
            max_size: args.max_size,
            ignore_patterns: args.ignore_patterns,
            summary: args.summary,
            preview_lines: args.lines,
            respect_gitignore: args.respect_gitignore,
            gitignore_path: args.gitignore_path.map(PathBuf::from),
        }
    }

    /// Content policy for this run: `--summary` disables content, JSON
    /// output reads full files, Markdown previews the first lines.
    pub fn content_policy(&self) -> ContentPolicy {
        if self.summary {
            ContentPolicy::None
        } else {
            match self.format {
                FormatMode::Json => ContentPolicy::Full,
                FormatMode::Markdown => ContentPolicy::Preview(self.preview_lines),
            }
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.target_dir.exists() && self.target_dir.is_dir(),
            PathNotFound,
            "Target directory not found: {}",
            self.target_dir.display()
        );

        // Check if output file directory exists and is writable
        if let Some(output) = &self.output_file {
            if let Some(parent) = output.parent() {
                ensure!(
                    parent.as_os_str().is_empty() || parent.exists(),
                    PathNotFound,
                    "Output directory not found: {}",
                    parent.display()
                );
            }
        }

        // Check if custom gitignore file exists
        if let Some(path) = &self.gitignore_path {
            ensure!(
                path.exists(),
                PathNotFound,
                "Custom .gitignore file not found: {}",
                path.display()
            );
        }

        Ok(())
    }
}
