/*!
 * Command-line interface for treedump
 */

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::process;
use std::sync::Arc;
use std::time::Instant;

use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};

use treedump::config::{Args, Config};
use treedump::error::{Result, ResultExt};
use treedump::report::{ReportFormat, Reporter, ScanReport, ScanStats};
use treedump::scanner::Scanner;
use treedump::utils::count_files;
use treedump::writer::StreamWriter;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Shell completion generation short-circuits the scan
    if let Some(shell) = args.generate {
        let mut cmd = Args::command();
        let name = cmd.get_name().to_string();
        clap_complete::generate(shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    // Create and validate configuration
    let config = Config::from_args(args);
    config.validate()?;

    // Progress is only drawn when the dump goes to a file; on stdout the
    // bar would interleave with the output
    let progress = if config.output_file.is_some() {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} {prefix:.bold.cyan} {wide_msg:.dim.white} {pos}/{len} ({percent}%) Elapsed: {elapsed_precise}")
                .unwrap(),
        );
        bar.enable_steady_tick(std::time::Duration::from_millis(100));
        bar.set_prefix("📊 Processing");
        bar
    } else {
        ProgressBar::hidden()
    };

    // Count files for progress tracking
    match count_files(&config) {
        Ok(count) => progress.set_length(count),
        Err(err) => progress.set_message(format!("⚠️ Warning: failed to count files: {}", err)),
    }

    // Open the sink; a named output file is created or truncated fresh
    let sink: Box<dyn Write> = match &config.output_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout())),
    };

    let scanner = Scanner::new(config.clone(), Arc::new(progress.clone()));
    let mut writer = StreamWriter::new(config.format, sink);
    let mut stats = ScanStats::default();

    let start_time = Instant::now();

    // Drive the pipeline: each entry flows from the walker straight into
    // the formatter
    writer.begin()?;
    for entry in scanner.entries()? {
        stats.record(&entry);
        writer.write_entry(&entry)?;
    }
    writer.finish()?;

    let duration = start_time.elapsed();
    progress.finish_and_clear();

    // The console report only makes sense when stdout wasn't the dump
    if let Some(path) = &config.output_file {
        let report = ScanReport {
            output_file: path.display().to_string(),
            duration,
            stats,
        };
        Reporter::new(ReportFormat::ConsoleTable).print_report(&report);
    }

    Ok(())
}
