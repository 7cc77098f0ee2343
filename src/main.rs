use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use colored::Colorize;
use crossbeam_channel::{bounded, RecvTimeoutError};
use humansize::{format_size, BINARY};
use indicatif::{ProgressBar, ProgressStyle};
use reclaim::{
    delete_paths, scan_roots, separate_usage, Config, DeletionResult, ProgressCounter,
    ScanOptions, ScanReport,
};
use std::collections::BTreeMap;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Find and remove dependency and build-output directories to reclaim disk space",
    long_about = None
)]
struct Args {
    /// Directories to scan (defaults to current directory)
    #[arg(default_values_t = vec![String::from(".")])]
    paths: Vec<String>,

    /// Delete the directories found
    #[arg(long, short)]
    delete: bool,

    /// Show what would be removed, but don't remove anything
    #[arg(long)]
    dry_run: bool,

    /// Show detailed information while scanning
    #[arg(long, short)]
    verbose: bool,

    /// List every directory instead of a summary per directory name
    #[arg(long, short)]
    files: bool,

    /// Directory names to skip while scanning (repeatable)
    #[arg(long, short = 'x', value_name = "NAME")]
    exclude: Vec<String>,

    /// Report this subtree separately from the rest of each scanned root
    #[arg(long, value_name = "DIR")]
    separate: Option<PathBuf>,

    /// Configuration file (defaults to ~/.config/reclaim/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Don't ask for confirmation before deleting
    #[arg(long, short)]
    yes: bool,
}

/// Print the size of each root with `sub` split out
fn print_separate_usage(roots: &[PathBuf], sub: &Path) {
    for root in roots {
        let sub = if sub.is_absolute() {
            sub.to_path_buf()
        } else {
            root.join(sub)
        };
        let (rest, part) = separate_usage(root, &sub);
        for err in [&rest.error, &part.error].into_iter().flatten() {
            eprintln!("Warning: {}", err);
        }
        println!(
            "{}: {} (plus {} in {})",
            root.display(),
            format_size(rest.bytes, BINARY).bold(),
            format_size(part.bytes, BINARY),
            sub.display()
        );
    }
    println!();
}

fn print_report(report: &ScanReport, files: bool) {
    if report.candidates.is_empty() {
        println!("No cleanable directories found.");
        return;
    }

    if files {
        for candidate in &report.candidates {
            println!(
                "  - {} ({})",
                candidate.path.display(),
                format_size(candidate.size, BINARY)
            );
        }
    } else {
        // Aggregate by directory name
        let mut by_name: BTreeMap<String, (usize, u64)> = BTreeMap::new();
        for candidate in &report.candidates {
            let name = candidate
                .path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let slot = by_name.entry(name).or_default();
            slot.0 += 1;
            slot.1 += candidate.size;
        }

        let mut rows: Vec<_> = by_name.into_iter().collect();
        rows.sort_by(|a, b| b.1 .1.cmp(&a.1 .1));
        for (name, (count, size)) in rows {
            let plural = if count == 1 { "directory" } else { "directories" };
            println!(
                "  - {}: {} ({} {})",
                name,
                format_size(size, BINARY),
                count,
                plural
            );
        }
    }

    println!("========================================");
    println!(
        "Total Size Found: {} in {} directories",
        format_size(report.total_bytes, BINARY).bold(),
        report.candidates.len()
    );
    if report.warnings > 0 {
        println!(
            "{}",
            format!("{} entries could not be read", report.warnings).yellow()
        );
    }
}

fn confirm(count: usize, bytes: u64) -> Result<bool> {
    print!(
        "Delete {} directories ({})? [y/N] ",
        count,
        format_size(bytes, BINARY)
    );
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

/// Run the deletion on a worker thread and show its progress until it finishes
fn run_deletion(paths: Vec<PathBuf>, tick: Duration) -> Result<DeletionResult> {
    let counter = Arc::new(ProgressCounter::new());
    let (sender, receiver) = bounded::<DeletionResult>(1);

    let worker_counter = Arc::clone(&counter);
    let worker = thread::spawn(move || {
        let result = delete_paths(&paths, Some(worker_counter.as_ref()));
        // Receiver only goes away if the display side already bailed out
        sender.send(result).ok();
    });

    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?,
    );
    progress.set_message("Removing files...");

    let result = loop {
        match receiver.recv_timeout(tick) {
            Ok(result) => break result,
            Err(RecvTimeoutError::Timeout) => {
                progress.tick();
                progress.set_message(format!("Removed {} files", counter.get()));
            }
            Err(RecvTimeoutError::Disconnected) => {
                progress.abandon_with_message("Deletion stopped unexpectedly");
                return Err(anyhow!("Deletion worker panicked"));
            }
        }
    };

    worker
        .join()
        .map_err(|_| anyhow!("Deletion worker panicked"))?;
    progress.finish_with_message(format!("Removed {} files", result.files_deleted));

    Ok(result)
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;

    let verbose = args.verbose || config.verbose;
    let mut exclude = config.exclude.clone();
    exclude.extend(args.exclude.iter().cloned());

    let mut roots = Vec::new();
    for path in &args.paths {
        let root = PathBuf::from(path);
        if !root.exists() {
            bail!("Path does not exist: {}", root.display());
        }
        roots.push(root);
    }

    if let Some(sub) = args.separate.as_ref().or(config.separate.as_ref()) {
        print_separate_usage(&roots, sub);
    }

    let report = scan_roots(&roots, &ScanOptions { verbose, exclude });
    print_report(&report, args.files);

    if report.candidates.is_empty() {
        return Ok(());
    }

    if args.dry_run {
        for candidate in &report.candidates {
            println!("Would remove: {}", candidate.path.display());
        }
        println!("Dry run mode: No files were deleted.");
        return Ok(());
    }

    if !args.delete {
        return Ok(());
    }

    if !args.yes && !confirm(report.candidates.len(), report.total_bytes)? {
        println!("Nothing deleted.");
        return Ok(());
    }

    let result = run_deletion(report.paths(), config.refresh_interval())?;

    match result.error {
        None => {
            println!(
                "Files Removed: {} ({} reclaimed)",
                result.files_deleted,
                format_size(report.total_bytes, BINARY).bold().red()
            );
            Ok(())
        }
        Some(err) => {
            println!(
                "{}",
                format!(
                    "Partially completed: {} files removed before errors",
                    result.files_deleted
                )
                .yellow()
            );
            Err(anyhow!(err).context("Some directories could not be fully removed"))
        }
    }
}
