//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Export
//!
//! ```text
//! Exporting 3 photos
//! 001 beach.jpg → out/beach-framed.jpg
//! 002 broken.jpg → out/broken-framed.jpg (placeholder)
//! 003 dune.jpg
//!     Error: save: write failed: disk full
//!
//! Saved 2 of 3 (1 failed)
//! ```
//!
//! ## Palette
//!
//! ```text
//! beach.jpg
//!     #306090
//!     #c0a080
//! Presets: #000000 #666666 #FFFFFF #306090 #c0a080
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure and do no I/O.

use crate::export::{ExportEvent, ExportOutcome, ExportSummary, ItemStatus};
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ============================================================================
// Export
// ============================================================================

/// Format a single export progress event as display lines.
pub fn format_export_event(event: &ExportEvent) -> Vec<String> {
    match event {
        ExportEvent::Started { total } => {
            let noun = if *total == 1 { "photo" } else { "photos" };
            vec![format!("Exporting {} {}", total, noun)]
        }
        ExportEvent::ItemFinished {
            current,
            source,
            status,
            ..
        } => match status {
            ItemStatus::Saved { path, placeholder } => {
                let suffix = if *placeholder { " (placeholder)" } else { "" };
                vec![format!(
                    "{} {} → {}{}",
                    format_index(*current),
                    file_name(source),
                    path.display(),
                    suffix
                )]
            }
            ItemStatus::Failed { error } => vec![
                format!("{} {}", format_index(*current), file_name(source)),
                format!("    Error: {}", error),
            ],
        },
    }
}

/// Format the closing summary line of an export.
pub fn format_export_summary(summary: &ExportSummary) -> Vec<String> {
    let total = summary.saved + summary.failed;
    let line = match summary.outcome() {
        ExportOutcome::AllSaved => format!("Saved {} of {}", summary.saved, total),
        ExportOutcome::PartialFailure => format!(
            "Saved {} of {} ({} failed)",
            summary.saved, total, summary.failed
        ),
        ExportOutcome::AllFailed => format!("All {} exports failed", total),
    };
    vec![String::new(), line]
}

pub fn print_export_summary(summary: &ExportSummary) {
    for line in format_export_summary(summary) {
        println!("{}", line);
    }
}

// ============================================================================
// Palette and swatches
// ============================================================================

/// Format the extracted colors of one photo and the resulting preset row.
pub fn format_palette(source: &Path, extracted: &[String], presets: &[String]) -> Vec<String> {
    let mut lines = vec![file_name(source)];
    if extracted.is_empty() {
        lines.push("    (no dominant colors)".to_string());
    }
    lines.extend(extracted.iter().map(|c| format!("    {}", c)));
    lines.push(format!("Presets: {}", presets.join(" ")));
    lines
}

pub fn print_palette(source: &Path, extracted: &[String], presets: &[String]) {
    for line in format_palette(source, extracted, presets) {
        println!("{}", line);
    }
}

/// Format the color-picker grid, one row per line.
pub fn format_swatches(grid: &[Vec<String>]) -> Vec<String> {
    grid.iter().map(|row| row.join(" ")).collect()
}

pub fn print_swatches(grid: &[Vec<String>]) {
    for line in format_swatches(grid) {
        println!("{}", line);
    }
}
