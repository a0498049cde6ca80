//! Output formatting and display for pdfy.
//!
//! This module handles all user-facing output including:
//! - Formatted status messages
//! - Merge and write summaries
//! - Metadata listings
//! - Quiet and verbose modes
//!
//! Diagnostic logging goes through `tracing` instead; this module is only
//! for what the user asked to see.

pub mod formatter;

pub use formatter::{MessageLevel, OutputFormatter};

use crate::io::WriteStatistics;
use crate::metadata::DocumentMetadata;
use crate::tools::MergeResult;

/// Display the outcome of a merge.
pub fn display_merge_summary(formatter: &OutputFormatter, result: &MergeResult) {
    for (path, error) in &result.skipped {
        formatter.warning(&format!("Skipped {}: {error}", path.display()));
    }

    let stats = &result.statistics;
    formatter.info(&format!(
        "Merged {} file(s) ({}) into {} pages",
        stats.files_merged,
        stats.format_input_size(),
        stats.total_pages
    ));

    if formatter.is_verbose() {
        for (index, path) in result.merged_files.iter().enumerate() {
            formatter.list_item(index + 1, &path.display().to_string());
        }
        formatter.detail("Load time", &format!("{:.2}s", stats.load_time.as_secs_f64()));
        formatter.detail("Merge time", &format!("{:.2}s", stats.merge_time.as_secs_f64()));
    }
}

/// Report a written output file.
pub fn display_write_statistics(formatter: &OutputFormatter, stats: &WriteStatistics) {
    formatter.success(&format!(
        "Wrote {} ({})",
        stats.output_path.display(),
        stats.format_file_size()
    ));
    formatter.detail("Write time", &format!("{:.2}s", stats.write_time.as_secs_f64()));
}

/// Human-readable listing of document metadata, one `Label: value` per line.
pub fn format_metadata(metadata: &DocumentMetadata) -> String {
    let keywords = metadata.keywords.join(", ");
    let rows = [
        ("Title", metadata.title.as_deref()),
        ("Author", metadata.author.as_deref()),
        ("Subject", metadata.subject.as_deref()),
        ("Keywords", Some(keywords.as_str()).filter(|k| !k.is_empty())),
        ("Creator", metadata.creator.as_deref()),
        ("Producer", metadata.producer.as_deref()),
    ];

    rows.iter()
        .map(|(label, value)| format!("{label:<9} {}", value.unwrap_or("-")))
        .collect::<Vec<_>>()
        .join("\n")
}
