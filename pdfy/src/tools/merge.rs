//! Merge several PDFs into one document.
//!
//! Inputs are loaded with bounded concurrency, optionally cut down to a
//! page range, and appended in the order they were given.

use lopdf::Document;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::config::PageRange;
use crate::error::{PdfyError, Result};
use crate::io::{LoadedPdf, PdfReader};
use crate::pages;
use crate::utils::format_file_size;

/// One merge input: a file and the pages to take from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeInput {
    /// Path to the PDF.
    pub path: PathBuf,
    /// Pages to take; all pages when `None`.
    pub pages: Option<PageRange>,
}

impl MergeInput {
    /// Take every page of `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pages: None,
        }
    }

    /// Parse `file.pdf` or `file.pdf:1-3,7`.
    ///
    /// The suffix after the last `:` is only treated as a page range when it
    /// parses as one, so paths containing colons still work.
    pub fn parse(spec: &str) -> Self {
        if let Some((path, range)) = spec.rsplit_once(':')
            && !path.is_empty()
            && let Ok(pages) = PageRange::parse(range)
        {
            return Self {
                path: PathBuf::from(path),
                pages: Some(pages),
            };
        }
        Self::new(spec)
    }
}

/// Options for a merge.
#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// Page range applied to inputs that carry no range of their own.
    pub page_range: Option<PageRange>,

    /// Skip inputs that fail to load instead of aborting.
    pub continue_on_error: bool,

    /// Number of inputs loaded at once.
    pub jobs: usize,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            page_range: None,
            continue_on_error: false,
            jobs: 4,
        }
    }
}

/// Statistics about a merge operation.
#[derive(Debug, Clone)]
pub struct MergeStatistics {
    /// Number of PDFs successfully merged.
    pub files_merged: usize,

    /// Total number of pages in merged document.
    pub total_pages: usize,

    /// Total time taken for merge.
    pub merge_time: Duration,

    /// Time taken to load all PDFs.
    pub load_time: Duration,

    /// Total size of input files.
    pub input_size: u64,
}

impl MergeStatistics {
    /// Format input size as human-readable string.
    pub fn format_input_size(&self) -> String {
        format_file_size(self.input_size)
    }
}

/// Result of a merge operation.
#[derive(Debug)]
pub struct MergeResult {
    /// The merged PDF document.
    pub document: Document,

    /// Statistics about the merge.
    pub statistics: MergeStatistics,

    /// Paths of files that were merged.
    pub merged_files: Vec<PathBuf>,

    /// Inputs that were skipped, with the reason.
    pub skipped: Vec<(PathBuf, PdfyError)>,
}

/// Load and merge `inputs`.
///
/// # Errors
///
/// Returns an error if:
/// - An input cannot be loaded and `continue_on_error` is off
/// - No input is left to merge
/// - The page tree cannot be rebuilt
pub async fn merge_files(inputs: &[MergeInput], options: &MergeOptions) -> Result<MergeResult> {
    let merge_start = Instant::now();

    let paths: Vec<PathBuf> = inputs.iter().map(|input| input.path.clone()).collect();
    let load_results = PdfReader::new().load_many(&paths, options.jobs).await;
    let load_time = merge_start.elapsed();

    let mut loaded: Vec<LoadedPdf> = Vec::new();
    let mut skipped = Vec::new();

    for (input, result) in inputs.iter().zip(load_results) {
        let selected = result.and_then(|pdf| {
            let range = input.pages.as_ref().or(options.page_range.as_ref());
            select(pdf, range)
        });

        match selected {
            Ok(pdf) => loaded.push(pdf),
            Err(e) if options.continue_on_error && e.is_recoverable() => {
                warn!(path = %input.path.display(), error = %e, "skipping input");
                skipped.push((input.path.clone(), e));
            }
            Err(e) => return Err(e),
        }
    }

    let input_size = loaded.iter().map(|pdf| pdf.file_size).sum();
    let merged_files: Vec<PathBuf> = loaded.iter().map(|pdf| pdf.path.clone()).collect();
    let documents: Vec<Document> = loaded.into_iter().map(|pdf| pdf.document).collect();

    let document = tokio::task::spawn_blocking(move || merge_documents(documents))
        .await
        .map_err(|e| PdfyError::other(format!("Merge task failed: {e}")))??;

    let statistics = MergeStatistics {
        files_merged: merged_files.len(),
        total_pages: document.get_pages().len(),
        merge_time: merge_start.elapsed(),
        load_time,
        input_size,
    };

    info!(
        files = statistics.files_merged,
        pages = statistics.total_pages,
        "merged documents"
    );

    Ok(MergeResult {
        document,
        statistics,
        merged_files,
        skipped,
    })
}

fn select(mut pdf: LoadedPdf, range: Option<&PageRange>) -> Result<LoadedPdf> {
    if let Some(range) = range {
        let page_numbers = range.resolve(pdf.page_count)?;
        pdf.document = pages::select_pages(&pdf.document, &page_numbers)?;
        pdf.page_count = page_numbers.len();
    }
    Ok(pdf)
}

/// Merge already loaded documents, in order.
///
/// The first document is the base: its catalog and information dictionary
/// are kept.
pub fn merge_documents(documents: Vec<Document>) -> Result<Document> {
    let mut documents = documents.into_iter();
    let mut merged = documents.next().ok_or(PdfyError::NoInputFiles)?;

    for doc in documents {
        pages::append_document(&mut merged, doc)?;
    }

    merged.prune_objects();
    merged.renumber_objects();
    Ok(merged)
}
