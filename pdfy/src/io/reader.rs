//! Loading PDFs from disk or memory.
//!
//! Files go through the [`FileFilter`] first; only accepted bytes reach the
//! document library, which parses them on the blocking pool. Merge loads
//! several files at once with [`PdfReader::load_many`].
//!
//! # Examples
//!
//! ```no_run
//! use pdfy::io::reader::PdfReader;
//! use std::path::Path;
//!
//! # async fn example() -> pdfy::Result<()> {
//! let loaded = PdfReader::new().load(Path::new("contract.pdf")).await?;
//! println!("{} pages", loaded.page_count);
//! # Ok(())
//! # }
//! ```

use futures::stream::{self, StreamExt};
use lopdf::Document;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::task;
use tracing::debug;

use crate::error::{PdfyError, Result};
use crate::io::filter::FileFilter;

/// A parsed input file.
///
/// Owned by the one tool invocation that loaded it.
#[derive(Debug)]
pub struct LoadedPdf {
    /// The parsed document.
    pub document: Document,
    /// Where it came from; names the file in messages.
    pub path: PathBuf,
    /// Pages in the document.
    pub page_count: usize,
    /// Parse time.
    pub load_time: Duration,
    /// Size of the input in bytes.
    pub file_size: u64,
}

/// Outcome of loading one file of a batch.
pub type LoadResult = Result<LoadedPdf>;

/// Loads PDFs through an upload filter.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfReader {
    filter: FileFilter,
}

impl PdfReader {
    /// Reader with the default filter (`.pdf` name and `%PDF-` header).
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different upload filter.
    pub fn with_filter(filter: FileFilter) -> Self {
        Self { filter }
    }

    /// Read and parse the file at `path`.
    ///
    /// # Errors
    ///
    /// - [`PdfyError::FileNotFound`], [`PdfyError::NotAFile`] or
    ///   [`PdfyError::FileNotAccessible`] when the file cannot be read
    /// - [`PdfyError::NotAPdf`] when the filter rejects it
    /// - [`PdfyError::EncryptedPdf`], [`PdfyError::FailedToLoadPdf`] or
    ///   [`PdfyError::CorruptedPdf`] when parsing fails
    pub async fn load(&self, path: &Path) -> Result<LoadedPdf> {
        let bytes = self.read(path).await?;
        self.load_bytes(bytes, path.to_path_buf()).await
    }

    /// Read the file at `path` through the filter without parsing it.
    pub async fn read(&self, path: &Path) -> Result<Vec<u8>> {
        let unreadable = |source: std::io::Error| match source.kind() {
            ErrorKind::NotFound => PdfyError::file_not_found(path.to_path_buf()),
            _ => PdfyError::FileNotAccessible {
                path: path.to_path_buf(),
                source,
            },
        };

        let metadata = tokio::fs::metadata(path).await.map_err(unreadable)?;
        if !metadata.is_file() {
            return Err(PdfyError::not_a_file(path.to_path_buf()));
        }

        // A file with the wrong name is never read.
        self.filter.check_name(path)?;

        let bytes = tokio::fs::read(path).await.map_err(unreadable)?;
        self.filter.check_header(path, &bytes)?;
        Ok(bytes)
    }

    /// Parse a PDF already in memory.
    ///
    /// `path` names the upload in errors and in the returned [`LoadedPdf`].
    /// Only the header check of the filter applies.
    pub async fn load_bytes(&self, bytes: Vec<u8>, path: PathBuf) -> Result<LoadedPdf> {
        self.filter.check_header(&path, &bytes)?;
        let file_size = bytes.len() as u64;

        task::spawn_blocking(move || {
            let start = Instant::now();
            let document = parse_document(&bytes, &path)?;

            let page_count = document.get_pages().len();
            if page_count == 0 {
                return Err(PdfyError::corrupted_pdf(path, "the document has no pages"));
            }

            let load_time = start.elapsed();
            debug!(path = %path.display(), page_count, ?load_time, "loaded PDF");

            Ok(LoadedPdf {
                document,
                path,
                page_count,
                load_time,
                file_size,
            })
        })
        .await
        .map_err(|e| PdfyError::other(format!("Load task failed: {e}")))?
    }

    /// Load every path, at most `jobs` at a time.
    ///
    /// One result per path, in the order of `paths`; a failing file does not
    /// stop the others.
    pub async fn load_many(&self, paths: &[PathBuf], jobs: usize) -> Vec<LoadResult> {
        let reader = *self;
        let mut indexed: Vec<(usize, LoadResult)> = stream::iter(paths.iter().enumerate())
            .map(|(index, path)| async move { (index, reader.load(path).await) })
            .buffer_unordered(jobs.max(1))
            .collect()
            .await;

        indexed.sort_by_key(|(index, _)| *index);
        indexed.into_iter().map(|(_, result)| result).collect()
    }
}

fn parse_document(bytes: &[u8], path: &Path) -> Result<Document> {
    let document = Document::load_mem(bytes).map_err(|e| {
        let message = e.to_string();
        let lower = message.to_lowercase();
        if lower.contains("crypt") || lower.contains("password") {
            PdfyError::encrypted_pdf(path.to_path_buf())
        } else {
            PdfyError::failed_to_load_pdf(path.to_path_buf(), message)
        }
    })?;

    if document.is_encrypted() {
        return Err(PdfyError::encrypted_pdf(path.to_path_buf()));
    }
    Ok(document)
}
