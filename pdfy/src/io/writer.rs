//! Saving tool results.
//!
//! Output is written to a hidden temporary file next to the target and
//! renamed into place, so a failed save never leaves a half-written file
//! behind and the input is never touched.
//!
//! # Examples
//!
//! ```no_run
//! use pdfy::io::writer::PdfWriter;
//! use lopdf::Document;
//! use std::path::Path;
//!
//! # async fn example(doc: Document) -> pdfy::Result<()> {
//! PdfWriter::new().save(&doc, Path::new("signed-contract.pdf")).await?;
//! # Ok(())
//! # }
//! ```

use lopdf::Document;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::task;
use tracing::debug;

use crate::error::{PdfyError, Result};
use crate::utils::format_file_size;

/// How a document is serialized and written.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Write through a temporary file and rename.
    pub atomic: bool,
    /// Deflate uncompressed streams on the way out.
    pub compress: bool,
    /// Renumber objects densely on the way out.
    pub renumber: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            atomic: true,
            compress: true,
            renumber: true,
        }
    }
}

impl WriteOptions {
    /// Write the document exactly as it is.
    ///
    /// Required for encrypted documents: object numbers feed the
    /// per-object keys and streams are already ciphertext.
    pub fn verbatim() -> Self {
        Self {
            compress: false,
            renumber: false,
            ..Self::default()
        }
    }
}

/// What a save produced.
#[derive(Debug, Clone)]
pub struct WriteStatistics {
    /// Serialize and write time.
    pub write_time: Duration,
    /// Bytes on disk.
    pub file_size: u64,
    /// Final path.
    pub output_path: PathBuf,
    /// Whether streams were deflated on the way out.
    pub compressed: bool,
}

impl WriteStatistics {
    /// Human-readable [`WriteStatistics::file_size`].
    pub fn format_file_size(&self) -> String {
        format_file_size(self.file_size)
    }
}

/// Serializes documents and writes output files.
#[derive(Debug, Clone, Default)]
pub struct PdfWriter {
    options: WriteOptions,
}

impl PdfWriter {
    /// Compressing, renumbering, atomic writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Writer with explicit options.
    pub fn with_options(options: WriteOptions) -> Self {
        Self { options }
    }

    /// Writer that leaves the document structure alone.
    pub fn verbatim() -> Self {
        Self::with_options(WriteOptions::verbatim())
    }

    /// Save `doc` to `path`.
    ///
    /// # Errors
    ///
    /// [`PdfyError::FailedToCreateOutput`] or [`PdfyError::FailedToWrite`]
    /// when the file system refuses, [`PdfyError::OperationFailed`] when the
    /// document cannot be serialized.
    pub async fn save(&self, doc: &Document, path: &Path) -> Result<()> {
        self.save_with_stats(doc, path).await.map(|_| ())
    }

    /// Save `doc` to `path` and report what was written.
    pub async fn save_with_stats(&self, doc: &Document, path: &Path) -> Result<WriteStatistics> {
        let start = Instant::now();
        let bytes = self.to_bytes(doc).await?;
        let mut stats = self.write_bytes(bytes, path).await?;
        stats.write_time = start.elapsed();
        stats.compressed = self.options.compress;

        debug!(path = %stats.output_path.display(), size = stats.file_size, "wrote PDF");
        Ok(stats)
    }

    /// Serialize a copy of `doc`; the caller's document is left untouched.
    pub async fn to_bytes(&self, doc: &Document) -> Result<Vec<u8>> {
        let options = self.options.clone();
        let mut doc = doc.clone();

        task::spawn_blocking(move || {
            if options.compress {
                doc.compress();
            }
            if options.renumber {
                doc.renumber_objects();
            }

            let mut bytes = Vec::new();
            doc.save_to(&mut bytes)
                .map_err(|e| PdfyError::operation_failed("Save", e.to_string()))?;
            Ok(bytes)
        })
        .await
        .map_err(|e| PdfyError::other(format!("Save task failed: {e}")))?
    }

    /// Write raw bytes (a serialized PDF or extracted text) to `path`.
    pub async fn write_bytes(&self, bytes: Vec<u8>, path: &Path) -> Result<WriteStatistics> {
        let start = Instant::now();
        let target = path.to_path_buf();
        let atomic = self.options.atomic;
        let file_size = bytes.len() as u64;

        let output_path = task::spawn_blocking(move || {
            if atomic {
                write_atomically(&bytes, target)
            } else {
                std::fs::write(&target, &bytes).map_err(|source| PdfyError::FailedToWrite {
                    path: target.clone(),
                    source,
                })?;
                Ok(target)
            }
        })
        .await
        .map_err(|e| PdfyError::other(format!("Write task failed: {e}")))??;

        Ok(WriteStatistics {
            write_time: start.elapsed(),
            file_size,
            output_path,
            compressed: false,
        })
    }
}

fn write_atomically(bytes: &[u8], target: PathBuf) -> Result<PathBuf> {
    let temp = temp_path_for(&target);

    std::fs::write(&temp, bytes).map_err(|source| {
        // The temp file may exist but be incomplete.
        let _ = std::fs::remove_file(&temp);
        PdfyError::FailedToCreateOutput {
            path: target.clone(),
            source,
        }
    })?;

    std::fs::rename(&temp, &target).map_err(|source| {
        let _ = std::fs::remove_file(&temp);
        PdfyError::FailedToWrite {
            path: target.clone(),
            source,
        }
    })?;

    Ok(target)
}

/// Hidden sibling of `path` used for atomic writes.
fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.{}.tmp", uuid::Uuid::new_v4().simple()))
}
