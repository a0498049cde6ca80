//! Shrink a PDF by compressing streams and dropping unused objects.

use lopdf::Document;
use tracing::info;

use crate::config::CompressionLevel;
use crate::error::Result;

/// Object counts before and after compression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionReport {
    /// Level that was applied.
    pub level: CompressionLevel,
    /// Objects in the document before.
    pub objects_before: usize,
    /// Objects in the document after.
    pub objects_after: usize,
}

impl CompressionReport {
    /// Objects dropped by the pass.
    pub fn objects_removed(&self) -> usize {
        self.objects_before.saturating_sub(self.objects_after)
    }
}

/// Compress `doc` in place.
///
/// - [`CompressionLevel::None`] leaves the document untouched.
/// - [`CompressionLevel::Standard`] deflates every uncompressed stream.
/// - [`CompressionLevel::Maximum`] also removes empty streams and
///   unreachable objects, then renumbers what is left.
pub fn compress_document(doc: &mut Document, level: CompressionLevel) -> Result<CompressionReport> {
    let objects_before = doc.objects.len();

    match level {
        CompressionLevel::None => {}
        CompressionLevel::Standard => doc.compress(),
        CompressionLevel::Maximum => {
            doc.delete_zero_length_streams();
            doc.prune_objects();
            doc.compress();
            doc.renumber_objects();
        }
    }

    let report = CompressionReport {
        level,
        objects_before,
        objects_after: doc.objects.len(),
    };
    info!(?level, removed = report.objects_removed(), "compressed document");
    Ok(report)
}
