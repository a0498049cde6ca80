//! Split a PDF into several documents.

use lopdf::Document;
use tracing::debug;

use crate::config::PageRange;
use crate::error::{PdfyError, Result};
use crate::pages;

/// How a document is cut into parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitMode {
    /// One part per range, in the order given.
    Ranges(Vec<PageRange>),
    /// Parts of at most `n` consecutive pages.
    Chunks(u32),
    /// A single part with the selected pages.
    Extract(PageRange),
    /// One part per page.
    EveryPage,
}

/// One output of a split.
#[derive(Debug)]
pub struct SplitPart {
    /// 1-indexed pages of the source document in this part.
    pub pages: Vec<u32>,
    /// The part as a standalone document.
    pub document: Document,
}

impl SplitPart {
    /// Short label for file names: `3` or `1-4`.
    ///
    /// Non-contiguous selections use the first and last page.
    pub fn label(&self) -> String {
        match (self.pages.first(), self.pages.last()) {
            (Some(first), Some(last)) if first == last => first.to_string(),
            (Some(first), Some(last)) => format!("{first}-{last}"),
            _ => "empty".to_string(),
        }
    }
}

/// Split `doc` according to `mode`.
///
/// # Errors
///
/// Returns an error if a range points past the last page or the chunk size
/// is zero.
pub fn split_document(doc: &Document, mode: &SplitMode) -> Result<Vec<SplitPart>> {
    let total = doc.get_pages().len();
    let groups = page_groups(mode, total)?;

    let mut parts = Vec::with_capacity(groups.len());
    for page_numbers in groups {
        let document = pages::select_pages(doc, &page_numbers)?;
        debug!(pages = ?page_numbers, "split part");
        parts.push(SplitPart {
            pages: page_numbers,
            document,
        });
    }

    Ok(parts)
}

fn page_groups(mode: &SplitMode, total: usize) -> Result<Vec<Vec<u32>>> {
    let all: Vec<u32> = (1..=total as u32).collect();

    let groups = match mode {
        SplitMode::Ranges(ranges) => {
            if ranges.is_empty() {
                return Err(PdfyError::invalid_config("No page ranges given"));
            }
            ranges
                .iter()
                .map(|range| range.resolve(total))
                .collect::<Result<Vec<_>>>()?
        }
        SplitMode::Chunks(0) => {
            return Err(PdfyError::invalid_config("Chunk size must be at least 1"));
        }
        SplitMode::Chunks(size) => all.chunks(*size as usize).map(<[u32]>::to_vec).collect(),
        SplitMode::Extract(range) => vec![range.resolve(total)?],
        SplitMode::EveryPage => all.iter().map(|&page| vec![page]).collect(),
    };

    Ok(groups)
}
