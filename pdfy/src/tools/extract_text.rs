//! Pull the plain text out of a PDF.

use lopdf::Document;
use tracing::{debug, warn};

use crate::config::PageRange;
use crate::error::{PdfyError, Result};

const OP: &str = "Extract text";

/// Text of the pages in `range` (all pages when `None`).
///
/// Pages are separated by a blank line. Pages whose text cannot be decoded
/// contribute an empty string, so the page count of the output stays
/// predictable.
///
/// # Errors
///
/// Returns an error if the range points past the last page or no page
/// yields any text at all while decoding failed.
pub fn extract_text(doc: &Document, range: Option<&PageRange>) -> Result<String> {
    let total = doc.get_pages().len();
    let selected = match range {
        Some(range) => range.resolve(total)?,
        None => (1..=total as u32).collect(),
    };

    let mut texts = Vec::with_capacity(selected.len());
    let mut failures = 0;
    for &page in &selected {
        match doc.extract_text(&[page]) {
            Ok(text) => texts.push(text.trim_end().to_string()),
            Err(e) => {
                warn!(page, error = %e, "could not extract text");
                failures += 1;
                texts.push(String::new());
            }
        }
    }

    if failures > 0 && failures == selected.len() {
        return Err(PdfyError::operation_failed(
            OP,
            "no page contains extractable text",
        ));
    }

    debug!(pages = selected.len(), failures, "extracted text");
    Ok(texts.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;

    #[test]
    fn test_extract_all_pages() {
        let doc = test_support::sample_document(3);
        let text = extract_text(&doc, None).unwrap();

        let pages: Vec<&str> = text.split("\n\n").collect();
        assert_eq!(pages.len(), 3);
        assert!(pages[0].contains("Page 1"));
        assert!(pages[2].contains("Page 3"));
    }

    #[test]
    fn test_extract_range() {
        let doc = test_support::sample_document(5);
        let range = PageRange::parse("4").unwrap();
        let text = extract_text(&doc, Some(&range)).unwrap();

        assert!(text.contains("Page 4"));
        assert!(!text.contains("Page 1"));
    }

    #[test]
    fn test_extract_range_out_of_bounds() {
        let doc = test_support::sample_document(1);
        let range = PageRange::parse("2-3").unwrap();
        assert!(extract_text(&doc, Some(&range)).is_err());
    }
}
