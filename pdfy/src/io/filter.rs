//! Upload filter for PDF inputs.
//!
//! Every tool accepts only PDF files. The filter looks at the file name and
//! the first bytes of the file; a rejected file never reaches the document
//! library.

use std::path::Path;

use crate::error::{PdfyError, Result};

/// Magic bytes every PDF file starts with.
pub const PDF_MAGIC: &[u8] = b"%PDF-";

/// Number of leading bytes searched for [`PDF_MAGIC`].
///
/// Some producers emit junk before the header; readers tolerate it within
/// the first kilobyte.
const HEADER_WINDOW: usize = 1024;

/// Accepts PDF files and rejects everything else.
#[derive(Debug, Clone, Copy)]
pub struct FileFilter {
    require_extension: bool,
}

impl FileFilter {
    /// Filter requiring both a `.pdf` extension and the PDF header.
    pub fn new() -> Self {
        Self {
            require_extension: true,
        }
    }

    /// Filter that only checks the header bytes.
    pub fn header_only() -> Self {
        Self {
            require_extension: false,
        }
    }

    /// Check the file name of an upload.
    ///
    /// # Errors
    ///
    /// Returns [`PdfyError::NotAPdf`] if the extension is not `.pdf`
    /// (case-insensitive).
    pub fn check_name(&self, path: &Path) -> Result<()> {
        if !self.require_extension {
            return Ok(());
        }

        let is_pdf = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));

        if is_pdf {
            Ok(())
        } else {
            Err(PdfyError::not_a_pdf(
                path.to_path_buf(),
                "file name does not end in .pdf",
            ))
        }
    }

    /// Check the leading bytes of an upload.
    ///
    /// # Errors
    ///
    /// Returns [`PdfyError::NotAPdf`] if the `%PDF-` header is missing.
    pub fn check_header(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        let window = &bytes[..bytes.len().min(HEADER_WINDOW)];
        let has_magic = window
            .windows(PDF_MAGIC.len())
            .any(|chunk| chunk == PDF_MAGIC);

        if has_magic {
            Ok(())
        } else {
            Err(PdfyError::not_a_pdf(
                path.to_path_buf(),
                "missing %PDF- header",
            ))
        }
    }

    /// Run both checks.
    pub fn check(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        self.check_name(path)?;
        self.check_header(path, bytes)
    }
}

impl Default for FileFilter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("doc.pdf")]
    #[case("DOC.PDF")]
    #[case("dir/report.Pdf")]
    fn test_accepts_pdf_names(#[case] name: &str) {
        assert!(FileFilter::new().check_name(Path::new(name)).is_ok());
    }

    #[rstest]
    #[case("photo.png")]
    #[case("notes.txt")]
    #[case("pdf")]
    #[case("archive.pdf.zip")]
    fn test_rejects_other_names(#[case] name: &str) {
        let err = FileFilter::new().check_name(Path::new(name)).unwrap_err();
        assert!(matches!(err, PdfyError::NotAPdf { .. }));
    }

    #[test]
    fn test_header_check() {
        let filter = FileFilter::new();
        let path = Path::new("doc.pdf");

        assert!(filter.check_header(path, b"%PDF-1.7\n%\xe2\xe3").is_ok());
        assert!(filter.check_header(path, b"\n\n%PDF-1.4").is_ok());
        assert!(filter.check_header(path, b"\x89PNG\r\n\x1a\n").is_err());
        assert!(filter.check_header(path, b"").is_err());
    }

    #[test]
    fn test_header_only_ignores_name() {
        let filter = FileFilter::header_only();
        assert!(filter.check(Path::new("upload.bin"), b"%PDF-1.5").is_ok());
        assert!(FileFilter::new().check(Path::new("upload.bin"), b"%PDF-1.5").is_err());
    }
}
