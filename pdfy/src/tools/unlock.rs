//! Remove the password from a PDF.
//!
//! Unlike the other tools this one starts from the file bytes: the document
//! library only keeps the objects of an encrypted file when it opens with an
//! empty user password. For every other file the bytes are parsed a second
//! time with the trailer's `/Encrypt` entry hidden, which leaves the objects
//! in place as ciphertext, and the entry is restored before decrypting.

use lopdf::Document;
use std::path::Path;
use tracing::info;

use crate::error::{PdfyError, Result};

const OP: &str = "Unlock";

/// Stand-in key for `/Encrypt`; same length so xref offsets stay valid.
const HIDDEN_ENCRYPT_KEY: &[u8] = b"Xncrypt";

/// Decrypt the PDF in `bytes` with `password`.
///
/// Either the user or the owner password is accepted. A file that opens
/// without a password only carries permission restrictions; those are
/// dropped and `password` is not checked. `path` names the file in errors.
///
/// # Errors
///
/// - [`PdfyError::IncorrectPassword`] if `password` opens neither way
/// - [`PdfyError::FailedToLoadPdf`] if the bytes do not parse
/// - [`PdfyError::OperationFailed`] if the file is not encrypted
/// - [`PdfyError::CorruptedPdf`] if no pages survive decryption
pub fn unlock_pdf(bytes: &[u8], path: &Path, password: &str) -> Result<Document> {
    let load_error =
        |e: lopdf::Error| PdfyError::failed_to_load_pdf(path.to_path_buf(), e.to_string());

    let mut doc = Document::load_mem(bytes).map_err(load_error)?;
    if !doc.is_encrypted() {
        return Err(PdfyError::operation_failed(
            OP,
            "the document is not password protected",
        ));
    }

    if doc.encryption_state.is_some() {
        // Opened with the empty user password; objects are already plain.
        remove_encryption(&mut doc)?;
    } else {
        doc.authenticate_password(password)
            .map_err(|_| PdfyError::incorrect_password(path.to_path_buf()))?;
        let encrypt = doc
            .trailer
            .get(b"Encrypt")
            .cloned()
            .map_err(|e| PdfyError::operation_failed(OP, e.to_string()))?;

        let hidden = hide_encrypt_entry(bytes).ok_or_else(|| {
            PdfyError::operation_failed(OP, "cannot locate the encryption entry in the trailer")
        })?;
        doc = Document::load_mem(&hidden).map_err(load_error)?;
        doc.trailer.remove(HIDDEN_ENCRYPT_KEY);
        doc.trailer.set("Encrypt", encrypt);

        doc.decrypt(password)
            .map_err(|e| PdfyError::operation_failed(OP, e.to_string()))?;
    }

    if doc.get_pages().is_empty() {
        return Err(PdfyError::corrupted_pdf(
            path.to_path_buf(),
            "no pages left after decryption",
        ));
    }

    info!(path = %path.display(), "removed password");
    Ok(doc)
}

fn remove_encryption(doc: &mut Document) -> Result<()> {
    let id = doc
        .trailer
        .remove(b"Encrypt")
        .and_then(|entry| entry.as_reference().ok())
        .ok_or_else(|| PdfyError::operation_failed(OP, "encryption entry is not a reference"))?;
    doc.objects.remove(&id);
    doc.encryption_state = None;
    Ok(())
}

/// Copy of `bytes` with `/Encrypt` renamed in the trailer `startxref` points at.
///
/// Returns `None` if the trailer has no `/Encrypt` entry.
fn hide_encrypt_entry(bytes: &[u8]) -> Option<Vec<u8>> {
    let start = xref_start(bytes)?;
    let mut hidden = bytes.to_vec();
    let trailer = &mut hidden[start..];

    let mut found = false;
    let mut from = 0;
    while let Some(offset) = find(&trailer[from..], b"/Encrypt") {
        let at = from + offset;
        let end = at + b"/Encrypt".len();
        // `/EncryptMetadata` and friends are other keys.
        if trailer.get(end).is_none_or(|b| !b.is_ascii_alphanumeric()) {
            trailer[at + 1..end].copy_from_slice(HIDDEN_ENCRYPT_KEY);
            found = true;
        }
        from = end;
    }

    found.then_some(hidden)
}

/// Offset of the newest cross-reference section.
fn xref_start(bytes: &[u8]) -> Option<usize> {
    let keyword = bytes
        .windows(b"startxref".len())
        .rposition(|w| w == b"startxref")?;
    let digits: String = bytes[keyword + b"startxref".len()..]
        .iter()
        .skip_while(|b| b.is_ascii_whitespace())
        .take_while(|b| b.is_ascii_digit())
        .map(|&b| char::from(b))
        .collect();

    digits.parse().ok().filter(|&start| start < bytes.len())
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
