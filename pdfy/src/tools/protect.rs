//! Password-protect a PDF.
//!
//! Documents are encrypted with the standard security handler (RC4, 128-bit
//! key). Readers ask for the user password before showing anything.

use lopdf::{Document, EncryptionState, EncryptionVersion, Object, Permissions, StringFormat};
use tracing::info;

use crate::error::{PdfyError, Result};

const OP: &str = "Protect";

/// Passwords for [`protect_document`].
#[derive(Debug, Clone)]
pub struct ProtectOptions {
    /// Password needed to open the document.
    pub user_password: String,
    /// Password that unlocks full access; the user password when `None`.
    pub owner_password: Option<String>,
}

impl ProtectOptions {
    /// Protect with a single password.
    pub fn new(user_password: impl Into<String>) -> Self {
        Self {
            user_password: user_password.into(),
            owner_password: None,
        }
    }

    fn owner_password(&self) -> &str {
        self.owner_password
            .as_deref()
            .filter(|password| !password.is_empty())
            .unwrap_or(&self.user_password)
    }
}

/// Encrypt `doc` in place.
///
/// Streams are compressed and objects renumbered first, because the object
/// numbers feed the encryption keys. Save the result with
/// [`PdfWriter::verbatim`](crate::io::PdfWriter::verbatim).
///
/// # Errors
///
/// Returns an error if the password is empty, the document is already
/// encrypted, or encryption fails.
pub fn protect_document(doc: &mut Document, options: &ProtectOptions) -> Result<()> {
    if options.user_password.is_empty() {
        return Err(PdfyError::invalid_config("Password must not be empty"));
    }
    if doc.is_encrypted() {
        return Err(PdfyError::operation_failed(OP, "document is already encrypted"));
    }

    doc.compress();
    doc.renumber_objects();
    ensure_document_id(doc);

    let version = EncryptionVersion::V2 {
        document: doc,
        owner_password: options.owner_password(),
        user_password: &options.user_password,
        key_length: 128,
        permissions: Permissions::all(),
    };
    let state = EncryptionState::try_from(version)
        .map_err(|e| PdfyError::operation_failed(OP, e.to_string()))?;

    doc.encrypt(&state)
        .map_err(|e| PdfyError::operation_failed(OP, e.to_string()))?;

    info!("encrypted document");
    Ok(())
}

/// Give the trailer a file identifier if it has none.
fn ensure_document_id(doc: &mut Document) {
    if doc.trailer.has(b"ID") {
        return;
    }
    let id = uuid::Uuid::new_v4().as_bytes().to_vec();
    doc.trailer.set(
        "ID",
        Object::Array(vec![
            Object::String(id.clone(), StringFormat::Hexadecimal),
            Object::String(id, StringFormat::Hexadecimal),
        ]),
    );
}
