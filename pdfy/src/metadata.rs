//! PDF metadata management.
//!
//! Reads and writes the document information dictionary:
//! - Title, Author, Subject, Keywords
//! - Creator, Producer
//! - Modification date (stamped on every write)

use chrono::{DateTime, Utc};
use lopdf::{Dictionary, Document, Object, ObjectId, StringFormat};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PdfyError, Result};
use crate::text::{encode_text_string, get_text};

const OP: &str = "Update metadata";

/// Editable document properties.
///
/// Every field is optional. `None` (or an empty string) clears the entry
/// when written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    /// Document title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Person or organisation that wrote the document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// What the document is about.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// Search keywords.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,

    /// Application that created the original content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,

    /// Application that produced the PDF.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub producer: Option<String>,
}

impl DocumentMetadata {
    /// Check if no field carries a value.
    pub fn is_empty(&self) -> bool {
        [
            &self.title,
            &self.author,
            &self.subject,
            &self.creator,
            &self.producer,
        ]
        .iter()
        .all(|field| field.as_deref().is_none_or(str::is_empty))
            && self.keywords.is_empty()
    }

    /// Overlay the fields set in `changes` onto `self`.
    ///
    /// Used by the CLI to edit some fields and keep the rest.
    pub fn merged_with(mut self, changes: DocumentMetadata) -> Self {
        macro_rules! take {
            ($($field:ident),*) => {
                $(if changes.$field.is_some() {
                    self.$field = changes.$field;
                })*
            };
        }
        take!(title, author, subject, creator, producer);
        if !changes.keywords.is_empty() {
            self.keywords = changes.keywords;
        }
        self
    }
}

/// Split a comma separated keyword input into trimmed, non-empty keywords.
///
/// # Examples
///
/// ```
/// use pdfy::metadata::parse_keywords;
///
/// assert_eq!(parse_keywords("a, b ,c"), vec!["a", "b", "c"]);
/// assert!(parse_keywords(" , ").is_empty());
/// ```
pub fn parse_keywords(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|keyword| !keyword.is_empty())
        .map(str::to_string)
        .collect()
}

fn info_dictionary(doc: &Document) -> Option<&Dictionary> {
    match doc.trailer.get(b"Info").ok()? {
        Object::Reference(id) => doc.get_dictionary(*id).ok(),
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    }
}

/// Read the metadata of a document.
///
/// A document without an information dictionary yields empty metadata.
pub fn read_metadata(doc: &Document) -> DocumentMetadata {
    let Some(info) = info_dictionary(doc) else {
        return DocumentMetadata::default();
    };

    let field = |key: &[u8]| get_text(info, key).filter(|value| !value.is_empty());

    DocumentMetadata {
        title: field(b"Title"),
        author: field(b"Author"),
        subject: field(b"Subject"),
        keywords: field(b"Keywords")
            .map(|keywords| parse_keywords(&keywords))
            .unwrap_or_default(),
        creator: field(b"Creator"),
        producer: field(b"Producer"),
    }
}

/// Write `metadata` into the document's information dictionary.
///
/// Only the information dictionary is touched; page content is left
/// byte-for-byte as it was.
pub fn write_metadata(doc: &mut Document, metadata: &DocumentMetadata) -> Result<()> {
    let info_id = ensure_info_dictionary(doc)?;

    let info = doc
        .get_object_mut(info_id)
        .and_then(Object::as_dict_mut)
        .map_err(|e| PdfyError::operation_failed(OP, format!("Info is not a dictionary: {e}")))?;

    let keywords = metadata.keywords.join(", ");
    let entries: [(&str, Option<&str>); 6] = [
        ("Title", metadata.title.as_deref()),
        ("Author", metadata.author.as_deref()),
        ("Subject", metadata.subject.as_deref()),
        ("Keywords", Some(keywords.as_str())),
        ("Creator", metadata.creator.as_deref()),
        ("Producer", metadata.producer.as_deref()),
    ];

    for (key, value) in entries {
        match value.map(str::trim) {
            Some(value) if !value.is_empty() => info.set(key, encode_text_string(value)),
            _ => {
                info.remove(key.as_bytes());
            }
        }
    }

    info.set(
        "ModDate",
        Object::String(
            format_pdf_date(Utc::now()).into_bytes(),
            StringFormat::Literal,
        ),
    );

    debug!(?metadata, "wrote document metadata");
    Ok(())
}

/// Id of the information dictionary, creating one if needed.
///
/// An inline dictionary in the trailer is moved into its own object.
fn ensure_info_dictionary(doc: &mut Document) -> Result<ObjectId> {
    match doc.trailer.get(b"Info") {
        Ok(Object::Reference(id)) if doc.get_dictionary(*id).is_ok() => return Ok(*id),
        Ok(Object::Dictionary(dict)) => {
            let dict = dict.clone();
            let id = doc.add_object(dict);
            doc.trailer.set("Info", id);
            return Ok(id);
        }
        _ => {}
    }

    let id = doc.add_object(Dictionary::new());
    doc.trailer.set("Info", id);
    Ok(id)
}

/// Format a UTC timestamp as a PDF date string.
///
/// PDF date format: `D:YYYYMMDDHHmmSSZ`
pub fn format_pdf_date(time: DateTime<Utc>) -> String {
    time.format("D:%Y%m%d%H%M%SZ").to_string()
}
