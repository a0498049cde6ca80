//! Rotate pages.

use lopdf::Document;
use tracing::debug;

use crate::config::{PageRange, Rotation};
use crate::error::Result;
use crate::pages;

/// Rotate the pages in `range` (all pages when `None`) by `rotation`.
///
/// Rotation is added to any rotation the page already has. Returns the
/// number of pages rotated.
pub fn rotate_pages(doc: &mut Document, rotation: Rotation, range: Option<&PageRange>) -> Result<usize> {
    let total = doc.get_pages().len();
    let selected = match range {
        Some(range) => range.resolve(total)?,
        None => (1..=total as u32).collect(),
    };

    for &number in &selected {
        let page_id = pages::page_id(doc, number)?;
        pages::rotate_page(doc, page_id, rotation.as_degrees())?;
    }

    debug!(pages = selected.len(), degrees = rotation.as_degrees(), "rotated pages");
    Ok(selected.len())
}
