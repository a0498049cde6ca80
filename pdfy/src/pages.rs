//! Page tree helpers shared by the tools.
//!
//! This module handles page-level operations including:
//! - Page box lookup (with inherited attributes)
//! - Page selection and appending
//! - Page rotation
//! - Drawing on top of existing page content
//! - Registering fonts and images in page resources

use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};

use crate::error::{PdfyError, Result};
use crate::geometry::Size;

const OP: &str = "Page tree";

/// Attributes a page inherits from its ancestors in the page tree.
const INHERITABLE: [&[u8]; 4] = [b"MediaBox", b"CropBox", b"Resources", b"Rotate"];

/// Fallback page box when a document has no usable MediaBox (A4).
pub const DEFAULT_PAGE_SIZE: Size = Size::new(595.0, 842.0);

/// A page's MediaBox in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageBox {
    /// Lower-left X.
    pub x: f64,
    /// Lower-left Y.
    pub y: f64,
    /// Width in points.
    pub width: f64,
    /// Height in points.
    pub height: f64,
}

impl PageBox {
    /// Width and height of the box.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Look up the object id of a 1-indexed page.
pub fn page_id(doc: &Document, page_number: u32) -> Result<ObjectId> {
    doc.get_pages().get(&page_number).copied().ok_or_else(|| {
        PdfyError::InvalidPageRange {
            range: page_number.to_string(),
            total_pages: doc.get_pages().len(),
        }
    })
}

/// MediaBox of a page, walking up the page tree for inherited boxes.
///
/// Falls back to [`DEFAULT_PAGE_SIZE`] when no box is found.
pub fn page_box(doc: &Document, page_id: ObjectId) -> PageBox {
    let fallback = PageBox {
        x: 0.0,
        y: 0.0,
        width: DEFAULT_PAGE_SIZE.width,
        height: DEFAULT_PAGE_SIZE.height,
    };

    let mut current = Some(page_id);
    while let Some(id) = current {
        let Ok(dict) = doc.get_dictionary(id) else {
            break;
        };
        if let Some(found) = media_box(doc, dict) {
            return found;
        }
        current = dict.get(b"Parent").and_then(Object::as_reference).ok();
    }

    fallback
}

fn media_box(doc: &Document, dict: &Dictionary) -> Option<PageBox> {
    let raw = dict.get(b"MediaBox").ok()?;
    let resolved = match raw {
        Object::Reference(id) => doc.get_object(*id).ok()?,
        other => other,
    };
    let arr = resolved.as_array().ok()?;
    if arr.len() != 4 {
        return None;
    }

    let llx = number(&arr[0])?;
    let lly = number(&arr[1])?;
    let urx = number(&arr[2])?;
    let ury = number(&arr[3])?;

    let width = (urx - llx).abs();
    let height = (ury - lly).abs();
    if width == 0.0 || height == 0.0 {
        return None;
    }

    Some(PageBox {
        x: llx.min(urx),
        y: lly.min(ury),
        width,
        height,
    })
}

/// Numeric value of an Integer or Real object.
pub fn number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(f) => Some(f64::from(*f)),
        _ => None,
    }
}

/// Copy inherited attributes onto the page itself.
///
/// Needed before a page is moved to another parent.
fn pin_inherited_attributes(doc: &mut Document, page_id: ObjectId) -> Result<()> {
    let mut inherited: Vec<(&[u8], Object)> = Vec::new();

    {
        let page = doc
            .get_dictionary(page_id)
            .map_err(|e| PdfyError::operation_failed(OP, format!("Failed to get page: {e}")))?;

        for key in INHERITABLE {
            if page.has(key) {
                continue;
            }
            let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
            while let Some(id) = parent {
                let Ok(node) = doc.get_dictionary(id) else {
                    break;
                };
                if let Ok(value) = node.get(key) {
                    inherited.push((key, value.clone()));
                    break;
                }
                parent = node.get(b"Parent").and_then(Object::as_reference).ok();
            }
        }
    }

    if inherited.is_empty() {
        return Ok(());
    }

    let page = page_dict_mut(doc, page_id)?;
    for (key, value) in inherited {
        page.set(key, value);
    }
    Ok(())
}

fn page_dict_mut(doc: &mut Document, page_id: ObjectId) -> Result<&mut Dictionary> {
    doc.get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(|e| PdfyError::operation_failed(OP, format!("Page object is not a dictionary: {e}")))
}

fn root_pages_id(doc: &Document) -> Result<ObjectId> {
    doc.catalog()
        .and_then(|catalog| catalog.get(b"Pages"))
        .and_then(Object::as_reference)
        .map_err(|e| PdfyError::operation_failed(OP, format!("Failed to get pages reference: {e}")))
}

/// Replace the page tree with a flat list of `page_ids`, in order.
///
/// Pages must already belong to `doc`. Pages left out of the list are no
/// longer reachable; call [`Document::prune_objects`] to drop them.
pub fn set_page_tree(doc: &mut Document, page_ids: &[ObjectId]) -> Result<()> {
    let pages_id = root_pages_id(doc)?;

    for &page_id in page_ids {
        pin_inherited_attributes(doc, page_id)?;
        page_dict_mut(doc, page_id)?.set("Parent", pages_id);
    }

    let pages = doc
        .get_object_mut(pages_id)
        .and_then(Object::as_dict_mut)
        .map_err(|e| PdfyError::operation_failed(OP, format!("Failed to get pages object: {e}")))?;

    let kids: Vec<Object> = page_ids.iter().map(|&id| Object::Reference(id)).collect();
    pages.set("Kids", Object::Array(kids));
    pages.set("Count", Object::Integer(page_ids.len() as i64));

    Ok(())
}

/// Build a new document holding only `page_numbers` (1-indexed), in order.
pub fn select_pages(doc: &Document, page_numbers: &[u32]) -> Result<Document> {
    let all_pages = doc.get_pages();

    let mut page_ids = Vec::with_capacity(page_numbers.len());
    for number in page_numbers {
        let id = all_pages
            .get(number)
            .copied()
            .ok_or_else(|| PdfyError::InvalidPageRange {
                range: number.to_string(),
                total_pages: all_pages.len(),
            })?;
        page_ids.push(id);
    }

    if page_ids.is_empty() {
        return Err(PdfyError::operation_failed(OP, "No pages selected"));
    }

    let mut selected = doc.clone();
    set_page_tree(&mut selected, &page_ids)?;
    selected.prune_objects();
    Ok(selected)
}

/// Append all pages of `source` to the end of `target`.
///
/// Objects of `source` are renumbered above `target.max_id` first.
pub fn append_document(target: &mut Document, mut source: Document) -> Result<usize> {
    source.renumber_objects_with(target.max_id + 1);

    let source_pages: Vec<ObjectId> = source.get_pages().into_values().collect();
    for &page_id in &source_pages {
        pin_inherited_attributes(&mut source, page_id)?;
    }

    target.max_id = target.max_id.max(source.max_id);
    target.objects.extend(source.objects);

    let mut page_ids: Vec<ObjectId> = target.get_pages().into_values().collect();
    page_ids.extend(&source_pages);
    set_page_tree(target, &page_ids)?;

    Ok(source_pages.len())
}

/// Add `degrees` to a page's rotation, modulo 360.
pub fn rotate_page(doc: &mut Document, page_id: ObjectId, degrees: i64) -> Result<()> {
    pin_inherited_attributes(doc, page_id)?;
    let page = page_dict_mut(doc, page_id)?;

    let current_rotation = page.get(b"Rotate").and_then(Object::as_i64).unwrap_or(0);
    let new_rotation = (current_rotation + degrees).rem_euclid(360);
    page.set("Rotate", Object::Integer(new_rotation));

    Ok(())
}

/// Current rotation of a page in degrees.
pub fn page_rotation(doc: &Document, page_id: ObjectId) -> i64 {
    doc.get_dictionary(page_id)
        .and_then(|page| page.get(b"Rotate"))
        .and_then(Object::as_i64)
        .unwrap_or(0)
}

/// Draw `content` on top of a page.
///
/// The existing content is wrapped in `q`/`Q` so a graphics state it leaves
/// behind cannot shift the new drawing.
pub fn overlay_content(doc: &mut Document, page_id: ObjectId, content: Vec<u8>) -> Result<()> {
    let open_id = doc.add_object(Stream::new(dictionary! {}, b"q\n".to_vec()));

    let mut overlay = b"\nQ\n".to_vec();
    overlay.extend(content);
    let overlay_id = doc.add_object(Stream::new(dictionary! {}, overlay));

    let page = page_dict_mut(doc, page_id)?;
    let mut contents = match page.get(b"Contents") {
        Ok(Object::Reference(id)) => vec![Object::Reference(*id)],
        Ok(Object::Array(items)) => items.clone(),
        _ => Vec::new(),
    };
    contents.insert(0, Object::Reference(open_id));
    contents.push(Object::Reference(overlay_id));
    page.set("Contents", Object::Array(contents));

    Ok(())
}

/// Register `object_id` as `/<name>` in the page's `category` resources
/// (`Font`, `XObject`, `ExtGState`).
pub fn add_resource(
    doc: &mut Document,
    page_id: ObjectId,
    category: &str,
    name: &str,
    object_id: ObjectId,
) -> Result<()> {
    pin_inherited_attributes(doc, page_id)?;

    let resources = {
        let page = page_dict_mut(doc, page_id)?;
        page.remove(b"Resources")
            .unwrap_or_else(|| Object::Dictionary(Dictionary::new()))
    };

    // Shared resource dictionaries are copied so other pages keep theirs.
    let mut resources = match resources {
        Object::Reference(id) => doc
            .get_dictionary(id)
            .cloned()
            .map_err(|e| PdfyError::operation_failed(OP, format!("Invalid resources: {e}")))?,
        Object::Dictionary(dict) => dict,
        _ => return Err(PdfyError::operation_failed(OP, "Resources is not a dictionary")),
    };

    let mut entries = match resources.remove(category.as_bytes()) {
        Some(Object::Reference(id)) => doc.get_dictionary(id).cloned().unwrap_or_default(),
        Some(Object::Dictionary(dict)) => dict,
        _ => Dictionary::new(),
    };
    entries.set(name, object_id);
    resources.set(category, entries);

    page_dict_mut(doc, page_id)?.set("Resources", resources);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;

    #[test]
    fn test_page_box_from_media_box() {
        let doc = test_support::document_with_sizes(&[(612.0, 792.0), (842.0, 595.0)]);
        let pages = doc.get_pages();

        assert_eq!(page_box(&doc, pages[&1]).size(), Size::new(612.0, 792.0));
        assert_eq!(page_box(&doc, pages[&2]).size(), Size::new(842.0, 595.0));
    }

    #[test]
    fn test_page_box_inherited_and_fallback() {
        let mut doc = test_support::sample_document(1);
        let page = doc.get_pages()[&1];
        let pages_id = root_pages_id(&doc).unwrap();

        let media_box = doc
            .get_object_mut(page)
            .unwrap()
            .as_dict_mut()
            .unwrap()
            .remove(b"MediaBox")
            .unwrap();
        assert_eq!(page_box(&doc, page).size(), DEFAULT_PAGE_SIZE);

        doc.get_object_mut(pages_id)
            .unwrap()
            .as_dict_mut()
            .unwrap()
            .set("MediaBox", media_box);
        assert_eq!(page_box(&doc, page).size(), Size::new(612.0, 792.0));
    }

    #[test]
    fn test_page_box_with_origin() {
        let mut doc = test_support::sample_document(1);
        let page = doc.get_pages()[&1];
        doc.get_object_mut(page)
            .unwrap()
            .as_dict_mut()
            .unwrap()
            .set(
                "MediaBox",
                vec![10.into(), 20.into(), 310.into(), 420.into()],
            );

        let found = page_box(&doc, page);
        assert_eq!((found.x, found.y), (10.0, 20.0));
        assert_eq!(found.size(), Size::new(300.0, 400.0));
    }

    #[test]
    fn test_select_pages() {
        let doc = test_support::sample_document(10);
        let selected = select_pages(&doc, &[3, 1, 7]).unwrap();

        assert_eq!(selected.get_pages().len(), 3);
        let text = selected.extract_text(&[1]).unwrap();
        assert!(text.contains("Page 3"));
    }

    #[test]
    fn test_select_pages_out_of_range() {
        let doc = test_support::sample_document(2);
        let err = select_pages(&doc, &[1, 5]).unwrap_err();
        assert!(matches!(err, PdfyError::InvalidPageRange { total_pages: 2, .. }));
    }

    #[test]
    fn test_append_document() {
        let mut target = test_support::sample_document(2);
        let source = test_support::sample_document(3);

        let added = append_document(&mut target, source).unwrap();

        assert_eq!(added, 3);
        assert_eq!(target.get_pages().len(), 5);
        let text = target.extract_text(&[3]).unwrap();
        assert!(text.contains("Page 1"));
    }

    #[test]
    fn test_rotate_page_wraps() {
        let mut doc = test_support::sample_document(1);
        let page = doc.get_pages()[&1];

        rotate_page(&mut doc, page, 270).unwrap();
        rotate_page(&mut doc, page, 180).unwrap();
        assert_eq!(page_rotation(&doc, page), 90);

        rotate_page(&mut doc, page, -90).unwrap();
        assert_eq!(page_rotation(&doc, page), 0);
    }

    #[test]
    fn test_overlay_content_keeps_original() {
        let mut doc = test_support::sample_document(1);
        let page = doc.get_pages()[&1];

        overlay_content(&mut doc, page, b"BT ET".to_vec()).unwrap();

        let content = doc.get_page_content(page).unwrap();
        let text = String::from_utf8_lossy(&content);
        assert!(text.starts_with("q\n"));
        assert!(text.contains("(Page 1)"));
        assert!(text.ends_with("Q\nBT ET"));
    }

    #[test]
    fn test_add_resource_does_not_touch_shared_dictionary() {
        let mut doc = test_support::sample_document(2);
        let pages = doc.get_pages();
        let font_id = doc.add_object(dictionary! { "Type" => "Font" });

        add_resource(&mut doc, pages[&1], "Font", "Extra", font_id).unwrap();

        let first = doc.get_dictionary(pages[&1]).unwrap();
        let fonts = first
            .get(b"Resources")
            .and_then(Object::as_dict)
            .and_then(|r| r.get(b"Font"))
            .and_then(Object::as_dict)
            .unwrap();
        assert!(fonts.has(b"F1"));
        assert!(fonts.has(b"Extra"));

        // Page 2 still points at the untouched shared dictionary.
        let second = doc.get_dictionary(pages[&2]).unwrap();
        let shared_id = second.get(b"Resources").and_then(Object::as_reference).unwrap();
        let shared_fonts = doc
            .get_dictionary(shared_id)
            .and_then(|r| r.get(b"Font"))
            .and_then(Object::as_dict)
            .unwrap();
        assert!(!shared_fonts.has(b"Extra"));
    }
}
