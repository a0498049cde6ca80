//! Shared helpers for the integration tests.
//!
//! Test PDFs are generated with lopdf instead of being checked in.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Build a PDF with one page per `(width, height)`, each showing "Page N".
pub fn pdf_with_sizes(sizes: &[(i64, i64)]) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });

    let mut kids: Vec<Object> = Vec::new();
    for (index, &(width, height)) in sizes.iter().enumerate() {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 18.into()]),
                Operation::new("Td", vec![40.into(), (height - 60).into()]),
                Operation::new(
                    "Tj",
                    vec![Object::string_literal(format!("Page {}", index + 1))],
                ),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
            "Contents" => content_id,
            "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// A PDF with `pages` US Letter pages.
pub fn letter_pdf(pages: usize) -> Vec<u8> {
    pdf_with_sizes(&vec![(612, 792); pages])
}

/// Write `bytes` to `dir/name` and return the path.
pub fn write_file(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

/// Reload a PDF written by a tool.
pub fn reload(path: &Path) -> Document {
    Document::load(path).unwrap()
}

/// Text of a 1-indexed page.
pub fn page_text(doc: &Document, page: u32) -> String {
    doc.extract_text(&[page]).unwrap()
}

/// Decoded content of a 1-indexed page.
pub fn page_content(doc: &Document, page: u32) -> String {
    let page_id = doc.get_pages()[&page];
    String::from_utf8_lossy(&doc.get_page_content(page_id).unwrap()).into_owned()
}

/// Stored bytes of every page content stream, with whether it has a `/Filter`.
pub fn raw_page_streams(doc: &Document) -> Vec<(Vec<u8>, bool)> {
    doc.page_iter()
        .flat_map(|page_id| doc.get_page_contents(page_id))
        .map(|id| {
            let stream = doc.get_object(id).unwrap().as_stream().unwrap();
            (stream.content.clone(), stream.dict.has(b"Filter"))
        })
        .collect()
}
