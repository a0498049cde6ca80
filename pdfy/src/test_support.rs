//! Documents built in memory for unit tests.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, dictionary};

/// US Letter page size in points.
pub const LETTER: (f32, f32) = (612.0, 792.0);

/// Build a document with `pages` Letter-sized pages, each showing "Page N".
pub fn sample_document(pages: u32) -> Document {
    let sizes = vec![LETTER; pages as usize];
    document_with_sizes(&sizes)
}

/// Build a document with one page per entry in `sizes`.
pub fn document_with_sizes(sizes: &[(f32, f32)]) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for (index, (width, height)) in sizes.iter().enumerate() {
        let page_id = add_text_page(
            &mut doc,
            pages_id,
            resources_id,
            *width,
            *height,
            &format!("Page {}", index + 1),
        );
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
    doc
}

fn add_text_page(
    doc: &mut Document,
    pages_id: ObjectId,
    resources_id: ObjectId,
    width: f32,
    height: f32,
    text: &str,
) -> ObjectId {
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 24.into()]),
            Operation::new("Td", vec![72.into(), 700.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ],
    };
    let bytes = content.encode().unwrap_or_default();
    let content_id = doc.add_object(Stream::new(dictionary! {}, bytes));

    doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
        "Contents" => content_id,
        "Resources" => resources_id,
    })
}

/// Serialize a document the way a user's file would look on disk.
pub fn to_bytes(doc: &mut Document) -> Vec<u8> {
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// Serialized form of [`sample_document`].
pub fn sample_bytes(pages: u32) -> Vec<u8> {
    to_bytes(&mut sample_document(pages))
}

/// Raw bytes of every content stream, keyed by page number.
pub fn page_contents(doc: &Document) -> Vec<(u32, Vec<u8>)> {
    doc.get_pages()
        .into_iter()
        .map(|(number, page_id)| (number, doc.get_page_content(page_id).unwrap()))
        .collect()
}
