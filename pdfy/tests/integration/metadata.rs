//! Metadata edits survive a save and leave pages alone.

use pdfy::io::{PdfReader, PdfWriter};
use pdfy::metadata::{DocumentMetadata, parse_keywords, read_metadata, write_metadata};
use tempfile::TempDir;

use crate::common::{letter_pdf, raw_page_streams, reload, write_file};

#[tokio::test]
async fn test_metadata_round_trip_through_file() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_file(&temp_dir, "plain.pdf", &letter_pdf(2));
    let output = temp_dir.path().join("metadata-plain.pdf");

    let metadata = DocumentMetadata {
        title: Some("Quarterly Report".to_string()),
        author: Some("Zoë Ångström".to_string()),
        keywords: parse_keywords("finance, q3 , , draft"),
        producer: Some("pdfy".to_string()),
        ..Default::default()
    };

    let mut loaded = PdfReader::new().load(&input).await.unwrap();
    write_metadata(&mut loaded.document, &metadata).unwrap();
    PdfWriter::new().save(&loaded.document, &output).await.unwrap();

    let read = read_metadata(&reload(&output));
    assert_eq!(read.title.as_deref(), Some("Quarterly Report"));
    assert_eq!(read.author.as_deref(), Some("Zoë Ångström"));
    assert_eq!(read.keywords, vec!["finance", "q3", "draft"]);
    assert_eq!(read.producer.as_deref(), Some("pdfy"));
    assert_eq!(read.subject, None);
}

#[tokio::test]
async fn test_clearing_metadata_keeps_page_content() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_file(&temp_dir, "plain.pdf", &letter_pdf(3));
    let output = temp_dir.path().join("cleared.pdf");

    let mut loaded = PdfReader::new().load(&input).await.unwrap();
    let before = raw_page_streams(&loaded.document);

    write_metadata(
        &mut loaded.document,
        &DocumentMetadata {
            title: Some("Temporary".to_string()),
            ..Default::default()
        },
    )
    .unwrap();
    write_metadata(&mut loaded.document, &DocumentMetadata::default()).unwrap();
    PdfWriter::verbatim().save(&loaded.document, &output).await.unwrap();

    let saved = reload(&output);
    assert!(read_metadata(&saved).is_empty());
    let after = raw_page_streams(&saved);
    assert_eq!(before.len(), 3);
    assert!(before.iter().all(|(_, filtered)| !filtered));
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_partial_edit_keeps_other_fields() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_file(&temp_dir, "plain.pdf", &letter_pdf(1));

    let mut loaded = PdfReader::new().load(&input).await.unwrap();
    write_metadata(
        &mut loaded.document,
        &DocumentMetadata {
            title: Some("Old title".to_string()),
            author: Some("Grace".to_string()),
            ..Default::default()
        },
    )
    .unwrap();

    let edited = read_metadata(&loaded.document).merged_with(DocumentMetadata {
        title: Some("New title".to_string()),
        ..Default::default()
    });
    write_metadata(&mut loaded.document, &edited).unwrap();

    let read = read_metadata(&loaded.document);
    assert_eq!(read.title.as_deref(), Some("New title"));
    assert_eq!(read.author.as_deref(), Some("Grace"));
}
