//! Tools that rewrite pages in place, chained the way the CLI runs them.

use pdfy::PdfyError;
use pdfy::config::{CompressionLevel, PageRange, Rotation};
use pdfy::io::{PdfReader, PdfWriter};
use pdfy::pages::{page_id, page_rotation};
use pdfy::tools::{
    NumberFormat, NumberPosition, PageNumberOptions, ProtectOptions, WatermarkOptions,
    add_page_numbers, add_watermark, compress_document, extract_text, protect_document,
    rotate_pages, unlock_pdf,
};
use tempfile::TempDir;

use crate::common::{letter_pdf, page_content, page_text, reload, write_file};

#[tokio::test]
async fn test_number_then_watermark_then_save() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_file(&temp_dir, "doc.pdf", &letter_pdf(3));
    let output = temp_dir.path().join("stamped.pdf");

    let mut loaded = PdfReader::new().load(&input).await.unwrap();
    let numbered = add_page_numbers(
        &mut loaded.document,
        &PageNumberOptions {
            format: NumberFormat::PageNumberOfTotal,
            position: NumberPosition::TopRight,
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(numbered, 3);

    let mut watermark = WatermarkOptions::new("CONFIDENTIAL");
    watermark.pages = Some(PageRange::parse("2").unwrap());
    assert_eq!(add_watermark(&mut loaded.document, &watermark).unwrap(), 1);

    PdfWriter::new().save(&loaded.document, &output).await.unwrap();

    let saved = reload(&output);
    for page in 1..=3 {
        let text = page_text(&saved, page);
        assert!(text.contains(&format!("Page {page}")));
        assert!(text.contains(&format!("Page {page} of 3")));
    }
    assert!(page_text(&saved, 2).contains("CONFIDENTIAL"));
    assert!(!page_text(&saved, 1).contains("CONFIDENTIAL"));
    assert!(page_content(&saved, 2).contains("/PdfyWmGs gs"));
}

#[tokio::test]
async fn test_rotate_and_compress_survive_save() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_file(&temp_dir, "doc.pdf", &letter_pdf(4));
    let output = temp_dir.path().join("rotated.pdf");

    let mut loaded = PdfReader::new().load(&input).await.unwrap();
    let range = PageRange::parse("2-3").unwrap();
    rotate_pages(&mut loaded.document, Rotation::Clockwise90, Some(&range)).unwrap();
    let report = compress_document(&mut loaded.document, CompressionLevel::Maximum).unwrap();
    assert!(report.objects_after <= report.objects_before);

    PdfWriter::new().save(&loaded.document, &output).await.unwrap();

    let saved = reload(&output);
    let rotations: Vec<i64> = (1..=4)
        .map(|n| page_rotation(&saved, page_id(&saved, n).unwrap()))
        .collect();
    assert_eq!(rotations, vec![0, 90, 90, 0]);
    assert!(page_text(&saved, 3).contains("Page 3"));
}

#[tokio::test]
async fn test_extract_text_from_saved_file() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_file(&temp_dir, "doc.pdf", &letter_pdf(3));

    let loaded = PdfReader::new().load(&input).await.unwrap();
    let all = extract_text(&loaded.document, None).unwrap();
    let pages: Vec<&str> = all.split("\n\n").collect();
    assert_eq!(pages.len(), 3);
    assert!(pages[0].contains("Page 1"));
    assert!(pages[2].contains("Page 3"));

    let range = PageRange::parse("2").unwrap();
    let second = extract_text(&loaded.document, Some(&range)).unwrap();
    assert!(second.contains("Page 2"));
    assert!(!second.contains("Page 1"));
}

#[tokio::test]
async fn test_protected_file_is_encrypted_on_disk() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_file(&temp_dir, "doc.pdf", &letter_pdf(2));
    let output = temp_dir.path().join("protected-doc.pdf");

    let mut loaded = PdfReader::new().load(&input).await.unwrap();
    protect_document(&mut loaded.document, &ProtectOptions::new("s3cret")).unwrap();
    PdfWriter::verbatim()
        .save(&loaded.document, &output)
        .await
        .unwrap();

    let bytes = std::fs::read(&output).unwrap();
    let raw = String::from_utf8_lossy(&bytes);
    assert!(raw.contains("/Encrypt"));
    assert!(raw.contains("/Standard"));
    assert!(!raw.contains("Page 1"));

    let err = PdfReader::new().load(&output).await.unwrap_err();
    assert!(matches!(err, PdfyError::EncryptedPdf { .. }));
}

#[tokio::test]
async fn test_unlock_restores_a_loadable_file() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_file(&temp_dir, "doc.pdf", &letter_pdf(3));
    let protected = temp_dir.path().join("protected-doc.pdf");
    let unlocked = temp_dir.path().join("unlocked-doc.pdf");

    let mut loaded = PdfReader::new().load(&input).await.unwrap();
    protect_document(&mut loaded.document, &ProtectOptions::new("s3cret")).unwrap();
    PdfWriter::verbatim()
        .save(&loaded.document, &protected)
        .await
        .unwrap();

    let bytes = PdfReader::new().read(&protected).await.unwrap();
    let err = unlock_pdf(&bytes, &protected, "wrong").unwrap_err();
    assert!(matches!(err, PdfyError::IncorrectPassword { .. }));
    assert_eq!(err.exit_code(), 3);

    let doc = unlock_pdf(&bytes, &protected, "s3cret").unwrap();
    PdfWriter::new().save(&doc, &unlocked).await.unwrap();

    let reopened = PdfReader::new().load(&unlocked).await.unwrap();
    assert_eq!(reopened.page_count, 3);
    assert!(page_text(&reopened.document, 3).contains("Page 3"));
}
