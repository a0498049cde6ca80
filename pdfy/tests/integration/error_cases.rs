//! Inputs the tools must refuse, and what they report.

use pdfy::PdfyError;
use pdfy::config::PageRange;
use pdfy::geometry::Size;
use pdfy::io::PdfReader;
use pdfy::tools::{
    MergeInput, MergeOptions, SignaturePlacements, SignatureSource, SplitMode, apply_signatures,
    merge_files, split_document,
};
use tempfile::TempDir;

use crate::common::{letter_pdf, write_file};

#[tokio::test]
async fn test_text_file_is_rejected_by_name() {
    let temp_dir = TempDir::new().unwrap();
    // Valid PDF bytes behind the wrong extension.
    let path = write_file(&temp_dir, "notes.txt", &letter_pdf(1));

    let err = PdfReader::new().load(&path).await.unwrap_err();
    assert!(matches!(err, PdfyError::NotAPdf { .. }));
    assert_eq!(err.exit_code(), 3);
}

#[tokio::test]
async fn test_renamed_file_is_rejected_by_header() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_file(&temp_dir, "photo.pdf", b"\x89PNG\r\n\x1a\nnot a pdf at all");

    let err = PdfReader::new().load(&path).await.unwrap_err();
    assert!(matches!(err, PdfyError::NotAPdf { .. }));
}

#[tokio::test]
async fn test_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let err = PdfReader::new()
        .load(&temp_dir.path().join("absent.pdf"))
        .await
        .unwrap_err();
    assert!(matches!(err, PdfyError::FileNotFound { .. }));
    assert_eq!(err.exit_code(), 2);
}

#[tokio::test]
async fn test_truncated_pdf_fails_to_load() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_file(&temp_dir, "broken.pdf", b"%PDF-1.7\n1 0 obj\n<< /Type");

    let err = PdfReader::new().load(&path).await.unwrap_err();
    assert_eq!(err.exit_code(), 3);
}

#[tokio::test]
async fn test_merge_skips_bad_input_only_when_asked() {
    let temp_dir = TempDir::new().unwrap();
    let good = write_file(&temp_dir, "good.pdf", &letter_pdf(2));
    let bad = write_file(&temp_dir, "bad.pdf", b"%PDF-1.7\ngarbage");
    let inputs = vec![MergeInput::new(&good), MergeInput::new(&bad)];

    assert!(merge_files(&inputs, &MergeOptions::default()).await.is_err());

    let options = MergeOptions {
        continue_on_error: true,
        ..Default::default()
    };
    let result = merge_files(&inputs, &options).await.unwrap();
    assert_eq!(result.statistics.files_merged, 1);
    assert_eq!(result.statistics.total_pages, 2);
    assert_eq!(result.skipped.len(), 1);
    assert_eq!(result.skipped[0].0, bad);
}

#[tokio::test]
async fn test_page_range_past_the_end() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_file(&temp_dir, "short.pdf", &letter_pdf(3));
    let loaded = PdfReader::new().load(&path).await.unwrap();

    let mode = SplitMode::Ranges(vec![PageRange::parse("1-2").unwrap(), PageRange::parse("3-9").unwrap()]);
    let err = split_document(&loaded.document, &mode).unwrap_err();
    assert!(matches!(err, PdfyError::InvalidPageRange { .. }));
}

#[tokio::test]
async fn test_placement_on_missing_page_leaves_document_untouched() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_file(&temp_dir, "two.pdf", &letter_pdf(2));
    let mut loaded = PdfReader::new().load(&path).await.unwrap();
    let objects_before = loaded.document.objects.len();

    let mut placements = SignaturePlacements::new();
    placements.place(0, 100.0, 100.0, Size::new(612.0, 792.0)).unwrap();
    placements.place(5, 100.0, 100.0, Size::new(612.0, 792.0)).unwrap();

    let signature = SignatureSource::typed("Ada").unwrap();
    let err = apply_signatures(&mut loaded.document, &signature, &placements).unwrap_err();
    assert!(matches!(err, PdfyError::InvalidPlacement { .. }));
    assert_eq!(loaded.document.objects.len(), objects_before);
}
