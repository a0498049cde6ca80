//! Merging and splitting through files on disk.

use pdfy::config::PageRange;
use pdfy::io::{PdfReader, PdfWriter};
use pdfy::tools::{MergeInput, MergeOptions, SplitMode, merge_files, split_document};
use tempfile::TempDir;

use crate::common::{letter_pdf, page_text, pdf_with_sizes, reload, write_file};

#[tokio::test]
async fn test_merge_keeps_order_and_page_sizes() {
    let temp_dir = TempDir::new().unwrap();
    let a = write_file(&temp_dir, "a.pdf", &letter_pdf(2));
    let b = write_file(&temp_dir, "b.pdf", &pdf_with_sizes(&[(842, 595)]));
    let output = temp_dir.path().join("merged.pdf");

    let inputs = vec![MergeInput::new(&b), MergeInput::new(&a)];
    let result = merge_files(&inputs, &MergeOptions::default()).await.unwrap();
    PdfWriter::new().save(&result.document, &output).await.unwrap();

    let merged = reload(&output);
    assert_eq!(merged.get_pages().len(), 3);
    assert!(page_text(&merged, 1).contains("Page 1"));
    assert!(page_text(&merged, 3).contains("Page 2"));

    let pages = merged.get_pages();
    let first = pdfy::pages::page_box(&merged, pages[&1]);
    let last = pdfy::pages::page_box(&merged, pages[&3]);
    assert_eq!((first.width, first.height), (842.0, 595.0));
    assert_eq!((last.width, last.height), (612.0, 792.0));
}

#[tokio::test]
async fn test_merge_many_inputs_in_parallel() {
    let temp_dir = TempDir::new().unwrap();
    let inputs: Vec<MergeInput> = (1..=6)
        .map(|n| MergeInput::new(write_file(&temp_dir, &format!("{n}.pdf"), &letter_pdf(n))))
        .collect();
    let options = MergeOptions {
        jobs: 3,
        ..Default::default()
    };

    let result = merge_files(&inputs, &options).await.unwrap();

    assert_eq!(result.statistics.files_merged, 6);
    assert_eq!(result.statistics.total_pages, 21);
    let order: Vec<_> = result.merged_files.iter().collect();
    let expected: Vec<_> = inputs.iter().map(|input| &input.path).collect();
    assert_eq!(order, expected);
}

#[tokio::test]
async fn test_split_then_merge_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_file(&temp_dir, "book.pdf", &letter_pdf(5));
    let loaded = PdfReader::new().load(&input).await.unwrap();

    let parts = split_document(&loaded.document, &SplitMode::Chunks(2)).unwrap();
    assert_eq!(parts.len(), 3);

    let mut inputs = Vec::new();
    for part in &parts {
        let path = temp_dir.path().join(format!("book-{}.pdf", part.label()));
        PdfWriter::new().save(&part.document, &path).await.unwrap();
        inputs.push(MergeInput::new(path));
    }

    let result = merge_files(&inputs, &MergeOptions::default()).await.unwrap();
    assert_eq!(result.statistics.total_pages, 5);
    for page in 1..=5 {
        assert!(page_text(&result.document, page).contains(&format!("Page {page}")));
    }
}

#[tokio::test]
async fn test_extract_pages_to_new_file() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_file(&temp_dir, "report.pdf", &letter_pdf(8));
    let loaded = PdfReader::new().load(&input).await.unwrap();

    let range = PageRange::parse("7,2").unwrap();
    let parts = split_document(&loaded.document, &SplitMode::Extract(range)).unwrap();
    let output = temp_dir.path().join("extract.pdf");
    PdfWriter::new().save(&parts[0].document, &output).await.unwrap();

    let extracted = reload(&output);
    assert_eq!(extracted.get_pages().len(), 2);
    assert!(page_text(&extracted, 1).contains("Page 2"));
    assert!(page_text(&extracted, 2).contains("Page 7"));
}
