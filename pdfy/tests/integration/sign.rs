//! Signing files end to end: load, place, draw, save, reload.

use base64::Engine as _;
use image::{ImageFormat, Rgba, RgbaImage};
use pdfy::geometry::Size;
use pdfy::io::{PdfReader, PdfWriter};
use pdfy::tools::{SignatureImage, SignaturePlacements, SignatureSource, apply_signatures};
use std::io::Cursor;
use tempfile::TempDir;

use crate::common::{page_content, page_text, pdf_with_sizes, reload, write_file};

fn signature_png() -> Vec<u8> {
    let img = RgbaImage::from_fn(30, 12, |x, _| {
        if x % 2 == 0 {
            Rgba([0, 0, 0, 255])
        } else {
            Rgba([255, 255, 255, 0])
        }
    });
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

/// Operands of every `cm` operator that positions a signature image.
fn image_matrices(content: &str) -> Vec<Vec<f64>> {
    let lines: Vec<&str> = content.lines().map(str::trim).collect();
    lines
        .windows(2)
        .filter(|pair| pair[0].ends_with(" cm") && pair[1].starts_with("/PdfySig"))
        .map(|pair| {
            pair[0]
                .split_whitespace()
                .take(6)
                .map(|n| n.parse().unwrap())
                .collect()
        })
        .collect()
}

fn assert_close(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len());
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 0.01, "{actual:?} != {expected:?}");
    }
}

#[tokio::test]
async fn test_sign_maps_click_to_true_page_size() {
    let temp_dir = TempDir::new().unwrap();
    // Letter portrait, then A4 landscape.
    let input = write_file(&temp_dir, "mixed.pdf", &pdf_with_sizes(&[(612, 792), (842, 595)]));
    let output = temp_dir.path().join("signed-mixed.pdf");

    // Page 2 rendered at half size; click in its centre.
    let mut placements = SignaturePlacements::new();
    placements
        .place(1, 210.5, 148.75, Size::new(421.0, 297.5))
        .unwrap();

    let mut loaded = PdfReader::new().load(&input).await.unwrap();
    let signature = SignatureSource::Image(SignatureImage::from_bytes(&signature_png()).unwrap());
    let drawn = apply_signatures(&mut loaded.document, &signature, &placements).unwrap();
    assert_eq!(drawn, 1);
    PdfWriter::new().save(&loaded.document, &output).await.unwrap();

    let signed = reload(&output);
    assert!(image_matrices(&page_content(&signed, 1)).is_empty());

    let matrices = image_matrices(&page_content(&signed, 2));
    assert_eq!(matrices.len(), 1);
    // 150x60 px at half scale becomes 300x120 pt, centred on (421, 297.5).
    assert_close(&matrices[0], &[300.0, 0.0, 0.0, 120.0, 271.0, 237.5]);
}

#[tokio::test]
async fn test_sign_top_left_click_lands_at_top_of_page() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_file(&temp_dir, "letter.pdf", &pdf_with_sizes(&[(612, 792)]));

    // Rendered at 1:1, click near the top-left corner; clamped onto the page.
    let mut placements = SignaturePlacements::new();
    placements.place(0, 10.0, 10.0, Size::new(612.0, 792.0)).unwrap();

    let mut loaded = PdfReader::new().load(&input).await.unwrap();
    let signature = SignatureSource::Image(SignatureImage::from_bytes(&signature_png()).unwrap());
    apply_signatures(&mut loaded.document, &signature, &placements).unwrap();

    let matrices = image_matrices(&page_content(&loaded.document, 1));
    assert_close(&matrices[0], &[150.0, 0.0, 0.0, 60.0, 0.0, 732.0]);
}

#[tokio::test]
async fn test_sign_with_data_url_and_typed_name() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_file(&temp_dir, "doc.pdf", &pdf_with_sizes(&[(612, 792), (612, 792)]));

    let url = format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(signature_png())
    );
    let drawn_image = SignatureSource::Image(SignatureImage::from_data_url(&url).unwrap());
    let typed = SignatureSource::typed("Ada Lovelace").unwrap();

    let mut placements = SignaturePlacements::new();
    placements.place(0, 300.0, 600.0, Size::new(612.0, 792.0)).unwrap();
    placements.place(1, 300.0, 600.0, Size::new(612.0, 792.0)).unwrap();

    let mut loaded = PdfReader::new().load(&input).await.unwrap();
    apply_signatures(&mut loaded.document, &drawn_image, &placements).unwrap();
    apply_signatures(&mut loaded.document, &typed, &placements).unwrap();

    let output = temp_dir.path().join("signed.pdf");
    PdfWriter::new().save(&loaded.document, &output).await.unwrap();

    let signed = reload(&output);
    for page in [1, 2] {
        assert!(page_text(&signed, page).contains("Ada Lovelace"));
        assert!(page_text(&signed, page).contains(&format!("Page {page}")));
        assert_eq!(image_matrices(&page_content(&signed, page)).len(), 1);
    }
}

#[test]
fn test_placements_json_and_removal() {
    let json = r#"[
        { "page": 1, "x": 100, "y": 100, "renderedWidth": 612, "renderedHeight": 792 },
        { "page": 1, "x": 300, "y": 300, "renderedWidth": 612, "renderedHeight": 792 },
        { "page": 2, "x": 500, "y": 500, "renderedWidth": 612, "renderedHeight": 792 }
    ]"#;
    let mut placements = SignaturePlacements::from_json(json).unwrap();
    let ids: Vec<u64> = placements.iter().map(|p| p.id).collect();

    placements.remove(ids[1]).unwrap();

    let left: Vec<u64> = placements.iter().map(|p| p.id).collect();
    assert_eq!(left, vec![ids[0], ids[2]]);
}
