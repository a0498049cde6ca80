//! Stamp a translucent text watermark across every page.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, dictionary};
use std::f64::consts::FRAC_1_SQRT_2;
use tracing::info;

use crate::config::PageRange;
use crate::error::{PdfyError, Result};
use crate::pages;
use crate::text::{StandardFont, show_text_operand};

const OP: &str = "Add watermark";
const GRAPHICS_STATE: &str = "PdfyWmGs";

/// Options for [`add_watermark`].
#[derive(Debug, Clone)]
pub struct WatermarkOptions {
    /// Text to stamp.
    pub text: String,
    /// Font size in points.
    pub font_size: f64,
    /// Opacity between 0 (invisible) and 1 (opaque).
    pub opacity: f64,
    /// Run the text corner to corner at 45 degrees.
    pub diagonal: bool,
    /// Pages to stamp; all when `None`.
    pub pages: Option<PageRange>,
}

impl WatermarkOptions {
    /// Defaults for `text`: 48pt, 30% opacity, diagonal.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font_size: 48.0,
            opacity: 0.3,
            diagonal: true,
            pages: None,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.text.trim().is_empty() {
            return Err(PdfyError::invalid_config("Watermark text must not be empty"));
        }
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(PdfyError::invalid_config("Font size must be positive"));
        }
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(PdfyError::invalid_config("Opacity must be between 0 and 1"));
        }
        Ok(())
    }
}

fn real(value: f64) -> Object {
    Object::Real(value as f32)
}

/// Stamp the watermark centred on each selected page.
///
/// Returns the number of pages stamped.
pub fn add_watermark(doc: &mut Document, options: &WatermarkOptions) -> Result<usize> {
    options.validate()?;

    let page_ids = doc.get_pages();
    let total = page_ids.len();
    let selected = match &options.pages {
        Some(range) => range.resolve(total)?,
        None => (1..=total as u32).collect(),
    };

    let font = StandardFont::HelveticaBold;
    let font_id = font.add_to(doc);
    let gs_id = doc.add_object(dictionary! {
        "Type" => "ExtGState",
        "ca" => real(options.opacity),
        "CA" => real(options.opacity),
    });

    let text = options.text.trim();
    let width = font.text_width(text, options.font_size);
    let (cos, sin) = if options.diagonal {
        (FRAC_1_SQRT_2, FRAC_1_SQRT_2)
    } else {
        (1.0, 0.0)
    };

    for &number in &selected {
        let page_id = page_ids[&number];
        let page_box = pages::page_box(doc, page_id);
        let cx = page_box.x + page_box.width / 2.0;
        let cy = page_box.y + page_box.height / 2.0;

        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new("gs", vec![GRAPHICS_STATE.into()]),
                Operation::new(
                    "cm",
                    vec![real(cos), real(sin), real(-sin), real(cos), real(cx), real(cy)],
                ),
                Operation::new("BT", vec![]),
                Operation::new(
                    "Tf",
                    vec![font.resource_name().into(), real(options.font_size)],
                ),
                Operation::new("g", vec![real(0.5)]),
                Operation::new(
                    "Td",
                    vec![real(-width / 2.0), real(-options.font_size / 3.0)],
                ),
                Operation::new("Tj", vec![show_text_operand(text)]),
                Operation::new("ET", vec![]),
                Operation::new("Q", vec![]),
            ],
        }
        .encode()
        .map_err(|e| PdfyError::operation_failed(OP, e.to_string()))?;

        pages::add_resource(doc, page_id, "Font", font.resource_name(), font_id)?;
        pages::add_resource(doc, page_id, "ExtGState", GRAPHICS_STATE, gs_id)?;
        pages::overlay_content(doc, page_id, content)?;
    }

    info!(pages = selected.len(), text, "added watermark");
    Ok(selected.len())
}
