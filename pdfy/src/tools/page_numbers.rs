//! Stamp page numbers onto pages.

use lopdf::Document;
use lopdf::content::{Content, Operation};
use std::fmt;
use std::str::FromStr;
use tracing::info;

use crate::config::PageRange;
use crate::error::{PdfyError, Result};
use crate::pages::{self, PageBox};
use crate::text::{StandardFont, show_text_operand};

const OP: &str = "Add page numbers";

/// Where on the page the number goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberPosition {
    /// Top edge, left aligned.
    TopLeft,
    /// Top edge, centred.
    TopCenter,
    /// Top edge, right aligned.
    TopRight,
    /// Bottom edge, left aligned.
    BottomLeft,
    /// Bottom edge, centred.
    #[default]
    BottomCenter,
    /// Bottom edge, right aligned.
    BottomRight,
}

impl NumberPosition {
    const ALL: [(Self, &'static str); 6] = [
        (Self::TopLeft, "top-left"),
        (Self::TopCenter, "top-center"),
        (Self::TopRight, "top-right"),
        (Self::BottomLeft, "bottom-left"),
        (Self::BottomCenter, "bottom-center"),
        (Self::BottomRight, "bottom-right"),
    ];

    fn is_top(self) -> bool {
        matches!(self, Self::TopLeft | Self::TopCenter | Self::TopRight)
    }

    /// Lower-left corner of a label `text_width` wide on `page`.
    fn origin(self, page: &PageBox, text_width: f64, font_size: f64, margin: f64) -> (f64, f64) {
        let x = match self {
            Self::TopLeft | Self::BottomLeft => page.x + margin,
            Self::TopCenter | Self::BottomCenter => page.x + (page.width - text_width) / 2.0,
            Self::TopRight | Self::BottomRight => page.x + page.width - margin - text_width,
        };
        let y = if self.is_top() {
            page.y + page.height - margin - font_size
        } else {
            page.y + margin
        };
        (x, y)
    }
}

impl fmt::Display for NumberPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = Self::ALL
            .iter()
            .find(|(position, _)| position == self)
            .map_or("bottom-center", |(_, name)| name);
        f.write_str(name)
    }
}

impl FromStr for NumberPosition {
    type Err = PdfyError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .find(|(_, name)| *name == wanted)
            .map(|(position, _)| *position)
            .ok_or_else(|| {
                PdfyError::invalid_config(format!(
                    "Invalid position: {s}. Must be one of: top-left, top-center, top-right, \
                     bottom-left, bottom-center, bottom-right"
                ))
            })
    }
}

/// How the label reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberFormat {
    /// `3`
    #[default]
    Number,
    /// `Page 3`
    PageNumber,
    /// `3 of 10`
    NumberOfTotal,
    /// `Page 3 of 10`
    PageNumberOfTotal,
}

impl NumberFormat {
    /// Label for page `n` of `m`.
    pub fn render(self, n: u32, m: u32) -> String {
        match self {
            Self::Number => n.to_string(),
            Self::PageNumber => format!("Page {n}"),
            Self::NumberOfTotal => format!("{n} of {m}"),
            Self::PageNumberOfTotal => format!("Page {n} of {m}"),
        }
    }
}

impl FromStr for NumberFormat {
    type Err = PdfyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "n" => Ok(Self::Number),
            "page-n" => Ok(Self::PageNumber),
            "n-of-m" => Ok(Self::NumberOfTotal),
            "page-n-of-m" => Ok(Self::PageNumberOfTotal),
            _ => Err(PdfyError::invalid_config(format!(
                "Invalid format: {s}. Must be one of: n, page-n, n-of-m, page-n-of-m"
            ))),
        }
    }
}

/// Options for [`add_page_numbers`].
#[derive(Debug, Clone)]
pub struct PageNumberOptions {
    /// Anchor on the page.
    pub position: NumberPosition,
    /// Label format.
    pub format: NumberFormat,
    /// Number printed on the first page.
    pub start_number: u32,
    /// Distance from the page edge in points.
    pub margin: f64,
    /// Font size in points.
    pub font_size: f64,
    /// Pages that get a number; all when `None`.
    pub pages: Option<PageRange>,
}

impl Default for PageNumberOptions {
    fn default() -> Self {
        Self {
            position: NumberPosition::default(),
            format: NumberFormat::default(),
            start_number: 1,
            margin: 20.0,
            font_size: 12.0,
            pages: None,
        }
    }
}

impl PageNumberOptions {
    fn validate(&self) -> Result<()> {
        if self.start_number == 0 {
            return Err(PdfyError::invalid_config("Start number must be at least 1"));
        }
        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(PdfyError::invalid_config("Margin must not be negative"));
        }
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(PdfyError::invalid_config("Font size must be positive"));
        }
        Ok(())
    }
}

/// Stamp a page number on every selected page.
///
/// Page `k` (1-indexed) is labelled `start_number + k - 1`; the total is the
/// label of the last page. Returns the number of pages stamped.
pub fn add_page_numbers(doc: &mut Document, options: &PageNumberOptions) -> Result<usize> {
    options.validate()?;

    let page_ids = doc.get_pages();
    let total = page_ids.len();
    let selected = match &options.pages {
        Some(range) => range.resolve(total)?,
        None => (1..=total as u32).collect(),
    };

    // Every label fits when the last one does.
    let last_label = u32::try_from(total.saturating_sub(1))
        .ok()
        .and_then(|offset| options.start_number.checked_add(offset))
        .ok_or_else(|| {
            PdfyError::invalid_config(format!(
                "Start number {} is too large for a document with {total} page(s)",
                options.start_number
            ))
        })?;

    let font = StandardFont::Helvetica;
    let font_id = font.add_to(doc);

    for &number in &selected {
        let page_id = page_ids[&number];
        let label = options.format.render(options.start_number + number - 1, last_label);
        let page_box = pages::page_box(doc, page_id);
        let width = font.text_width(&label, options.font_size);
        let (x, y) = options
            .position
            .origin(&page_box, width, options.font_size, options.margin);

        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new(
                    "Tf",
                    vec![font.resource_name().into(), (options.font_size as f32).into()],
                ),
                Operation::new("g", vec![0.into()]),
                Operation::new("Td", vec![(x as f32).into(), (y as f32).into()]),
                Operation::new("Tj", vec![show_text_operand(&label)]),
                Operation::new("ET", vec![]),
            ],
        }
        .encode()
        .map_err(|e| PdfyError::operation_failed(OP, e.to_string()))?;

        pages::add_resource(doc, page_id, "Font", font.resource_name(), font_id)?;
        pages::overlay_content(doc, page_id, content)?;
    }

    info!(pages = selected.len(), "added page numbers");
    Ok(selected.len())
}
