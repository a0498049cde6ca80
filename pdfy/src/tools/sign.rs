//! Place a signature on one or more pages.
//!
//! Signing happens in two phases:
//!
//! 1. **Placement.** The user clicks on rendered pages. Each click becomes a
//!    [`Placement`]: a [`ScreenRect`] of [`SIGNATURE_FOOTPRINT`] size centred
//!    on the click, plus the size the page was rendered at. Placements can be
//!    removed again by id.
//! 2. **Save.** [`apply_signatures`] maps every placement onto the true page
//!    box of the document and draws the signature there.
//!
//! The signature is either an image (PNG or JPEG, raw bytes or a `data:`
//! URL as produced by a drawing pad) or a typed name set in an oblique
//! font.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, dictionary};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{PdfyError, Result};
use crate::geometry::{PdfRect, SIGNATURE_FOOTPRINT, ScreenRect, Size};
use crate::pages;
use crate::text::{StandardFont, show_text_operand};

const OP: &str = "Sign";

/// A signature placed on a rendered page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Identifier handed out when the placement was created.
    pub id: u64,
    /// 0-indexed page the signature sits on.
    pub page_index: usize,
    /// Placed rectangle in screen space.
    pub rect: ScreenRect,
    /// Size the page was rendered at when the placement was made.
    pub rendered: Size,
}

impl Placement {
    /// Check that the placement can be mapped onto a page.
    ///
    /// # Errors
    ///
    /// Returns [`PdfyError::InvalidPlacement`] if a coordinate is not finite,
    /// the rectangle is empty, or the rendered size is not positive.
    pub fn validate(&self) -> Result<()> {
        if !self.rect.is_finite() {
            return Err(PdfyError::invalid_placement(
                self.id,
                "coordinates must be finite numbers",
            ));
        }
        if self.rect.width <= 0.0 || self.rect.height <= 0.0 {
            return Err(PdfyError::invalid_placement(
                self.id,
                "signature rectangle is empty",
            ));
        }
        if !self.rendered.is_positive() {
            return Err(PdfyError::invalid_placement(
                self.id,
                format!(
                    "rendered page size {}x{} must be positive",
                    self.rendered.width, self.rendered.height
                ),
            ));
        }
        Ok(())
    }

    /// Rectangle in PDF user space for a page with box `page_box`.
    pub fn to_pdf(&self, page_box: &pages::PageBox) -> PdfRect {
        self.rect
            .normalize(self.rendered)
            .to_pdf(page_box.size())
            .offset(page_box.x, page_box.y)
    }
}

/// One entry of a placements JSON file.
///
/// `page` is 1-indexed; `x`/`y` is the click position on the rendered page.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlacementRecord {
    page: usize,
    x: f64,
    y: f64,
    rendered_width: f64,
    rendered_height: f64,
}

/// The signatures placed so far, in placement order.
#[derive(Debug, Clone, Default)]
pub struct SignaturePlacements {
    next_id: u64,
    items: Vec<Placement>,
}

impl SignaturePlacements {
    /// Empty set of placements.
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a signature centred on a click at `(x, y)` on a page rendered
    /// at `rendered` pixels.
    ///
    /// The rectangle is pushed back onto the page when it would stick out.
    /// Returns the id of the new placement.
    ///
    /// # Errors
    ///
    /// Returns [`PdfyError::InvalidPlacement`] for non-finite input or a
    /// non-positive rendered size.
    pub fn place(&mut self, page_index: usize, x: f64, y: f64, rendered: Size) -> Result<u64> {
        let rect = ScreenRect::centered_on(x, y, SIGNATURE_FOOTPRINT);
        let rect = if rendered.is_positive() {
            rect.clamped_to(rendered)
        } else {
            rect
        };

        let placement = Placement {
            id: self.next_id,
            page_index,
            rect,
            rendered,
        };
        placement.validate()?;

        self.next_id += 1;
        self.items.push(placement);
        debug!(id = placement.id, page_index, "placed signature");
        Ok(placement.id)
    }

    /// Remove the placement with `id`.
    ///
    /// Every other placement is left as it was.
    pub fn remove(&mut self, id: u64) -> Option<Placement> {
        let index = self.items.iter().position(|p| p.id == id)?;
        Some(self.items.remove(index))
    }

    /// Placements on a 0-indexed page.
    pub fn for_page(&self, page_index: usize) -> impl Iterator<Item = &Placement> {
        self.items.iter().filter(move |p| p.page_index == page_index)
    }

    /// All placements, in placement order.
    pub fn iter(&self) -> impl Iterator<Item = &Placement> {
        self.items.iter()
    }

    /// Number of placements.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if nothing has been placed.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Build placements from a JSON array of clicks.
    ///
    /// ```json
    /// [{ "page": 1, "x": 320, "y": 610, "renderedWidth": 600, "renderedHeight": 776 }]
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<PlacementRecord> = serde_json::from_str(json)
            .map_err(|e| PdfyError::invalid_config(format!("Invalid placements file: {e}")))?;

        let mut placements = Self::new();
        for record in records {
            let page_index = record.page.checked_sub(1).ok_or_else(|| {
                PdfyError::invalid_config("Placement pages are 1-indexed; got page 0")
            })?;
            placements.place(
                page_index,
                record.x,
                record.y,
                Size::new(record.rendered_width, record.rendered_height),
            )?;
        }
        Ok(placements)
    }
}

/// A decoded signature image, split into colour and alpha planes.
#[derive(Debug, Clone)]
pub struct SignatureImage {
    width: u32,
    height: u32,
    rgb: Vec<u8>,
    alpha: Vec<u8>,
}

impl SignatureImage {
    /// Decode a PNG or JPEG.
    ///
    /// # Errors
    ///
    /// Returns [`PdfyError::InvalidSignature`] if the image cannot be decoded
    /// or has no pixels.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(bytes)
            .map_err(|e| PdfyError::invalid_signature(format!("cannot decode image: {e}")))?
            .to_rgba8();

        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            return Err(PdfyError::invalid_signature("image has no pixels"));
        }

        let mut rgb = Vec::with_capacity((width * height * 3) as usize);
        let mut alpha = Vec::with_capacity((width * height) as usize);
        for pixel in img.pixels() {
            rgb.extend_from_slice(&pixel.0[..3]);
            alpha.push(pixel.0[3]);
        }

        Ok(Self {
            width,
            height,
            rgb,
            alpha,
        })
    }

    /// Decode a `data:image/png;base64,...` URL.
    pub fn from_data_url(url: &str) -> Result<Self> {
        let rest = url
            .trim()
            .strip_prefix("data:")
            .ok_or_else(|| PdfyError::invalid_signature("not a data: URL"))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| PdfyError::invalid_signature("data: URL has no payload"))?;

        if !header.ends_with(";base64") {
            return Err(PdfyError::invalid_signature(
                "only base64 data: URLs are supported",
            ));
        }

        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|e| PdfyError::invalid_signature(format!("invalid base64: {e}")))?;
        Self::from_bytes(&bytes)
    }

    /// Pixel width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Pixel height.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Add the image and its soft mask to `doc`.
    fn add_to(&self, doc: &mut Document) -> ObjectId {
        let smask_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => self.width as i64,
                "Height" => self.height as i64,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8,
            },
            self.alpha.clone(),
        ));

        doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => self.width as i64,
                "Height" => self.height as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "SMask" => smask_id,
            },
            self.rgb.clone(),
        ))
    }
}

/// What gets drawn at each placement.
#[derive(Debug, Clone)]
pub enum SignatureSource {
    /// A drawn or uploaded signature image.
    Image(SignatureImage),
    /// A typed name.
    Typed(String),
}

impl SignatureSource {
    /// Typed signature.
    ///
    /// # Errors
    ///
    /// Returns [`PdfyError::InvalidSignature`] if the name is blank.
    pub fn typed(name: &str) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PdfyError::invalid_signature("typed signature is empty"));
        }
        Ok(Self::Typed(name.to_string()))
    }
}

/// Resources a signature needs on every page it appears on.
enum Drawable {
    Image { id: ObjectId, name: String },
    Text { font_id: ObjectId, text: String },
}

impl Drawable {
    fn register(&self, doc: &mut Document, page_id: ObjectId) -> Result<()> {
        match self {
            Self::Image { id, name } => pages::add_resource(doc, page_id, "XObject", name, *id),
            Self::Text { font_id, .. } => pages::add_resource(
                doc,
                page_id,
                "Font",
                StandardFont::HelveticaOblique.resource_name(),
                *font_id,
            ),
        }
    }

    fn operations(&self, rect: &PdfRect) -> Vec<Operation> {
        match self {
            Self::Image { name, .. } => vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        real(rect.width),
                        0.into(),
                        0.into(),
                        real(rect.height),
                        real(rect.x),
                        real(rect.y),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(name.as_bytes().to_vec())]),
                Operation::new("Q", vec![]),
            ],
            Self::Text { text, .. } => {
                let font = StandardFont::HelveticaOblique;
                let width_at_one = font.text_width(text, 1.0).max(f64::EPSILON);
                let font_size = (rect.height * 0.7).min(rect.width * 0.95 / width_at_one);
                let text_width = width_at_one * font_size;

                let x = rect.x + (rect.width - text_width) / 2.0;
                // Centre the cap height (about 0.72 em) vertically.
                let y = rect.y + (rect.height - font_size * 0.72) / 2.0;

                vec![
                    Operation::new("q", vec![]),
                    Operation::new("BT", vec![]),
                    Operation::new(
                        "Tf",
                        vec![font.resource_name().into(), real(font_size)],
                    ),
                    Operation::new("rg", vec![real(0.05), real(0.1), real(0.35)]),
                    Operation::new("Td", vec![real(x), real(y)]),
                    Operation::new("Tj", vec![show_text_operand(text)]),
                    Operation::new("ET", vec![]),
                    Operation::new("Q", vec![]),
                ]
            }
        }
    }
}

fn real(value: f64) -> Object {
    Object::Real(value as f32)
}

/// Draw `signature` at every placement.
///
/// Placements are mapped with the page box of `doc`, which must be the
/// document the user placed on, freshly loaded. Returns the number of
/// signatures drawn.
///
/// # Errors
///
/// Returns an error if there are no placements, a placement is invalid or
/// points past the last page. The document is not modified in that case.
pub fn apply_signatures(
    doc: &mut Document,
    signature: &SignatureSource,
    placements: &SignaturePlacements,
) -> Result<usize> {
    if placements.is_empty() {
        return Err(PdfyError::invalid_config("No signature placements given"));
    }

    let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
    for placement in placements.iter() {
        placement.validate()?;
        if placement.page_index >= page_ids.len() {
            return Err(PdfyError::invalid_placement(
                placement.id,
                format!(
                    "page {} does not exist; the document has {} page(s)",
                    placement.page_index + 1,
                    page_ids.len()
                ),
            ));
        }
    }

    let drawable = match signature {
        SignatureSource::Image(image) => {
            let id = image.add_to(doc);
            Drawable::Image {
                id,
                name: format!("PdfySig{}", id.0),
            }
        }
        SignatureSource::Typed(text) => Drawable::Text {
            font_id: StandardFont::HelveticaOblique.add_to(doc),
            text: text.clone(),
        },
    };

    let mut drawn = 0;
    for (page_index, &page_id) in page_ids.iter().enumerate() {
        let on_page: Vec<&Placement> = placements.for_page(page_index).collect();
        if on_page.is_empty() {
            continue;
        }

        let page_box = pages::page_box(doc, page_id);
        let mut operations = Vec::new();
        for placement in &on_page {
            let rect = placement.to_pdf(&page_box);
            debug!(id = placement.id, page = page_index + 1, ?rect, "drawing signature");
            operations.extend(drawable.operations(&rect));
        }

        let content = Content { operations }
            .encode()
            .map_err(|e| PdfyError::operation_failed(OP, e.to_string()))?;

        drawable.register(doc, page_id)?;
        pages::overlay_content(doc, page_id, content)?;
        drawn += on_page.len();
    }

    info!(signatures = drawn, "signed document");
    Ok(drawn)
}
