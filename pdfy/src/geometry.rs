//! Signature placement geometry.
//!
//! A signature is placed by clicking on a rendered page. The click lives in
//! screen space: pixels, origin at the top-left corner, Y growing downwards.
//! The signature is drawn in PDF user space: points, origin at the
//! bottom-left corner, Y growing upwards.
//!
//! The two spaces are bridged by [`NormalizedRect`], which stores the
//! placement as ratios of the page. Ratios do not depend on the zoom level
//! the page was rendered at, so they can be scaled onto the true page size
//! read from the document at save time.
//!
//! ```text
//! screen (rendered px)           normalized            pdf (points)
//! +--------------------+        x_ratio     = x / W   +--------------------+
//! | (x, y)             |        y_ratio     = (H-y-h)/H |                  |
//! |   +------+         |  --->  width_ratio = w / W  --->  +------+       |
//! |   |      | h       |        height_ratio= h / H   |  |      |         |
//! |   +------+         |                              |  +------+ (x, y)  |
//! +--------------------+                              +--------------------+
//! ```

use serde::{Deserialize, Serialize};

/// Width and height of a page or rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Size {
    /// Create a size.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Both dimensions are finite and strictly positive.
    pub fn is_positive(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// On-screen footprint of a freshly placed signature, in pixels.
pub const SIGNATURE_FOOTPRINT: Size = Size::new(150.0, 60.0);

/// Rectangle in screen space (pixels, top-left origin).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenRect {
    /// Distance from the left edge of the rendered page.
    pub x: f64,
    /// Distance from the top edge of the rendered page.
    pub y: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl ScreenRect {
    /// Rectangle of `footprint` size centred on a click at `(x, y)`.
    pub fn centered_on(x: f64, y: f64, footprint: Size) -> Self {
        Self {
            x: x - footprint.width / 2.0,
            y: y - footprint.height / 2.0,
            width: footprint.width,
            height: footprint.height,
        }
    }

    /// Move the rectangle so it lies inside a page of size `page`.
    ///
    /// An axis along which the rectangle is larger than the page is left
    /// untouched.
    pub fn clamped_to(self, page: Size) -> Self {
        let clamp_axis = |pos: f64, extent: f64, limit: f64| {
            if extent <= limit {
                pos.clamp(0.0, limit - extent)
            } else {
                pos
            }
        };

        Self {
            x: clamp_axis(self.x, self.width, page.width),
            y: clamp_axis(self.y, self.height, page.height),
            ..self
        }
    }

    /// All four values are finite.
    pub fn is_finite(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
    }

    /// Express the rectangle as ratios of the rendered page.
    ///
    /// The Y axis is flipped here: `y_ratio` measures the distance of the
    /// rectangle's bottom edge from the bottom of the page.
    pub fn normalize(&self, rendered: Size) -> NormalizedRect {
        NormalizedRect {
            x_ratio: self.x / rendered.width,
            y_ratio: (rendered.height - self.y - self.height) / rendered.height,
            width_ratio: self.width / rendered.width,
            height_ratio: self.height / rendered.height,
        }
    }
}

/// Placement expressed as fractions of the page, Y measured from the bottom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRect {
    /// Left edge as a fraction of the page width.
    pub x_ratio: f64,
    /// Bottom edge as a fraction of the page height.
    pub y_ratio: f64,
    /// Width as a fraction of the page width.
    pub width_ratio: f64,
    /// Height as a fraction of the page height.
    pub height_ratio: f64,
}

impl NormalizedRect {
    /// Scale onto a page of `page` points.
    pub fn to_pdf(&self, page: Size) -> PdfRect {
        PdfRect {
            x: self.x_ratio * page.width,
            y: self.y_ratio * page.height,
            width: self.width_ratio * page.width,
            height: self.height_ratio * page.height,
        }
    }

    /// Scale back onto a page rendered at `rendered` pixels.
    pub fn to_screen(&self, rendered: Size) -> ScreenRect {
        let height = self.height_ratio * rendered.height;
        ScreenRect {
            x: self.x_ratio * rendered.width,
            y: rendered.height - self.y_ratio * rendered.height - height,
            width: self.width_ratio * rendered.width,
            height,
        }
    }
}

/// Rectangle in PDF user space (points, bottom-left origin).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PdfRect {
    /// Left edge.
    pub x: f64,
    /// Bottom edge.
    pub y: f64,
    /// Width in points.
    pub width: f64,
    /// Height in points.
    pub height: f64,
}

impl PdfRect {
    /// Express the rectangle as ratios of a page of `page` points.
    pub fn normalize(&self, page: Size) -> NormalizedRect {
        NormalizedRect {
            x_ratio: self.x / page.width,
            y_ratio: self.y / page.height,
            width_ratio: self.width / page.width,
            height_ratio: self.height / page.height,
        }
    }

    /// Shift by the lower-left corner of the page box.
    pub fn offset(&self, origin_x: f64, origin_y: f64) -> Self {
        Self {
            x: self.x + origin_x,
            y: self.y + origin_y,
            ..*self
        }
    }
}
