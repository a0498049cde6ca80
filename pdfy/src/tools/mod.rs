//! The PDF tools.
//!
//! Each tool is a leaf: it takes a loaded document and its options, calls
//! the document library, and hands back the modified document (or the
//! extracted text). Loading and saving are left to [`crate::io`]; only
//! [`unlock`] starts from the raw file bytes.

pub mod compress;
pub mod extract_text;
pub mod merge;
pub mod page_numbers;
pub mod protect;
pub mod rotate;
pub mod sign;
pub mod split;
pub mod unlock;
pub mod watermark;

pub use compress::{CompressionReport, compress_document};
pub use extract_text::extract_text;
pub use merge::{MergeInput, MergeOptions, MergeResult, MergeStatistics, merge_documents, merge_files};
pub use page_numbers::{NumberFormat, NumberPosition, PageNumberOptions, add_page_numbers};
pub use protect::{ProtectOptions, protect_document};
pub use rotate::rotate_pages;
pub use sign::{
    Placement, SignatureImage, SignaturePlacements, SignatureSource, apply_signatures,
};
pub use split::{SplitMode, SplitPart, split_document};
pub use unlock::unlock_pdf;
pub use watermark::{WatermarkOptions, add_watermark};
