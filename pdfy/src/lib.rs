//! pdfy - Sign, merge, split, number and edit PDF files locally.
//!
//! This library bundles a set of small PDF tools. Every tool takes a loaded
//! [`lopdf::Document`] plus its options and hands back the modified
//! document; nothing leaves the machine. It supports:
//!
//! - Signing pages with a drawn, uploaded or typed signature
//! - Merging and splitting documents
//! - Page numbers, watermarks and rotation
//! - Compression, password protection and unlocking
//! - Reading and editing document metadata
//! - Extracting plain text
//!
//! # Examples
//!
//! ## Sign a page
//!
//! ```no_run
//! use pdfy::geometry::Size;
//! use pdfy::io::{PdfReader, PdfWriter};
//! use pdfy::tools::{SignaturePlacements, SignatureSource, apply_signatures};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut loaded = PdfReader::new().load(Path::new("contract.pdf")).await?;
//!
//! // A click at (320, 610) on page 1, rendered 600x776 px on screen.
//! let mut placements = SignaturePlacements::new();
//! placements.place(0, 320.0, 610.0, Size::new(600.0, 776.0))?;
//!
//! let signature = SignatureSource::typed("Jane Doe")?;
//! apply_signatures(&mut loaded.document, &signature, &placements)?;
//!
//! PdfWriter::new()
//!     .save(&loaded.document, Path::new("signed-contract.pdf"))
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Merge files
//!
//! ```no_run
//! use pdfy::tools::{MergeInput, MergeOptions, merge_files};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let inputs = vec![MergeInput::parse("a.pdf:1-3"), MergeInput::new("b.pdf")];
//! let result = merge_files(&inputs, &MergeOptions::default()).await?;
//! println!("Created {} page document", result.statistics.total_pages);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod geometry;
pub mod io;
pub mod metadata;
pub mod output;
pub mod pages;
pub mod text;
pub mod tools;
pub mod utils;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use error::{PdfyError, Result};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
