//! Reading, filtering and writing PDF files.
//!
//! - [`filter`] rejects files that are not PDFs before the document library
//!   ever sees them.
//! - [`reader`] loads documents on the blocking pool.
//! - [`writer`] serializes documents and writes them atomically.

pub mod filter;
pub mod reader;
pub mod writer;

pub use filter::FileFilter;
pub use reader::{LoadResult, LoadedPdf, PdfReader};
pub use writer::{PdfWriter, WriteOptions, WriteStatistics};
