//! Configuration values shared by the pdfy tools.
//!
//! CLI flags are turned into these validated, normalized values before any
//! document is touched. This module covers:
//! - Output handling (overwrite behaviour, dry runs, verbosity)
//! - Compression levels
//! - Page rotation
//! - Page range selection

use anyhow::{Context, Result, bail};

use crate::PdfyError;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// How hard the compress tool (and merge output) squeezes a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionLevel {
    /// Leave streams and objects exactly as they are.
    None,
    /// Deflate streams that are stored raw.
    #[default]
    Standard,
    /// Compress streams and drop unreferenced or empty objects.
    Maximum,
}

impl FromStr for CompressionLevel {
    type Err = PdfyError;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "off" => Ok(Self::None),
            "standard" => Ok(Self::Standard),
            "maximum" | "max" => Ok(Self::Maximum),
            other => Err(PdfyError::invalid_config(format!(
                "Unknown compression level '{other}' (none, standard, maximum)"
            ))),
        }
    }
}

/// A clockwise quarter-turn multiple, added to a page's `/Rotate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    /// A quarter turn clockwise.
    Clockwise90,
    /// Upside down.
    Rotate180,
    /// A quarter turn counter-clockwise.
    Clockwise270,
}

impl Rotation {
    /// # Errors
    ///
    /// Only 90, 180 and 270 are accepted.
    pub fn from_degrees(degrees: u16) -> crate::Result<Self> {
        match degrees {
            90 => Ok(Self::Clockwise90),
            180 => Ok(Self::Rotate180),
            270 => Ok(Self::Clockwise270),
            _ => Err(PdfyError::invalid_config(format!(
                "Pages turn by 90, 180 or 270 degrees, not {degrees}"
            ))),
        }
    }

    /// Clockwise degrees.
    pub fn as_degrees(&self) -> i64 {
        match self {
            Self::Clockwise90 => 90,
            Self::Rotate180 => 180,
            Self::Clockwise270 => 270,
        }
    }
}

impl FromStr for Rotation {
    type Err = PdfyError;

    fn from_str(s: &str) -> crate::Result<Self> {
        let degrees: u16 = s
            .trim()
            .parse()
            .map_err(|_| PdfyError::invalid_config(format!("Not a number of degrees: '{s}'")))?;
        Self::from_degrees(degrees)
    }
}

/// A selection of 1-indexed pages, written like `1-3,7,10-12`.
///
/// Ranges are inclusive and may overlap or come in any order; the selected
/// pages are always visited in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRange {
    ranges: Vec<PageRangeItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PageRangeItem {
    Single(u32),
    Range(u32, u32),
}

impl PageRangeItem {
    fn parse(part: &str) -> Result<Self> {
        let Some((start, end)) = part.split_once('-') else {
            return page_number(part).map(Self::Single);
        };

        let (start, end) = (page_number(start)?, page_number(end)?);
        if start > end {
            bail!("Invalid range {start}-{end}: the first page comes after the last");
        }
        Ok(Self::Range(start, end))
    }
}

/// A 1-indexed page number.
fn page_number(s: &str) -> Result<u32> {
    let s = s.trim();
    let page: u32 = s
        .parse()
        .with_context(|| format!("Invalid page number: '{s}'"))?;
    if page == 0 {
        bail!("Page numbers start at 1");
    }
    Ok(page)
}

impl PageRange {
    /// Parse a comma separated list of pages and `start-end` spans.
    ///
    /// # Errors
    ///
    /// Fails on empty items, page `0`, and spans that run backwards.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdfy::config::PageRange;
    ///
    /// let range = PageRange::parse("1-5,10").unwrap();
    /// assert!(range.contains(3));
    /// assert!(range.contains(10));
    /// assert!(!range.contains(7));
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let ranges = s
            .split(',')
            .map(|part| PageRangeItem::parse(part.trim()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { ranges })
    }

    /// Whether `page` is selected.
    pub fn contains(&self, page: u32) -> bool {
        self.ranges.iter().any(|item| match item {
            PageRangeItem::Single(p) => *p == page,
            PageRangeItem::Range(start, end) => page >= *start && page <= *end,
        })
    }

    /// Selected pages up to `max_pages`, ascending and without repeats.
    pub fn to_pages(&self, max_pages: u32) -> Vec<u32> {
        (1..=max_pages).filter(|p| self.contains(*p)).collect()
    }

    /// Highest page number the range mentions.
    pub fn max_page(&self) -> u32 {
        self.ranges
            .iter()
            .map(|item| match item {
                PageRangeItem::Single(p) => *p,
                PageRangeItem::Range(_, end) => *end,
            })
            .max()
            .unwrap_or(0)
    }

    /// Resolve the range against a document with `total_pages` pages.
    ///
    /// # Errors
    ///
    /// Returns [`PdfyError::InvalidPageRange`] if the range mentions a page
    /// past the end of the document.
    pub fn resolve(&self, total_pages: usize) -> crate::Result<Vec<u32>> {
        if self.max_page() as usize > total_pages {
            return Err(PdfyError::InvalidPageRange {
                range: self.to_string(),
                total_pages,
            });
        }
        Ok(self.to_pages(total_pages as u32))
    }
}

impl FromStr for PageRange {
    type Err = PdfyError;

    fn from_str(s: &str) -> crate::Result<Self> {
        Ok(Self::parse(s)?)
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .ranges
            .iter()
            .map(|item| match item {
                PageRangeItem::Single(p) => p.to_string(),
                PageRangeItem::Range(start, end) => format!("{start}-{end}"),
            })
            .collect();
        write!(f, "{}", parts.join(","))
    }
}

/// What to do when the output file is already there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteMode {
    /// Ask on the terminal.
    #[default]
    Prompt,
    /// Replace it (`--force`).
    Force,
    /// Refuse with [`PdfyError::OutputExists`] (`--no-clobber`).
    NoClobber,
}

/// Where and how a tool writes its result.
///
/// Built from the global CLI flags plus the tool's input and output
/// arguments.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// File the tool writes.
    pub output: PathBuf,
    /// Existing output handling.
    pub overwrite_mode: OverwriteMode,
    /// Run the tool but skip the write.
    pub dry_run: bool,
    /// Show step details.
    pub verbose: bool,
    /// Only warnings and errors.
    pub quiet: bool,
}

impl OutputConfig {
    /// Write to `output`, prompting before an overwrite.
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
            overwrite_mode: OverwriteMode::default(),
            dry_run: false,
            verbose: false,
            quiet: false,
        }
    }

    /// Validate the configuration against the tool's inputs.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Verbose and quiet modes are both enabled
    /// - The output path is one of the inputs
    pub fn validate(&self, inputs: &[PathBuf]) -> Result<()> {
        if self.verbose && self.quiet {
            bail!("--verbose and --quiet exclude each other");
        }
        if let Some(input) = inputs.iter().find(|input| **input == self.output) {
            bail!("Refusing to overwrite the input {}", input.display());
        }
        Ok(())
    }

    /// Dry runs report what they would write even when quiet.
    pub fn should_print(&self) -> bool {
        !self.quiet || self.dry_run
    }
}

/// Default output path for a tool: `<dir>/<prefix>-<file name>`.
///
/// Mirrors the download names of the web tools (`signed-contract.pdf`,
/// `numbered-report.pdf`, ...).
pub fn prefixed_output_path(input: &Path, prefix: &str) -> PathBuf {
    let file_name = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document.pdf".to_string());
    input.with_file_name(format!("{prefix}-{file_name}"))
}
