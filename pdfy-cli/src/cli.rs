//! CLI argument parsing for pdfy.
//!
//! This module defines the command-line interface structure using `clap`.
//! It is also compiled by `build.rs` to render the man page, so it only
//! depends on `clap` and the `pdfy` value types.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use pdfy::config::{CompressionLevel, OverwriteMode, PageRange, Rotation};
use pdfy::tools::{NumberFormat, NumberPosition};

/// Sign, merge, split, number and edit PDF files locally.
///
/// Every command reads its input, applies one tool and writes a new file.
/// Inputs are never modified in place.
#[derive(Parser, Debug)]
#[command(name = "pdfy")]
#[command(version)]
#[command(about = "Sign, merge, split, number and edit PDF files locally", long_about = None)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Flags shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Verbose output - show timings and per-file details
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all non-error output
    ///
    /// Only errors and warnings will be printed.
    /// Useful for scripts and automation.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Force overwrite of existing output files without confirmation
    #[arg(short, long, global = true)]
    pub force: bool,

    /// Never overwrite existing output files
    ///
    /// If an output file already exists, exit with an error
    /// instead of prompting or overwriting.
    #[arg(long, global = true, conflicts_with = "force")]
    pub no_clobber: bool,

    /// Dry run - run the tool but do not write any output
    #[arg(short = 'n', long, global = true)]
    pub dry_run: bool,
}

impl GlobalArgs {
    /// Overwrite behaviour selected by the flags.
    pub fn overwrite_mode(&self) -> OverwriteMode {
        if self.force {
            OverwriteMode::Force
        } else if self.no_clobber {
            OverwriteMode::NoClobber
        } else {
            OverwriteMode::Prompt
        }
    }
}

/// The tools.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Merge PDF files into one document, in the order given
    ///
    /// Examples:
    ///   pdfy merge a.pdf b.pdf -o both.pdf
    ///   pdfy merge "chapter*.pdf" -o book.pdf
    ///   pdfy merge cover.pdf:1 report.pdf:2-9 -o short.pdf
    Merge(MergeArgs),

    /// Split a PDF into several documents
    Split(SplitArgs),

    /// Place a signature on one or more pages
    ///
    /// Positions are clicks on the rendered page, in pixels from the top-left
    /// corner, together with the size the page was rendered at.
    ///
    /// Examples:
    ///   pdfy sign contract.pdf --image sig.png --click 1,320,610 --rendered 600x776
    ///   pdfy sign contract.pdf --text "Jane Doe" --placements clicks.json
    Sign(SignArgs),

    /// Compress streams and drop unused objects
    Compress(CompressArgs),

    /// Protect a PDF with a password
    Protect(ProtectArgs),

    /// Remove the password from a PDF
    ///
    /// Files that open without a password only lose their permission
    /// restrictions; no password is needed for those.
    Unlock(UnlockArgs),

    /// Rotate pages
    Rotate(RotateArgs),

    /// Add page numbers
    Number(NumberArgs),

    /// Stamp a text watermark on pages
    Watermark(WatermarkArgs),

    /// Show or edit document metadata
    #[command(subcommand)]
    Metadata(MetadataCommand),

    /// Extract the plain text of a PDF
    ExtractText(ExtractTextArgs),
}

/// Input file and optional output path of a single-file tool.
#[derive(Args, Debug, Clone)]
pub struct FileArgs {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Output file; defaults to a prefixed name next to the input
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Input PDF files or glob patterns, optionally with a page range
    /// suffix (`file.pdf:1-3,7`)
    #[arg(value_name = "FILE", required_unless_present = "input_list")]
    pub inputs: Vec<String>,

    /// Output PDF file path
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    /// Read more inputs from a file (one path per line, `#` for comments)
    #[arg(long, value_name = "FILE")]
    pub input_list: Option<PathBuf>,

    /// Page range applied to inputs without their own range (e.g. "1-5,10")
    #[arg(long, value_name = "RANGE")]
    pub pages: Option<PageRange>,

    /// Skip inputs that fail to load instead of aborting
    #[arg(long)]
    pub continue_on_error: bool,

    /// Number of inputs loaded in parallel
    #[arg(short, long, value_name = "N", default_value_t = 4)]
    #[arg(value_parser = clap::value_parser!(u16).range(1..))]
    pub jobs: u16,

    /// Compression level for the output (none, standard, maximum)
    #[arg(short, long, value_name = "LEVEL", default_value = "standard")]
    pub compression: CompressionLevel,
}

#[derive(Args, Debug)]
pub struct SplitArgs {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Directory for the parts; defaults to the input's directory
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    #[command(flatten)]
    pub mode: SplitModeArgs,
}

/// How to cut the document. Exactly one is required.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct SplitModeArgs {
    /// One part per range (e.g. --ranges 1-3 --ranges 4-9)
    #[arg(long, value_name = "RANGE", num_args = 1..)]
    pub ranges: Vec<PageRange>,

    /// Parts of at most N pages
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub chunk: Option<u32>,

    /// A single part with the selected pages
    #[arg(long, value_name = "RANGE")]
    pub extract: Option<PageRange>,

    /// One part per page
    #[arg(long)]
    pub every_page: bool,
}

#[derive(Args, Debug)]
pub struct SignArgs {
    #[command(flatten)]
    pub file: FileArgs,

    #[command(flatten)]
    pub signature: SignatureArgs,

    /// Click on a rendered page: PAGE,X,Y (page is 1-indexed)
    #[arg(long, value_name = "PAGE,X,Y", value_parser = parse_click, requires = "rendered")]
    pub click: Vec<Click>,

    /// Size the pages were rendered at when clicking: WIDTHxHEIGHT
    #[arg(long, value_name = "WxH", value_parser = parse_rendered)]
    pub rendered: Option<(f64, f64)>,

    /// JSON file with placements
    /// (`[{"page":1,"x":..,"y":..,"renderedWidth":..,"renderedHeight":..}]`)
    #[arg(long, value_name = "FILE", conflicts_with = "click")]
    pub placements: Option<PathBuf>,
}

/// Where the signature comes from. Exactly one is required.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct SignatureArgs {
    /// Signature image (PNG or JPEG)
    #[arg(long, value_name = "FILE")]
    pub image: Option<PathBuf>,

    /// Signature image as a `data:image/png;base64,...` URL
    #[arg(long, value_name = "URL")]
    pub data_url: Option<String>,

    /// Typed signature
    #[arg(long, value_name = "NAME")]
    pub text: Option<String>,
}

/// One click on a rendered page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Click {
    /// 1-indexed page.
    pub page: usize,
    /// Pixels from the left edge.
    pub x: f64,
    /// Pixels from the top edge.
    pub y: f64,
}

fn parse_click(s: &str) -> Result<Click, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let [page, x, y] = parts.as_slice() else {
        return Err(format!("expected PAGE,X,Y, got '{s}'"));
    };

    let page: usize = page
        .parse()
        .ok()
        .filter(|&page| page >= 1)
        .ok_or_else(|| format!("invalid page '{page}'; pages start at 1"))?;
    let x: f64 = x.parse().map_err(|_| format!("invalid x coordinate '{x}'"))?;
    let y: f64 = y.parse().map_err(|_| format!("invalid y coordinate '{y}'"))?;

    Ok(Click { page, x, y })
}

fn parse_rendered(s: &str) -> Result<(f64, f64), String> {
    let (width, height) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let width: f64 = width
        .trim()
        .parse()
        .map_err(|_| format!("invalid width '{width}'"))?;
    let height: f64 = height
        .trim()
        .parse()
        .map_err(|_| format!("invalid height '{height}'"))?;
    Ok((width, height))
}

#[derive(Args, Debug)]
pub struct CompressArgs {
    #[command(flatten)]
    pub file: FileArgs,

    /// Compression level (none, standard, maximum)
    #[arg(short, long, value_name = "LEVEL", default_value = "maximum")]
    pub level: CompressionLevel,
}

#[derive(Args, Debug)]
pub struct ProtectArgs {
    #[command(flatten)]
    pub file: FileArgs,

    /// Password needed to open the document
    #[arg(short, long, env = "PDFY_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Password for full access; defaults to the open password
    #[arg(long, env = "PDFY_OWNER_PASSWORD", hide_env_values = true)]
    pub owner_password: Option<String>,
}

#[derive(Args, Debug)]
pub struct UnlockArgs {
    #[command(flatten)]
    pub file: FileArgs,

    /// User or owner password of the document
    #[arg(
        short,
        long,
        env = "PDFY_PASSWORD",
        hide_env_values = true,
        default_value = ""
    )]
    pub password: String,
}

#[derive(Args, Debug)]
pub struct RotateArgs {
    #[command(flatten)]
    pub file: FileArgs,

    /// Degrees clockwise (90, 180, 270)
    #[arg(short, long, value_name = "DEGREES")]
    pub degrees: Rotation,

    /// Pages to rotate; all when omitted
    #[arg(long, value_name = "RANGE")]
    pub pages: Option<PageRange>,
}

#[derive(Args, Debug)]
pub struct NumberArgs {
    #[command(flatten)]
    pub file: FileArgs,

    /// Where the number goes (top-left, top-center, top-right,
    /// bottom-left, bottom-center, bottom-right)
    #[arg(long, value_name = "POSITION", default_value = "bottom-center")]
    pub position: NumberPosition,

    /// Label format (n, page-n, n-of-m, page-n-of-m)
    #[arg(long, value_name = "FORMAT", default_value = "n")]
    pub format: NumberFormat,

    /// Number printed on the first page
    #[arg(long, value_name = "N", default_value_t = 1)]
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    pub start: u32,

    /// Distance from the page edge in points
    #[arg(long, value_name = "POINTS", default_value_t = 20.0)]
    pub margin: f64,

    /// Font size in points
    #[arg(long, value_name = "POINTS", default_value_t = 12.0)]
    pub font_size: f64,

    /// Pages to number; all when omitted
    #[arg(long, value_name = "RANGE")]
    pub pages: Option<PageRange>,
}

#[derive(Args, Debug)]
pub struct WatermarkArgs {
    #[command(flatten)]
    pub file: FileArgs,

    /// Watermark text
    #[arg(short, long)]
    pub text: String,

    /// Font size in points
    #[arg(long, value_name = "POINTS", default_value_t = 48.0)]
    pub font_size: f64,

    /// Opacity from 0 to 1
    #[arg(long, default_value_t = 0.3)]
    pub opacity: f64,

    /// Set the text horizontally instead of corner to corner
    #[arg(long)]
    pub straight: bool,

    /// Pages to stamp; all when omitted
    #[arg(long, value_name = "RANGE")]
    pub pages: Option<PageRange>,
}

#[derive(Subcommand, Debug)]
pub enum MetadataCommand {
    /// Print the document properties
    Show(MetadataShowArgs),
    /// Change document properties; fields not given are kept
    Set(MetadataSetArgs),
}

#[derive(Args, Debug)]
pub struct MetadataShowArgs {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct MetadataSetArgs {
    #[command(flatten)]
    pub file: FileArgs,

    /// Document title
    #[arg(long, value_name = "TEXT")]
    pub title: Option<String>,

    /// Author
    #[arg(long, value_name = "TEXT")]
    pub author: Option<String>,

    /// Subject
    #[arg(long, value_name = "TEXT")]
    pub subject: Option<String>,

    /// Keywords (comma-separated)
    #[arg(long, value_name = "TEXT")]
    pub keywords: Option<String>,

    /// Creating application
    #[arg(long, value_name = "TEXT")]
    pub creator: Option<String>,

    /// Producing application
    #[arg(long, value_name = "TEXT")]
    pub producer: Option<String>,

    /// Start from empty properties instead of the current ones
    #[arg(long)]
    pub clear: bool,
}

#[derive(Args, Debug)]
pub struct ExtractTextArgs {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Output text file, or `-` for stdout; defaults to `<name>.txt`
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Pages to extract; all when omitted
    #[arg(long, value_name = "RANGE")]
    pub pages: Option<PageRange>,
}
