//! Errors reported by the pdfy tools.
//!
//! A failure aborts the tool that hit it; the input file is never touched
//! and nothing is retried. The CLI prints the message once and exits with
//! [`PdfyError::exit_code`].
//!
//! Exit codes:
//!
//! | code | meaning |
//! |------|---------|
//! | 1 | bad options, page ranges or placements |
//! | 2 | input missing or unreadable |
//! | 3 | input rejected or unparseable |
//! | 4 | output exists |
//! | 5 | output could not be written |
//! | 6 | the document library refused the edit |
//! | 130 | cancelled at the overwrite prompt |

use std::io;
use std::path::PathBuf;

/// Result type alias for pdfy operations.
pub type Result<T> = std::result::Result<T, PdfyError>;

/// Everything that can go wrong in a pdfy tool.
#[derive(Debug, thiserror::Error)]
pub enum PdfyError {
    /// The input path does not exist.
    #[error("No such file: {}", path.display())]
    FileNotFound {
        /// Missing path.
        path: PathBuf,
    },

    /// The input exists but cannot be read.
    #[error("Cannot read {}: {source}", path.display())]
    FileNotAccessible {
        /// Unreadable path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The input path is a directory or another non-file.
    #[error("Not a regular file: {}", path.display())]
    NotAFile {
        /// Offending path.
        path: PathBuf,
    },

    /// The upload filter turned the file away before parsing.
    #[error("Not a PDF file: {} ({reason})", path.display())]
    NotAPdf {
        /// Rejected path.
        path: PathBuf,
        /// Which check failed.
        reason: String,
    },

    /// The document library could not parse the file.
    #[error("Could not open {} as a PDF: {reason}", path.display())]
    FailedToLoadPdf {
        /// Input path.
        path: PathBuf,
        /// Parser message.
        reason: String,
    },

    /// The file parses but is unusable, e.g. it has no pages.
    #[error("Damaged PDF {}: {details}", path.display())]
    CorruptedPdf {
        /// Input path.
        path: PathBuf,
        /// What is missing or broken.
        details: String,
    },

    /// The file is password protected.
    #[error(
        "{} is password protected\n  \
         Hint: remove the password with `pdfy unlock --password <PASSWORD>` first",
        path.display()
    )]
    EncryptedPdf {
        /// Input path.
        path: PathBuf,
    },

    /// The password given to unlock a file does not open it.
    #[error("Incorrect password for {}", path.display())]
    IncorrectPassword {
        /// Input path.
        path: PathBuf,
    },

    /// Nothing was left to work on.
    #[error("No input files to process")]
    NoInputFiles,

    /// A page range points past the end of the document.
    #[error("Page range '{range}' does not fit a document with {total_pages} page(s)")]
    InvalidPageRange {
        /// The range as given.
        range: String,
        /// Pages in the document.
        total_pages: usize,
    },

    /// A signature placement cannot be mapped onto its page.
    #[error("Signature placement {id} is invalid: {reason}")]
    InvalidPlacement {
        /// Placement id.
        id: u64,
        /// What is wrong with it.
        reason: String,
    },

    /// The signature image or typed name cannot be drawn.
    #[error("Unusable signature: {reason}")]
    InvalidSignature {
        /// What is wrong with it.
        reason: String,
    },

    /// The document library refused an edit.
    #[error("{operation} failed: {reason}")]
    OperationFailed {
        /// Tool step, e.g. "Protect".
        operation: &'static str,
        /// Library message.
        reason: String,
    },

    /// The output is already there and may not be replaced.
    #[error(
        "{} already exists\n  Hint: pass --force to replace it or -o to pick another name",
        path.display()
    )]
    OutputExists {
        /// Existing output.
        path: PathBuf,
    },

    /// The output file or directory could not be created.
    #[error("Cannot create {}: {source}", path.display())]
    FailedToCreateOutput {
        /// Output path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Writing the output failed part way.
    #[error("Cannot write {}: {source}", path.display())]
    FailedToWrite {
        /// Output path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// An option value is out of range or malformed.
    #[error("Invalid option: {message}")]
    InvalidConfig {
        /// What is wrong.
        message: String,
    },

    /// The user answered no at the overwrite prompt.
    #[error("Cancelled")]
    Cancelled,

    /// I/O failure outside a known input or output path.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// Anything else.
    #[error("{message}")]
    Other {
        /// Message shown to the user.
        message: String,
    },
}

impl From<lopdf::Error> for PdfyError {
    fn from(err: lopdf::Error) -> Self {
        Self::other(err.to_string())
    }
}

/// Option parsing uses `anyhow` internally; it surfaces as a bad option.
impl From<anyhow::Error> for PdfyError {
    fn from(err: anyhow::Error) -> Self {
        Self::invalid_config(format!("{err:#}"))
    }
}

impl PdfyError {
    /// See [`PdfyError::FileNotFound`].
    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    /// See [`PdfyError::NotAFile`].
    pub fn not_a_file(path: PathBuf) -> Self {
        Self::NotAFile { path }
    }

    /// See [`PdfyError::NotAPdf`].
    pub fn not_a_pdf(path: PathBuf, reason: impl Into<String>) -> Self {
        Self::NotAPdf {
            path,
            reason: reason.into(),
        }
    }

    /// See [`PdfyError::FailedToLoadPdf`].
    pub fn failed_to_load_pdf(path: PathBuf, reason: impl Into<String>) -> Self {
        Self::FailedToLoadPdf {
            path,
            reason: reason.into(),
        }
    }

    /// See [`PdfyError::CorruptedPdf`].
    pub fn corrupted_pdf(path: PathBuf, details: impl Into<String>) -> Self {
        Self::CorruptedPdf {
            path,
            details: details.into(),
        }
    }

    /// See [`PdfyError::EncryptedPdf`].
    pub fn encrypted_pdf(path: PathBuf) -> Self {
        Self::EncryptedPdf { path }
    }

    /// See [`PdfyError::IncorrectPassword`].
    pub fn incorrect_password(path: PathBuf) -> Self {
        Self::IncorrectPassword { path }
    }

    /// See [`PdfyError::InvalidPlacement`].
    pub fn invalid_placement(id: u64, reason: impl Into<String>) -> Self {
        Self::InvalidPlacement {
            id,
            reason: reason.into(),
        }
    }

    /// See [`PdfyError::InvalidSignature`].
    pub fn invalid_signature(reason: impl Into<String>) -> Self {
        Self::InvalidSignature {
            reason: reason.into(),
        }
    }

    /// See [`PdfyError::OperationFailed`].
    pub fn operation_failed(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::OperationFailed {
            operation,
            reason: reason.into(),
        }
    }

    /// See [`PdfyError::OutputExists`].
    pub fn output_exists(path: PathBuf) -> Self {
        Self::OutputExists { path }
    }

    /// See [`PdfyError::InvalidConfig`].
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// See [`PdfyError::Other`].
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Whether the error is confined to one input file.
    ///
    /// Merge skips such inputs under `--continue-on-error`.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NotAPdf { .. }
                | Self::FailedToLoadPdf { .. }
                | Self::CorruptedPdf { .. }
                | Self::EncryptedPdf { .. }
                | Self::InvalidPageRange { .. }
        )
    }

    /// Process exit code; see the module docs for the table.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoInputFiles
            | Self::InvalidPageRange { .. }
            | Self::InvalidPlacement { .. }
            | Self::InvalidSignature { .. }
            | Self::InvalidConfig { .. }
            | Self::Other { .. } => 1,
            Self::FileNotFound { .. } | Self::FileNotAccessible { .. } | Self::NotAFile { .. } => 2,
            Self::NotAPdf { .. }
            | Self::FailedToLoadPdf { .. }
            | Self::CorruptedPdf { .. }
            | Self::EncryptedPdf { .. }
            | Self::IncorrectPassword { .. } => 3,
            Self::OutputExists { .. } => 4,
            Self::FailedToCreateOutput { .. } | Self::FailedToWrite { .. } | Self::Io { .. } => 5,
            Self::OperationFailed { .. } => 6,
            Self::Cancelled => 130,
        }
    }
}
