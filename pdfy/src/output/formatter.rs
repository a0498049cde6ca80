//! Status lines for the person running a tool.
//!
//! Status lines go to stdout; warnings and errors go to stderr so that
//! `pdfy extract-text -o -` style pipelines stay clean.
//!
//! # Examples
//!
//! ```
//! use pdfy::output::formatter::OutputFormatter;
//!
//! let formatter = OutputFormatter::new(false, false);
//! formatter.info("Signing contract.pdf");
//! formatter.success("Wrote signed-contract.pdf");
//! ```

use crate::config::OutputConfig;
use std::io::{self, IsTerminal};

/// Kind of status line; picks the prefix, colour and stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    /// Progress ("Merging 3 file(s)...").
    Info,
    /// A file was written.
    Success,
    /// Something was skipped or needs attention.
    Warning,
    /// The tool failed.
    Error,
    /// Verbose-only detail.
    Debug,
}

impl MessageLevel {
    fn prefix(self) -> &'static str {
        match self {
            Self::Info => "",
            Self::Success => "✓ ",
            Self::Warning => "⚠ ",
            Self::Error => "✗ ",
            Self::Debug => "→ ",
        }
    }

    fn color(self) -> &'static str {
        match self {
            Self::Info => "",
            Self::Success => "\x1b[32m",
            Self::Warning => "\x1b[33m",
            Self::Error => "\x1b[31m",
            Self::Debug => "\x1b[36m",
        }
    }

    fn to_stderr(self) -> bool {
        matches!(self, Self::Warning | Self::Error)
    }
}

/// Prints status lines according to `--quiet` and `--verbose`.
///
/// Colour is decided per stream: only lines headed for a terminal get it.
#[derive(Debug, Clone)]
pub struct OutputFormatter {
    quiet: bool,
    verbose: bool,
    stdout_colored: bool,
    stderr_colored: bool,
}

impl OutputFormatter {
    /// Formatter for the given `--quiet` and `--verbose` flags.
    pub fn new(quiet: bool, verbose: bool) -> Self {
        let term = std::env::var_os("TERM").is_some();
        Self {
            quiet,
            verbose,
            stdout_colored: term && io::stdout().is_terminal(),
            stderr_colored: term && io::stderr().is_terminal(),
        }
    }

    /// Use the verbosity of an [`OutputConfig`].
    pub fn from_output_config(config: &OutputConfig) -> Self {
        Self::new(config.quiet, config.verbose)
    }

    /// Warnings and errors only.
    pub fn quiet() -> Self {
        Self::new(true, false)
    }

    /// Everything, including debug lines and details.
    pub fn verbose() -> Self {
        Self::new(false, true)
    }

    /// Progress line; hidden when quiet.
    pub fn info(&self, message: &str) {
        if !self.quiet {
            self.print_message(MessageLevel::Info, message);
        }
    }

    /// Finished-step line; hidden when quiet.
    pub fn success(&self, message: &str) {
        if !self.quiet {
            self.print_message(MessageLevel::Success, message);
        }
    }

    /// Always shown, on stderr.
    pub fn warning(&self, message: &str) {
        self.print_message(MessageLevel::Warning, message);
    }

    /// Always shown, on stderr.
    pub fn error(&self, message: &str) {
        self.print_message(MessageLevel::Error, message);
    }

    /// Verbose only.
    pub fn debug(&self, message: &str) {
        if self.verbose {
            self.print_message(MessageLevel::Debug, message);
        }
    }

    fn colored(&self, level: MessageLevel) -> bool {
        if level.to_stderr() {
            self.stderr_colored
        } else {
            self.stdout_colored
        }
    }

    fn print_message(&self, level: MessageLevel, message: &str) {
        let line = render_line(level, message, self.colored(level));
        if level.to_stderr() {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    }

    /// Indented `label: value`; verbose only.
    pub fn detail(&self, label: &str, value: &str) {
        if self.verbose {
            println!("  {label}: {value}");
        }
    }

    /// Indented `n. message`; hidden when quiet.
    pub fn list_item(&self, index: usize, message: &str) {
        if !self.quiet {
            println!("  {index}. {message}");
        }
    }

    /// Whether info and success lines are shown.
    pub fn should_print(&self) -> bool {
        !self.quiet
    }

    /// `--verbose` was given.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// `--quiet` was given.
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }
}

impl Default for OutputFormatter {
    fn default() -> Self {
        Self::new(false, false)
    }
}

fn render_line(level: MessageLevel, message: &str, colored: bool) -> String {
    let prefix = level.prefix();
    let color = level.color();
    if colored && !color.is_empty() {
        format!("{color}{prefix}{message}\x1b[0m")
    } else {
        format!("{prefix}{message}")
    }
}
