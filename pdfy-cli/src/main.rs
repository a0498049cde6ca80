//! pdfy - Sign, merge, split, number and edit PDF files locally.

mod cli;
mod commands;

use clap::Parser;
use std::process;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, GlobalArgs};
use crate::commands::Context;
use pdfy::config::{OutputConfig, OverwriteMode};
use pdfy::error::PdfyError;
use pdfy::output::OutputFormatter;

#[tokio::main]
async fn main() {
    let Cli { global, command } = Cli::parse();
    init_tracing(&global);

    let ctx = Context {
        formatter: OutputFormatter::new(global.quiet, global.verbose),
        global,
    };

    if let Err(err) = run(&ctx, command).await {
        ctx.formatter.error(&err.to_string());
        process::exit(err.exit_code());
    }
}

/// Diagnostics go to stderr; `RUST_LOG` overrides the default level.
fn init_tracing(global: &GlobalArgs) {
    let default = if global.verbose { "pdfy=debug" } else { "pdfy=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(ctx: &Context, command: Command) -> Result<(), PdfyError> {
    match command {
        Command::Merge(args) => commands::merge(ctx, args).await,
        Command::Split(args) => commands::split(ctx, args).await,
        Command::Sign(args) => commands::sign(ctx, args).await,
        Command::Compress(args) => commands::compress(ctx, args).await,
        Command::Protect(args) => commands::protect(ctx, args).await,
        Command::Unlock(args) => commands::unlock(ctx, args).await,
        Command::Rotate(args) => commands::rotate(ctx, args).await,
        Command::Number(args) => commands::number(ctx, args).await,
        Command::Watermark(args) => commands::watermark(ctx, args).await,
        Command::Metadata(command) => commands::metadata(ctx, command).await,
        Command::ExtractText(args) => commands::extract_text(ctx, args).await,
    }
}

/// Decide whether an existing output may be replaced.
///
/// Outputs that do not exist yet always pass.
pub(crate) async fn handle_output_overwrite(
    config: &OutputConfig,
    formatter: &OutputFormatter,
) -> Result<(), PdfyError> {
    if !tokio::fs::try_exists(&config.output).await.unwrap_or(false) {
        return Ok(());
    }

    let refuse = || PdfyError::output_exists(config.output.clone());
    match config.overwrite_mode {
        OverwriteMode::Force => Ok(()),
        OverwriteMode::NoClobber => Err(refuse()),
        // Nobody to ask in quiet mode.
        OverwriteMode::Prompt if formatter.is_quiet() => Err(refuse()),
        OverwriteMode::Prompt => {
            formatter.warning(&format!("{} already exists", config.output.display()));
            if confirm("Overwrite? [y/N]: ")? {
                Ok(())
            } else {
                Err(PdfyError::Cancelled)
            }
        }
    }
}

fn confirm(question: &str) -> Result<bool, PdfyError> {
    use std::io::{self, Write};

    print!("{question}");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
