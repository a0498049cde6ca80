//! One function per subcommand: load, run the tool, write the result.

use lopdf::Document;
use std::path::{Path, PathBuf};

use crate::cli::{
    CompressArgs, ExtractTextArgs, FileArgs, GlobalArgs, MergeArgs, MetadataCommand,
    MetadataSetArgs, NumberArgs, ProtectArgs, RotateArgs, SignArgs, SignatureArgs, SplitArgs,
    UnlockArgs, WatermarkArgs,
};
use crate::handle_output_overwrite;
use pdfy::config::{CompressionLevel, OutputConfig, prefixed_output_path};
use pdfy::error::{PdfyError, Result};
use pdfy::geometry::Size;
use pdfy::io::{LoadedPdf, PdfReader, PdfWriter, WriteOptions};
use pdfy::metadata::{DocumentMetadata, parse_keywords, read_metadata, write_metadata};
use pdfy::output::{
    OutputFormatter, display_merge_summary, display_write_statistics, format_metadata,
};
use pdfy::tools::{
    MergeInput, MergeOptions, PageNumberOptions, ProtectOptions, SignatureImage,
    SignaturePlacements, SignatureSource, SplitMode, WatermarkOptions,
};
use pdfy::utils::{collect_paths_for_patterns, file_stem, format_file_size, read_input_list};

/// Flags and output shared by all commands.
pub struct Context {
    pub global: GlobalArgs,
    pub formatter: OutputFormatter,
}

impl Context {
    fn output_config(&self, output: PathBuf) -> OutputConfig {
        OutputConfig {
            overwrite_mode: self.global.overwrite_mode(),
            dry_run: self.global.dry_run,
            verbose: self.global.verbose,
            quiet: self.global.quiet,
            ..OutputConfig::new(output)
        }
    }

    async fn load(&self, path: &Path) -> Result<LoadedPdf> {
        let loaded = PdfReader::new().load(path).await?;
        self.formatter.debug(&format!(
            "Loaded {} ({} pages, {})",
            path.display(),
            loaded.page_count,
            format_file_size(loaded.file_size)
        ));
        Ok(loaded)
    }

    /// Write `doc` to `output`, honouring dry runs and the overwrite mode.
    async fn save(
        &self,
        doc: &Document,
        inputs: &[PathBuf],
        output: PathBuf,
        writer: PdfWriter,
    ) -> Result<()> {
        let config = self.output_config(output);
        config.validate(inputs)?;

        if config.dry_run {
            self.formatter
                .success(&format!("Dry run: would write {}", config.output.display()));
            return Ok(());
        }

        handle_output_overwrite(&config, &self.formatter).await?;
        let stats = writer.save_with_stats(doc, &config.output).await?;
        display_write_statistics(&self.formatter, &stats);
        Ok(())
    }

    async fn save_single(&self, doc: &Document, file: &FileArgs, prefix: &str) -> Result<()> {
        self.save_single_with(doc, file, prefix, PdfWriter::new()).await
    }

    async fn save_single_with(
        &self,
        doc: &Document,
        file: &FileArgs,
        prefix: &str,
        writer: PdfWriter,
    ) -> Result<()> {
        let output = file
            .output
            .clone()
            .unwrap_or_else(|| prefixed_output_path(&file.input, prefix));
        self.save(doc, std::slice::from_ref(&file.input), output, writer)
            .await
    }
}

fn writer_for(level: CompressionLevel) -> PdfWriter {
    match level {
        CompressionLevel::None => PdfWriter::verbatim(),
        _ => PdfWriter::with_options(WriteOptions::default()),
    }
}

/// Expand glob patterns and `file.pdf:range` suffixes into merge inputs.
async fn merge_inputs(args: &MergeArgs) -> Result<Vec<MergeInput>> {
    let mut specs = args.inputs.clone();
    if let Some(list) = &args.input_list {
        for path in read_input_list(list).await? {
            specs.push(path.to_string_lossy().into_owned());
        }
    }

    let mut inputs = Vec::new();
    for spec in &specs {
        let parsed = MergeInput::parse(spec);
        let pattern = parsed.path.to_string_lossy().into_owned();
        for path in collect_paths_for_patterns([pattern])? {
            inputs.push(MergeInput {
                path,
                pages: parsed.pages.clone(),
            });
        }
    }

    if inputs.is_empty() {
        return Err(PdfyError::NoInputFiles);
    }
    Ok(inputs)
}

pub async fn merge(ctx: &Context, args: MergeArgs) -> Result<()> {
    let inputs = merge_inputs(&args).await?;
    ctx.formatter
        .info(&format!("Merging {} file(s)...", inputs.len()));

    let options = MergeOptions {
        page_range: args.pages.clone(),
        continue_on_error: args.continue_on_error,
        jobs: usize::from(args.jobs),
    };
    let mut result = pdfy::tools::merge_files(&inputs, &options).await?;
    display_merge_summary(&ctx.formatter, &result);

    pdfy::tools::compress_document(&mut result.document, args.compression)?;

    let paths: Vec<PathBuf> = inputs.into_iter().map(|input| input.path).collect();
    ctx.save(
        &result.document,
        &paths,
        args.output.clone(),
        writer_for(args.compression),
    )
    .await
}

pub async fn split(ctx: &Context, args: SplitArgs) -> Result<()> {
    let loaded = ctx.load(&args.input).await?;

    let mode = if !args.mode.ranges.is_empty() {
        SplitMode::Ranges(args.mode.ranges.clone())
    } else if let Some(size) = args.mode.chunk {
        SplitMode::Chunks(size)
    } else if let Some(range) = &args.mode.extract {
        SplitMode::Extract(range.clone())
    } else {
        SplitMode::EveryPage
    };

    let parts = pdfy::tools::split_document(&loaded.document, &mode)?;
    ctx.formatter
        .info(&format!("Split into {} part(s)", parts.len()));

    let dir = match &args.output_dir {
        Some(dir) => dir.clone(),
        None => args
            .input
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default(),
    };
    if !ctx.global.dry_run {
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| PdfyError::FailedToCreateOutput {
                path: dir.clone(),
                source,
            })?;
    }

    let stem = file_stem(&args.input);
    for part in &parts {
        let output = dir.join(format!("{stem}-{}.pdf", part.label()));
        ctx.save(
            &part.document,
            std::slice::from_ref(&args.input),
            output,
            PdfWriter::new(),
        )
        .await?;
    }
    Ok(())
}

async fn signature_source(args: &SignatureArgs) -> Result<SignatureSource> {
    if let Some(path) = &args.image {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| PdfyError::FileNotAccessible {
                path: path.clone(),
                source,
            })?;
        return Ok(SignatureSource::Image(SignatureImage::from_bytes(&bytes)?));
    }
    if let Some(url) = &args.data_url {
        return Ok(SignatureSource::Image(SignatureImage::from_data_url(url)?));
    }
    match &args.text {
        Some(text) => SignatureSource::typed(text),
        None => Err(PdfyError::invalid_config(
            "Give a signature with --image, --data-url or --text",
        )),
    }
}

async fn placements(args: &SignArgs) -> Result<SignaturePlacements> {
    if let Some(path) = &args.placements {
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| PdfyError::FileNotAccessible {
                path: path.clone(),
                source,
            })?;
        return SignaturePlacements::from_json(&json);
    }

    let Some((width, height)) = args.rendered else {
        return Err(PdfyError::invalid_config(
            "Place the signature with --click and --rendered, or --placements",
        ));
    };

    let mut placements = SignaturePlacements::new();
    for click in &args.click {
        placements.place(click.page - 1, click.x, click.y, Size::new(width, height))?;
    }
    Ok(placements)
}

pub async fn sign(ctx: &Context, args: SignArgs) -> Result<()> {
    let signature = signature_source(&args.signature).await?;
    let placements = placements(&args).await?;

    // Placements map onto the page boxes of a fresh parse of the input.
    let mut loaded = ctx.load(&args.file.input).await?;
    let drawn = pdfy::tools::apply_signatures(&mut loaded.document, &signature, &placements)?;
    ctx.formatter
        .info(&format!("Placed {drawn} signature(s)"));

    ctx.save_single(&loaded.document, &args.file, "signed").await
}

pub async fn compress(ctx: &Context, args: CompressArgs) -> Result<()> {
    let mut loaded = ctx.load(&args.file.input).await?;
    let report = pdfy::tools::compress_document(&mut loaded.document, args.level)?;
    ctx.formatter.info(&format!(
        "Removed {} unused object(s); input was {}",
        report.objects_removed(),
        format_file_size(loaded.file_size)
    ));

    ctx.save_single_with(&loaded.document, &args.file, "compressed", writer_for(args.level))
        .await
}

pub async fn protect(ctx: &Context, args: ProtectArgs) -> Result<()> {
    let mut loaded = ctx.load(&args.file.input).await?;
    let options = ProtectOptions {
        user_password: args.password.clone(),
        owner_password: args.owner_password.clone(),
    };
    pdfy::tools::protect_document(&mut loaded.document, &options)?;

    // Encrypted objects must be written as they are.
    ctx.save_single_with(&loaded.document, &args.file, "protected", PdfWriter::verbatim())
        .await
}

pub async fn unlock(ctx: &Context, args: UnlockArgs) -> Result<()> {
    let input = &args.file.input;
    let bytes = PdfReader::new().read(input).await?;
    let doc = pdfy::tools::unlock_pdf(&bytes, input, &args.password)?;
    ctx.formatter
        .info(&format!("Removed the password from {}", input.display()));

    ctx.save_single(&doc, &args.file, "unlocked").await
}

pub async fn rotate(ctx: &Context, args: RotateArgs) -> Result<()> {
    let mut loaded = ctx.load(&args.file.input).await?;
    let rotated = pdfy::tools::rotate_pages(&mut loaded.document, args.degrees, args.pages.as_ref())?;
    ctx.formatter.info(&format!(
        "Rotated {rotated} page(s) by {} degrees",
        args.degrees.as_degrees()
    ));

    ctx.save_single(&loaded.document, &args.file, "rotated").await
}

pub async fn number(ctx: &Context, args: NumberArgs) -> Result<()> {
    let mut loaded = ctx.load(&args.file.input).await?;
    let options = PageNumberOptions {
        position: args.position,
        format: args.format,
        start_number: args.start,
        margin: args.margin,
        font_size: args.font_size,
        pages: args.pages.clone(),
    };
    let stamped = pdfy::tools::add_page_numbers(&mut loaded.document, &options)?;
    ctx.formatter
        .info(&format!("Numbered {stamped} page(s) at {}", args.position));

    ctx.save_single(&loaded.document, &args.file, "numbered").await
}

pub async fn watermark(ctx: &Context, args: WatermarkArgs) -> Result<()> {
    let mut loaded = ctx.load(&args.file.input).await?;
    let options = WatermarkOptions {
        font_size: args.font_size,
        opacity: args.opacity,
        diagonal: !args.straight,
        pages: args.pages.clone(),
        ..WatermarkOptions::new(args.text.clone())
    };
    let stamped = pdfy::tools::add_watermark(&mut loaded.document, &options)?;
    ctx.formatter
        .info(&format!("Watermarked {stamped} page(s)"));

    ctx.save_single(&loaded.document, &args.file, "watermarked").await
}

pub async fn metadata(ctx: &Context, command: MetadataCommand) -> Result<()> {
    match command {
        MetadataCommand::Show(args) => {
            let loaded = ctx.load(&args.input).await?;
            let metadata = read_metadata(&loaded.document);
            if args.json {
                let json = serde_json::to_string_pretty(&metadata)
                    .map_err(|e| PdfyError::other(format!("Failed to encode metadata: {e}")))?;
                println!("{json}");
            } else {
                println!("{}", format_metadata(&metadata));
            }
            Ok(())
        }
        MetadataCommand::Set(args) => set_metadata(ctx, args).await,
    }
}

/// Fields given on the command line, applied on top of `base`.
fn edited_metadata(base: DocumentMetadata, args: &MetadataSetArgs) -> DocumentMetadata {
    let changes = DocumentMetadata {
        title: args.title.clone(),
        author: args.author.clone(),
        subject: args.subject.clone(),
        keywords: Vec::new(),
        creator: args.creator.clone(),
        producer: args.producer.clone(),
    };

    let mut metadata = base.merged_with(changes);
    // An empty --keywords clears them, unlike an absent flag.
    if let Some(keywords) = &args.keywords {
        metadata.keywords = parse_keywords(keywords);
    }
    metadata
}

async fn set_metadata(ctx: &Context, args: MetadataSetArgs) -> Result<()> {
    let mut loaded = ctx.load(&args.file.input).await?;

    let base = if args.clear {
        DocumentMetadata::default()
    } else {
        read_metadata(&loaded.document)
    };
    let metadata = edited_metadata(base, &args);
    write_metadata(&mut loaded.document, &metadata)?;

    for line in format_metadata(&metadata).lines() {
        ctx.formatter.debug(line);
    }

    // Only the information dictionary changes; page streams keep their bytes.
    ctx.save_single_with(&loaded.document, &args.file, "metadata", PdfWriter::verbatim())
        .await
}

pub async fn extract_text(ctx: &Context, args: ExtractTextArgs) -> Result<()> {
    let loaded = ctx.load(&args.input).await?;
    let text = pdfy::tools::extract_text(&loaded.document, args.pages.as_ref())?;

    let output = match &args.output {
        Some(path) if path.as_os_str() == "-" => {
            println!("{text}");
            return Ok(());
        }
        Some(path) => path.clone(),
        None => args
            .input
            .with_file_name(format!("{}.txt", file_stem(&args.input))),
    };

    let config = ctx.output_config(output);
    config.validate(std::slice::from_ref(&args.input))?;
    if config.dry_run {
        ctx.formatter
            .success(&format!("Dry run: would write {}", config.output.display()));
        return Ok(());
    }

    handle_output_overwrite(&config, &ctx.formatter).await?;
    let stats = PdfWriter::new()
        .write_bytes(text.into_bytes(), &config.output)
        .await?;
    display_write_statistics(&ctx.formatter, &stats);
    Ok(())
}
