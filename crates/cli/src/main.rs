use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use nfprep_pipeline::{batch_concurrency, collect_inputs, process_batch, Settings};
use nfprep_unifier::{ConfigDocument, Detection, TextEncoding};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

mod artifacts;

#[derive(Parser)]
#[command(name = "nfprep")]
#[command(
    about = "Prepare network-function configuration files for model ingestion",
    long_about = None
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON)
    #[arg(long, global = true)]
    quiet: bool,

    /// Settings file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Desensitize, unify, chunk and analyse a file or a directory
    Process(ProcessArgs),

    /// Print the detected format and encoding of a file
    Detect(DetectArgs),

    /// Print the effective desensitization catalog in priority order
    Patterns,
}

#[derive(Args)]
struct ProcessArgs {
    /// Input file or directory
    input: PathBuf,

    /// Output directory
    #[arg(long, short, default_value = "output")]
    output: PathBuf,

    #[arg(long)]
    no_desensitize: bool,

    #[arg(long)]
    no_unify: bool,

    #[arg(long)]
    no_chunk: bool,

    #[arg(long)]
    no_metadata: bool,

    /// Maximum lines per chunk, overlap included
    #[arg(long)]
    max_lines: Option<usize>,

    /// Maximum bytes per chunk
    #[arg(long)]
    max_bytes: Option<usize>,

    /// Lines repeated between consecutive chunks
    #[arg(long)]
    overlap_lines: Option<usize>,

    /// File-name glob used when INPUT is a directory
    #[arg(long)]
    pattern: Option<String>,

    /// Only process files directly inside INPUT
    #[arg(long)]
    no_recursive: bool,

    /// Print the batch summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct DetectArgs {
    file: PathBuf,
}

impl ProcessArgs {
    fn apply(&self, settings: &mut Settings) {
        let stages = &mut settings.pipeline;
        stages.desensitize &= !self.no_desensitize;
        stages.unify_format &= !self.no_unify;
        stages.chunk &= !self.no_chunk;
        stages.extract_metadata &= !self.no_metadata;

        if let Some(max_lines) = self.max_lines {
            settings.chunking.max_lines = max_lines;
        }
        if let Some(max_bytes) = self.max_bytes {
            settings.chunking.max_bytes = max_bytes;
        }
        if let Some(overlap) = self.overlap_lines {
            settings.chunking.overlap_lines = overlap;
        }
        if let Some(pattern) = &self.pattern {
            settings.batch.pattern = pattern.clone();
        }
        if self.no_recursive {
            settings.batch.recursive = false;
        }
    }
}

#[derive(Serialize)]
struct DetectOutput<'a> {
    file: String,
    #[serde(flatten)]
    detection: &'a Detection,
    encoding: TextEncoding,
    line_count: usize,
    size_bytes: usize,
}

#[derive(Serialize)]
struct PatternOutput<'a> {
    name: &'a str,
    strategy: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
}

fn load_settings(path: Option<&Path>) -> Result<Settings> {
    match path {
        Some(path) => Settings::from_path(path)
            .with_context(|| format!("Failed to load settings from {}", path.display())),
        None => Ok(Settings::default()),
    }
}

async fn run_process(args: ProcessArgs, mut settings: Settings) -> Result<()> {
    args.apply(&mut settings);
    let options = Arc::new(settings.process_options()?);

    let inputs = collect_inputs(
        &args.input,
        &settings.batch.pattern,
        settings.batch.recursive,
    )?;
    if inputs.is_empty() {
        bail!(
            "No input files under {} match '{}'",
            args.input.display(),
            settings.batch.pattern
        );
    }

    let concurrency = batch_concurrency(settings.batch.concurrency);
    let summary = process_batch(inputs, options, concurrency).await;
    artifacts::write_batch_artifacts(&args.output, &args.input, &summary)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        for report in &summary.reports {
            let status = if report.success { "ok" } else { "FAILED" };
            println!("{status:>6}  {}", report.filename);
            for error in &report.errors {
                println!("        {error}");
            }
        }
        println!(
            "{} files: {} succeeded, {} failed. Output in {}",
            summary.total_files,
            summary.successful,
            summary.failed,
            args.output.display()
        );
    }

    if !summary.all_succeeded() {
        bail!("{} of {} files failed", summary.failed, summary.total_files);
    }
    Ok(())
}

fn run_detect(args: DetectArgs) -> Result<()> {
    let raw = std::fs::read(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let filename = args.file.display().to_string();
    let document = ConfigDocument::load(&raw, &filename)?;
    let output = DetectOutput {
        file: filename,
        detection: document.detection(),
        encoding: document.encoding(),
        line_count: document.line_count(),
        size_bytes: document.size_bytes(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn run_patterns(settings: &Settings) -> Result<()> {
    let catalog = settings.build_catalog()?;
    let output: Vec<_> = catalog
        .patterns()
        .iter()
        .map(|p| PatternOutput {
            name: p.name(),
            strategy: p.strategy().kind(),
            description: p.description(),
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut cli = Cli::parse();

    let json_output = match &cli.command {
        Commands::Process(args) => args.json,
        Commands::Detect(_) | Commands::Patterns => true,
    };
    if json_output {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let settings = load_settings(cli.config.as_deref())?;

    match cli.command {
        Commands::Process(args) => run_process(args, settings).await?,
        Commands::Detect(args) => run_detect(args)?,
        Commands::Patterns => run_patterns(&settings)?,
    }

    Ok(())
}
