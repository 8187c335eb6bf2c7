//! Textprep: acquire and prepare line-oriented text datasets.
//!
//! A dataset is downloaded as an archive, its line file is extracted, split
//! into train and test partitions and optionally sampled. Labeled corpora laid
//! out as one directory per class can be flattened into a single
//! `label\ttext` file.
//!
//! # Modules
//!
//! - [`dataset`]: [`Dataset`] metadata, the [`DatasetSource`] trait and the
//!   file operations (acquire, extract, split, sample, label, count)
//! - [`resource`]: [`Resource`], the prepared files and their tabular view
//! - [`config`]: YAML dataset descriptions
//! - [`error`]: Error types for textprep operations

pub mod config;
pub mod dataset;
pub mod error;
pub mod resource;

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;

pub use config::{ArchiveDataset, DatasetConfig};
pub use dataset::{Dataset, DatasetSource, DownloadOptions};
pub use error::TextprepError;
pub use resource::{DataOptions, Resource, Split, Table};

/// The textprep CLI application.
#[derive(Parser)]
#[command(name = "textprep")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    /// Report format ('text' or 'json').
    #[arg(long, global = true, value_enum, default_value_t = ReportFormat::Text)]
    output: ReportFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Count the lines of a file.
    Count(CountArgs),
    /// Split a line file into train and test files.
    Split(SplitArgs),
    /// Write a random sample of a line file's lines.
    Sample(SampleArgs),
    /// Label files by the subdirectory that contains them.
    Label(LabelArgs),
    /// List the file members of a zip or tar.gz archive.
    List(ListArgs),
    /// Extract members of a zip or tar.gz archive next to it.
    Extract(ExtractArgs),
    /// Download and prepare a dataset described by a YAML config.
    Download(DownloadArgs),
}

#[derive(clap::Args)]
struct CountArgs {
    input: PathBuf,
}

#[derive(clap::Args)]
struct SplitArgs {
    input: PathBuf,

    /// Fraction of lines (taken from the end) that go to the test file.
    #[arg(long, default_value_t = dataset::DEFAULT_TEST_SIZE)]
    test_size: f64,

    /// Keep the input file after splitting.
    #[arg(long)]
    keep_raw: bool,
}

#[derive(clap::Args)]
struct SampleArgs {
    input: PathBuf,

    /// Number of lines to sample.
    #[arg(short = 'n', long = "count")]
    count: usize,

    /// Seed for a reproducible selection.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(clap::Args)]
struct LabelArgs {
    /// Directory holding one subdirectory per label.
    root: PathBuf,

    /// Output file.
    output_file: PathBuf,

    /// Subdirectory to label mapping, e.g. --map pos=1 --map neg=0.
    #[arg(long = "map", value_parser = parse_mapping, required = true)]
    mapping: Vec<(String, String)>,

    /// Files read per worker batch.
    #[arg(long, default_value_t = 10)]
    task_size: usize,
}

#[derive(clap::Args)]
struct ListArgs {
    archive: PathBuf,
}

#[derive(clap::Args)]
struct ExtractArgs {
    archive: PathBuf,

    /// Member paths inside the archive.
    #[arg(required = true)]
    members: Vec<String>,
}

#[derive(clap::Args)]
struct DownloadArgs {
    /// Dataset config (YAML).
    #[arg(long)]
    config: PathBuf,

    /// Directory the dataset is prepared in.
    #[arg(long, env = "TEXTPREP_ROOT")]
    root: PathBuf,

    /// Overrides the config's test_size.
    #[arg(long)]
    test_size: Option<f64>,

    /// Overrides the config's sample_count.
    #[arg(long)]
    sample_count: Option<usize>,

    /// Keep the archive and the extracted raw file.
    #[arg(long)]
    keep_raw: bool,
}

fn parse_mapping(value: &str) -> Result<(String, String), String> {
    match value.split_once('=') {
        Some((dir, label)) if !dir.is_empty() => Ok((dir.to_string(), label.to_string())),
        _ => Err(format!("expected DIR=LABEL, got '{value}'")),
    }
}

/// Run the textprep CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), TextprepError> {
    let cli = Cli::parse();
    let format = cli.output;

    match cli.command {
        Some(Commands::Count(args)) => run_count(args, format),
        Some(Commands::Split(args)) => run_split(args, format),
        Some(Commands::Sample(args)) => run_sample(args, format),
        Some(Commands::Label(args)) => run_label(args, format),
        Some(Commands::List(args)) => run_list(args, format),
        Some(Commands::Extract(args)) => run_extract(args, format),
        Some(Commands::Download(args)) => run_download(args, format),
        None => {
            println!("textprep {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Acquire and prepare line-oriented text datasets.");
            println!();
            println!("Run 'textprep --help' for usage information.");
            Ok(())
        }
    }
}

fn emit(format: ReportFormat, text: String, report: serde_json::Value) -> Result<(), TextprepError> {
    match format {
        ReportFormat::Text => println!("{text}"),
        ReportFormat::Json => {
            let rendered = serde_json::to_string_pretty(&report)
                .map_err(|source| TextprepError::Io(source.into()))?;
            println!("{rendered}");
        }
    }
    Ok(())
}

fn run_count(args: CountArgs, format: ReportFormat) -> Result<(), TextprepError> {
    let lines = dataset::lines::count_lines(&args.input)?;
    emit(
        format,
        format!("{} lines in {}", lines, args.input.display()),
        json!({ "path": args.input.display().to_string(), "lines": lines }),
    )
}

fn run_split(args: SplitArgs, format: ReportFormat) -> Result<(), TextprepError> {
    let (train, test) = dataset::split::train_test_split(&args.input, args.test_size, args.keep_raw)?;
    emit(
        format,
        format!("train: {}\ntest: {}", train.display(), test.display()),
        json!({
            "train_file_path": train.display().to_string(),
            "test_file_path": test.display().to_string(),
        }),
    )
}

fn run_sample(args: SampleArgs, format: ReportFormat) -> Result<(), TextprepError> {
    let samples = match args.seed {
        Some(seed) => dataset::sample::make_samples_seeded(&args.input, args.count, seed)?,
        None => dataset::sample::make_samples(&args.input, args.count)?,
    };
    emit(
        format,
        format!("samples: {}", samples.display()),
        json!({
            "sample_file_path": samples.display().to_string(),
            "sample_count": args.count,
        }),
    )
}

fn run_label(args: LabelArgs, format: ReportFormat) -> Result<(), TextprepError> {
    let mapping: BTreeMap<String, String> = args.mapping.into_iter().collect();
    let output =
        dataset::label::label_by_dir(&args.output_file, &args.root, &mapping, args.task_size)?;
    let lines = dataset::lines::count_lines(&output)?;
    emit(
        format,
        format!("labeled {} file(s) into {}", lines, output.display()),
        json!({ "output": output.display().to_string(), "lines": lines }),
    )
}

fn run_list(args: ListArgs, format: ReportFormat) -> Result<(), TextprepError> {
    let members = dataset::extract::list_members(&args.archive)?;
    emit(format, members.join("\n"), json!({ "members": members }))
}

fn run_extract(args: ExtractArgs, format: ReportFormat) -> Result<(), TextprepError> {
    let paths = dataset::extract::extract_members(&args.archive, &args.members)?;
    let paths: Vec<String> = paths
        .iter()
        .map(|path| path.display().to_string())
        .collect();
    emit(format, paths.join("\n"), json!({ "extracted": paths }))
}

fn run_download(args: DownloadArgs, format: ReportFormat) -> Result<(), TextprepError> {
    let config = DatasetConfig::from_yaml_file(&args.config)?;
    let mut opts = config.download_options();
    if let Some(test_size) = args.test_size {
        opts.test_size = test_size;
    }
    if args.sample_count.is_some() {
        opts.sample_count = args.sample_count;
    }
    opts.keep_raw |= args.keep_raw;

    let source = ArchiveDataset::from_config(&config);
    let resource = source.download(&args.root, &opts)?;

    let mut text = format!(
        "dataset: {} ({})\ntrain: {}\ntest: {}",
        config.name,
        source.member(),
        resource.train_file_path.display(),
        resource.test_file_path.display()
    );
    if let Some(samples) = &resource.sample_file_path {
        text.push_str(&format!("\nsamples: {}", samples.display()));
    }
    let report = serde_json::to_value(&resource).map_err(|source| TextprepError::Io(source.into()))?;
    emit(format, text, report)
}
