use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use mnf_archive::NullOodle;
use mnf_extract::{ExtractAllOptions, ProcessTextureConverter};
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "mnf-extracter",
    about = "Extraction toolchain for MNF manifests, DAT archives, ZOSFT filename sidecars and LANG string stores",
    version
)]
struct Cli {
    /// Set the logging level
    #[arg(long, value_enum, global = true, default_value = "info")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a manifest for the first entry whose payload parses as ZOSFT
    TestZosft(TestZosftArgs),
    /// Dump every index entry to CSV, unfiltered
    DumpMnf(DumpMnfArgs),
    /// Dump retained entries with resolved filenames to CSV
    DumpIndex(DumpIndexArgs),
    /// Rich per-entry CSV dump, including per-archive tuple uniqueness
    DebugMnf(DebugMnfArgs),
    /// Extract every retained entry
    ExtractAll(ExtractAllArgs),
    /// Extract a single entry by raw id
    ExtractFile(ExtractFileArgs),
    /// Split a `.lang` file into one CSV per domain
    ParseLng(ParseLngArgs),
    /// Rebuild a `.lang` file from a directory of domain CSVs
    WriteLng(WriteLngArgs),
}

#[derive(clap::Args)]
struct TestZosftArgs {
    /// Path to the `.mnf` manifest
    #[arg(long, short)]
    input: PathBuf,
}

#[derive(clap::Args)]
struct DumpMnfArgs {
    /// Path to the `.mnf` manifest
    #[arg(long, short)]
    input: PathBuf,
    /// Path to write the CSV dump to
    #[arg(long, short)]
    output: PathBuf,
}

#[derive(clap::Args)]
struct DumpIndexArgs {
    /// Path to the `.mnf` manifest
    #[arg(long, short)]
    input: PathBuf,
    /// Path to write the CSV dump to
    #[arg(long, short)]
    output: PathBuf,
}

#[derive(clap::Args)]
struct DebugMnfArgs {
    /// Path to the `.mnf` manifest
    #[arg(long, short)]
    input: PathBuf,
    /// Path to write the CSV dump to
    #[arg(long, short)]
    output: PathBuf,
}

#[derive(clap::Args)]
struct ExtractAllArgs {
    /// Path to the `.mnf` manifest
    #[arg(long, short)]
    input: PathBuf,
    /// Directory to extract into
    #[arg(long, short)]
    output: PathBuf,
    /// Worker pool size, clamped to 1..=5
    #[arg(long, short, default_value_t = mnf_extract::DEFAULT_WORKERS)]
    threads: usize,
    /// Write a SHA-1 hash sum file covering every extracted path
    #[arg(long = "hashSumFile", short = 'H')]
    hash_sum_file: Option<PathBuf>,
    /// Convert every extracted `.dds` to this format ("jpg" or "png")
    #[arg(long = "convert-dds-to")]
    convert_dds_to: Option<String>,
    /// Path to the texconv-compatible converter binary
    #[arg(long = "texconv-path", default_value = "texconv")]
    texconv_path: String,
}

#[derive(clap::Args)]
struct ExtractFileArgs {
    /// Path to the `.mnf` manifest
    #[arg(long, short)]
    input: PathBuf,
    /// Directory to extract into
    #[arg(long, short)]
    output: PathBuf,
    /// Raw id, `(0x)?<8 hex digits>-<8 hex digits>`
    #[arg(long)]
    id: String,
}

#[derive(clap::Args)]
struct ParseLngArgs {
    /// Path to the `.lang` file
    #[arg(long, short)]
    input: PathBuf,
    /// Directory to write one CSV per domain into
    #[arg(long, short)]
    output: PathBuf,
}

#[derive(clap::Args)]
struct WriteLngArgs {
    /// Directory of domain CSVs to read
    #[arg(long, short)]
    input: PathBuf,
    /// Path to write the rebuilt `.lang` file to
    #[arg(long, short)]
    output: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(Level::from(cli.log_level))
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::TestZosft(args) => run_test_zosft(&args),
        Commands::DumpMnf(args) => mnf_extract::dump_mnf(&args.input, &args.output).map_err(anyhow::Error::from),
        Commands::DumpIndex(args) => {
            mnf_extract::dump_index(&args.input, &args.output, &NullOodle).map_err(anyhow::Error::from)
        }
        Commands::DebugMnf(args) => {
            mnf_extract::debug_mnf(&args.input, &args.output, &NullOodle).map_err(anyhow::Error::from)
        }
        Commands::ExtractAll(args) => run_extract_all(&args),
        Commands::ExtractFile(args) => {
            mnf_extract::extract_file(&args.input, &args.output, &args.id, &NullOodle)
                .map_err(anyhow::Error::from)
        }
        Commands::ParseLng(args) => {
            mnf_extract::parse_lng(&args.input, &args.output).map_err(anyhow::Error::from)
        }
        Commands::WriteLng(args) => {
            mnf_extract::write_lng(&args.input, &args.output).map_err(anyhow::Error::from)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run_test_zosft(args: &TestZosftArgs) -> anyhow::Result<()> {
    match mnf_extract::test_zosft(&args.input, &NullOodle)? {
        Some(id) => println!("found ZOSFT payload at id {id}"),
        None => println!("no entry parsed as ZOSFT"),
    }
    Ok(())
}

fn run_extract_all(args: &ExtractAllArgs) -> anyhow::Result<()> {
    let options = ExtractAllOptions {
        threads: args.threads,
        hash_sum_file: args.hash_sum_file.clone(),
        convert_dds_to: args.convert_dds_to.clone(),
    };
    let converter = ProcessTextureConverter {
        binary: args.texconv_path.clone(),
    };

    let stats = mnf_extract::extract_all(&args.input, &args.output, &options, &NullOodle, &converter)?;
    tracing::info!(processed = stats.processed, failed = stats.failed, "extraction finished");
    Ok(())
}
