//! CLI entry point for the vozni_red timetable generator.
//!
//! Provides subcommands for rendering a single line record and for running
//! the full pipeline: discover JSON records, render each to Markdown, and
//! aggregate everything into one combined, indexed timetable.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use vozni_red::{
    combine::combine,
    output::{write_atomic, write_document},
    record::parse_record,
    render::{RenderedDocument, render},
};
use walkdir::WalkDir;

/// Name of the aggregate document written into the output directory.
const COMBINED_FILENAME: &str = "Combined_Timetable.md";

#[derive(Parser)]
#[command(name = "vozni_red")]
#[command(about = "Generates Markdown timetables from bus line records", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render every line record and write the combined timetable
    Generate {
        /// Directory containing line record JSON files
        #[arg(short, long, default_value = "linije")]
        input: PathBuf,

        /// Directory to write Markdown timetables to
        #[arg(short, long, default_value = "timetables")]
        output: PathBuf,
    },
    /// Render a single line record JSON file to stdout
    Render {
        /// Path to the JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/vozni_red.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("vozni_red.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { input, output } => {
            generate(&input, &output)?;
        }
        Commands::Render { file } => {
            let doc = render_file(&file)?;
            print!("{}", doc.markdown);
        }
    }

    Ok(())
}

/// Runs the full pipeline: walk `input` for JSON records, render each to a
/// Markdown document in `output`, then write the combined timetable.
///
/// Content errors in a record (unparseable JSON, no stops) are logged and
/// the record is skipped; the batch continues. Read and write errors abort
/// the run.
#[tracing::instrument(fields(input = %input.display(), output = %output.display()))]
fn generate(input: &Path, output: &Path) -> Result<()> {
    std::fs::create_dir_all(output)
        .with_context(|| format!("failed to create output directory {}", output.display()))?;

    let mut record_paths = Vec::new();
    for entry in WalkDir::new(input) {
        let entry = entry?;
        if entry.file_type().is_file()
            && entry.path().extension().and_then(|e| e.to_str()) == Some("json")
        {
            record_paths.push(entry.into_path());
        }
    }
    record_paths.sort();

    info!(record_count = record_paths.len(), "Line records discovered");

    let mut documents = Vec::new();
    let mut failed = 0usize;

    for path in &record_paths {
        let bytes =
            std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;

        match render_bytes(&bytes, stem_of(path)) {
            Ok(doc) => {
                write_document(output, &doc)?;
                info!(file = %path.display(), out = %doc.filename, "Line rendered");
                documents.push(doc);
            }
            Err(e) => {
                error!(file = %path.display(), error = %e, "Skipping record");
                failed += 1;
            }
        }
    }

    if documents.is_empty() {
        warn!("No records rendered, combined timetable will hold only the index header");
    }

    let combined = combine(&documents, Utc::now());
    let combined_path = output.join(COMBINED_FILENAME);
    write_atomic(&combined_path, &combined)?;

    info!(
        rendered = documents.len(),
        failed,
        combined = %combined_path.display(),
        "Timetable generation finished"
    );
    Ok(())
}

/// Reads, parses, and renders one record file.
fn render_file(path: &Path) -> Result<RenderedDocument> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    render_bytes(&bytes, stem_of(path))
}

/// Parses and renders one record from raw JSON bytes. A failure here is a
/// content error in the record itself, not an I/O problem.
fn render_bytes(bytes: &[u8], stem: &str) -> Result<RenderedDocument> {
    let record = parse_record(bytes)?;
    Ok(render(&record, stem)?)
}

fn stem_of(path: &Path) -> &str {
    path.file_stem().and_then(|s| s.to_str()).unwrap_or("linija")
}
