//! CLI entry point for the school report tool.
//!
//! Reads courses, students, tests and marks CSV files, validates them against
//! each other, and writes per-student course and total averages as JSON.

use anyhow::Result;
use clap::Parser;
use school_report::config::{
    DEFAULT_INDENT, DEFAULT_MAX_COURSE_WEIGHT, PipelineConfig, WriterConfig,
};
use school_report::output::{ErrorSink, JsonFileErrorSink, JsonWriter, StdoutErrorSink};
use school_report::pipeline::{InputPaths, process};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "school_report")]
#[command(about = "Validate school grading records and report student averages", long_about = None)]
struct Cli {
    /// courses.csv students.csv tests.csv marks.csv output.json
    #[arg(value_name = "FILES")]
    files: Vec<PathBuf>,

    /// Maximum allowed sum of test weights in one course
    #[arg(long, default_value_t = DEFAULT_MAX_COURSE_WEIGHT)]
    max_course_weight: i64,

    /// Spaces per indentation level in the written JSON
    #[arg(long, default_value_t = DEFAULT_INDENT)]
    indent: usize,
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok(); // Load .env file

    let log_guard = match init_logging() {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Logging disabled: {e}");
            None
        }
    };

    let cli = Cli::parse();
    let writer_config = WriterConfig::default().with_indent(cli.indent);
    let pipeline_config = PipelineConfig {
        max_course_weight: cli.max_course_weight,
    };

    info!("Starting school report");

    // Without a valid output path the error artifact goes to stdout.
    let stdout_sink = StdoutErrorSink::new(writer_config);

    let (inputs, output) = match InputPaths::from_args(cli.files) {
        Ok(paths) => paths,
        Err(e) => {
            tracing::error!(error = %e, "Bad arguments");
            if log_guard.is_none() {
                eprintln!("{e}");
            }
            stdout_sink.report(&e.to_string());
            return ExitCode::FAILURE;
        }
    };

    let writer = match JsonWriter::create(&output, writer_config) {
        Ok(writer) => writer,
        Err(e) => {
            tracing::error!(error = %e, "Output file unusable");
            if log_guard.is_none() {
                eprintln!("{e}");
            }
            stdout_sink.report(&e.to_string());
            return ExitCode::FAILURE;
        }
    };

    let sink = JsonFileErrorSink::new(writer.clone());
    match process(&inputs, &writer, &sink, &pipeline_config) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            // No subscriber means the run failure would otherwise go unseen.
            if log_guard.is_none() {
                eprintln!("{e}");
            }
            ExitCode::FAILURE
        }
    }
}

/// Logging setup: colored stderr + JSON rolling log file.
fn init_logging() -> Result<WorkerGuard> {
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/school_report.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("school_report.log"));

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(log_file_name.to_string_lossy())
        .build(log_dir)?;
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .try_init()?;

    Ok(guard)
}
