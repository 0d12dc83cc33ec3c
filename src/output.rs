//! Output artifacts: the report writer and the error sinks.
//!
//! Every run ends with exactly one JSON artifact, either the report or a
//! single-key `{"error": ...}` object.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::{debug, error};

use crate::config::WriterConfig;
use crate::error::{ReportError, Result};
use crate::grading::types::ErrorReport;

/// Serializes `value` as indented JSON according to `config`.
pub fn to_json_bytes(value: &impl Serialize, config: &WriterConfig) -> Result<Vec<u8>> {
    let indent = vec![b' '; config.indent];
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(&indent));
    value.serialize(&mut ser)?;
    if config.trailing_newline {
        buf.push(b'\n');
    }
    Ok(buf)
}

/// Writes JSON documents to one output file.
#[derive(Debug, Clone)]
pub struct JsonWriter {
    path: PathBuf,
    config: WriterConfig,
}

impl JsonWriter {
    /// Creates a writer for `path`, checking up front that the file can be
    /// created. The file is truncated.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::OutputUnwritable`] if the file cannot be created.
    pub fn create(path: impl Into<PathBuf>, config: WriterConfig) -> Result<Self> {
        let path = path.into();
        File::create(&path).map_err(|source| ReportError::OutputUnwritable {
            path: path.clone(),
            source,
        })?;
        Ok(Self { path, config })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replaces the file contents with `value` as JSON.
    pub fn write(&self, value: &impl Serialize) -> Result<()> {
        let bytes = to_json_bytes(value, &self.config)?;
        fs::write(&self.path, &bytes).map_err(|source| ReportError::OutputUnwritable {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), bytes = bytes.len(), "Wrote JSON output");
        Ok(())
    }
}

/// Destination for the error artifact of a failed run.
pub trait ErrorSink {
    /// Emits `{"error": message}`. Failures to emit are logged, not returned,
    /// since there is nowhere left to report them.
    fn report(&self, message: &str);
}

/// Writes the error artifact to the run's output file.
pub struct JsonFileErrorSink {
    writer: JsonWriter,
}

impl JsonFileErrorSink {
    pub fn new(writer: JsonWriter) -> Self {
        Self { writer }
    }
}

impl ErrorSink for JsonFileErrorSink {
    fn report(&self, message: &str) {
        let artifact = ErrorReport {
            error: message.to_string(),
        };
        if let Err(e) = self.writer.write(&artifact) {
            error!(error = %e, "Failed to write error artifact");
        }
    }
}

/// Prints the error artifact to stdout. Used when no output file is known.
pub struct StdoutErrorSink {
    config: WriterConfig,
}

impl StdoutErrorSink {
    pub fn new(config: WriterConfig) -> Self {
        Self { config }
    }
}

impl ErrorSink for StdoutErrorSink {
    fn report(&self, message: &str) {
        let artifact = ErrorReport {
            error: message.to_string(),
        };
        let written = to_json_bytes(&artifact, &self.config).and_then(|bytes| {
            std::io::stdout()
                .lock()
                .write_all(&bytes)
                .map_err(|source| ReportError::OutputUnwritable {
                    path: PathBuf::from("<stdout>"),
                    source,
                })
        });
        if let Err(e) = written {
            error!(error = %e, "Failed to print error artifact");
        }
    }
}
