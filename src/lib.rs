pub mod config;
pub mod error;
pub mod grading;
pub mod output;
pub mod parser;
pub mod pipeline;

pub use error::{ReportError, Result};
pub use pipeline::{InputPaths, build_report, load_school_data, process};
