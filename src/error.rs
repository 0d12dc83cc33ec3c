//! Error taxonomy for the grading pipeline.
//!
//! Every failure is fatal: a run either produces the full report or exactly
//! one [`ReportError`], whose `Display` text becomes the `"error"` value of the
//! error artifact.

use std::path::PathBuf;
use thiserror::Error;

use crate::parser::Row;

/// Number of positional file arguments the CLI expects.
pub const EXPECTED_FILE_ARGS: usize = 5;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("There was an error opening input file with path: {}", .path.display())]
    FileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Input file: {}, has no data in it.", .path.display())]
    EmptyInput { path: PathBuf },

    #[error("Input file {} could not be parsed: {source}", .path.display())]
    MalformedCsv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error(
        "Columns in input file {} are insufficient. It does not contain necessary column: {column}.",
        .path.display()
    )]
    MissingColumn { path: PathBuf, column: String },

    #[error("Duplicate found with id {id}. Found with row: {row}")]
    DuplicateId { id: i64, row: Row },

    #[error("Field {field} has non-integer value '{value}'. Found with row: {row}")]
    MalformedField {
        field: String,
        value: String,
        row: Row,
    },

    #[error("No such student with id {student_id} exists. Found in marks with row: {row}")]
    UnknownStudentReference { student_id: i64, row: Row },

    #[error("No such test with id {test_id} exists. Found in marks for student with id {student_id}")]
    UnknownTestReference { test_id: i64, student_id: i64 },

    #[error("No such course with id {course_id} exists. Found in tests for test with id {test_id}")]
    UnknownCourseReference { course_id: i64, test_id: i64 },

    #[error("Invalid course weights. Course has id: {course_id}, weight total is not {max}. Total: {total}")]
    CourseWeightOverflow {
        course_id: i64,
        total: i128,
        max: i64,
    },

    #[error("Weighted score total is out of range for student with id {student_id} in course with id {course_id}")]
    ScoreOutOfRange { student_id: i64, course_id: i64 },

    #[error("{}", argument_count_message(.found, .expected))]
    ArgumentCountMismatch { found: usize, expected: usize },

    #[error("Cannot write output file {}: {source}", .path.display())]
    OutputUnwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize output JSON: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;

fn argument_count_message(found: &usize, expected: &usize) -> &'static str {
    if found < expected {
        "Too few file names specified in command line arguments."
    } else {
        "Too many file names specified in command line arguments."
    }
}
