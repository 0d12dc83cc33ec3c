//! End-to-end run: decode the four input files, validate, aggregate, write.

use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::config::PipelineConfig;
use crate::error::{EXPECTED_FILE_ARGS, ReportError, Result};
use crate::grading::averages::compute_averages;
use crate::grading::builders::{FromRow, build_records};
use crate::grading::linker::{MARK_COLUMNS, associate_coursework, associate_marks};
use crate::grading::report::assemble_report;
use crate::grading::types::{Course, SchoolReport, Student, Test};
use crate::grading::weights::check_course_test_weights;
use crate::output::{ErrorSink, JsonWriter};
use crate::parser::{Table, decode};

/// Paths of the four input files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputPaths {
    pub courses: PathBuf,
    pub students: PathBuf,
    pub tests: PathBuf,
    pub marks: PathBuf,
}

impl InputPaths {
    /// Splits CLI file arguments, ordered courses, students, tests, marks,
    /// output, into the input paths and the output path.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::ArgumentCountMismatch`] unless exactly five
    /// paths are given.
    pub fn from_args(files: Vec<PathBuf>) -> Result<(Self, PathBuf)> {
        let found = files.len();
        let Ok([courses, students, tests, marks, output]) =
            <[PathBuf; EXPECTED_FILE_ARGS]>::try_from(files)
        else {
            return Err(ReportError::ArgumentCountMismatch {
                found,
                expected: EXPECTED_FILE_ARGS,
            });
        };
        Ok((
            Self {
                courses,
                students,
                tests,
                marks,
            },
            output,
        ))
    }
}

/// The four decoded input files, each checked for its required columns.
#[derive(Debug, Clone)]
pub struct SchoolData {
    pub courses: Table,
    pub students: Table,
    pub tests: Table,
    pub marks: Table,
}

fn load_table(path: &Path, columns: &[&str]) -> Result<Table> {
    let table = decode(path)?;
    table.validate_columns(columns)?;
    Ok(table)
}

/// Reads courses, students, tests and marks in that order; the first failing
/// file aborts.
#[tracing::instrument(skip_all)]
pub fn load_school_data(inputs: &InputPaths) -> Result<SchoolData> {
    let data = SchoolData {
        courses: load_table(&inputs.courses, Course::COLUMNS)?,
        students: load_table(&inputs.students, Student::COLUMNS)?,
        tests: load_table(&inputs.tests, Test::COLUMNS)?,
        marks: load_table(&inputs.marks, MARK_COLUMNS)?,
    };

    info!(
        courses = data.courses.len(),
        students = data.students.len(),
        tests = data.tests.len(),
        marks = data.marks.len(),
        "Input files loaded"
    );
    Ok(data)
}

/// Runs every validation and aggregation stage over decoded data.
#[tracing::instrument(skip_all, fields(max_course_weight = config.max_course_weight))]
pub fn build_report(data: &SchoolData, config: &PipelineConfig) -> Result<SchoolReport> {
    let mut courses = build_records::<Course>(&data.courses.rows)?;
    let mut students = build_records::<Student>(&data.students.rows)?;
    let tests = build_records::<Test>(&data.tests.rows)?;

    associate_marks(&mut students, &data.marks.rows)?;
    associate_coursework(&mut students, &tests)?;

    check_course_test_weights(&mut courses, &tests, config.max_course_weight)?;

    compute_averages(&mut students)?;

    Ok(assemble_report(&students, &courses))
}

/// Loads, validates and aggregates the inputs, then writes the report.
///
/// On failure the error message is handed to `sink` before the error is
/// returned, so the caller only decides the exit status.
#[tracing::instrument(skip_all, fields(output = %writer.path().display()))]
pub fn process(
    inputs: &InputPaths,
    writer: &JsonWriter,
    sink: &dyn ErrorSink,
    config: &PipelineConfig,
) -> Result<SchoolReport> {
    let result = load_school_data(inputs)
        .and_then(|data| build_report(&data, config))
        .and_then(|report| {
            writer.write(&report)?;
            Ok(report)
        });

    match result {
        Ok(report) => {
            info!(
                students = report.students.len(),
                output = %writer.path().display(),
                "Execution finished successfully"
            );
            Ok(report)
        }
        Err(e) => {
            error!(error = %e, "Run failed");
            sink.report(&e.to_string());
            Err(e)
        }
    }
}
