use school_report::config::{PipelineConfig, WriterConfig};
use school_report::output::{ErrorSink, JsonWriter};
use school_report::pipeline::{InputPaths, process};
use school_report::ReportError;
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

fn fixture_dir(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn inputs_in(dir: &Path) -> InputPaths {
    InputPaths {
        courses: dir.join("courses.csv"),
        students: dir.join("students.csv"),
        tests: dir.join("tests.csv"),
        marks: dir.join("marks.csv"),
    }
}

/// Collects reported messages instead of writing them anywhere.
#[derive(Default)]
struct RecordingSink {
    messages: RefCell<Vec<String>>,
}

impl ErrorSink for RecordingSink {
    fn report(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}

fn run_fixture(name: &str) -> (Result<serde_json::Value, ReportError>, Vec<String>) {
    let out_dir = tempfile::tempdir().unwrap();
    let output = out_dir.path().join("output.json");
    let writer = JsonWriter::create(&output, WriterConfig::default()).unwrap();
    let sink = RecordingSink::default();

    let result = process(
        &inputs_in(&fixture_dir(name)),
        &writer,
        &sink,
        &PipelineConfig::default(),
    )
    .map(|_| serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap());

    (result, sink.messages.into_inner())
}

fn write_school(dir: &Path, courses: &str, students: &str, tests: &str, marks: &str) -> InputPaths {
    fs::write(dir.join("courses.csv"), courses).unwrap();
    fs::write(dir.join("students.csv"), students).unwrap();
    fs::write(dir.join("tests.csv"), tests).unwrap();
    fs::write(dir.join("marks.csv"), marks).unwrap();
    inputs_in(dir)
}

fn run_school(inputs: &InputPaths, output: &Path) -> Result<(), ReportError> {
    let writer = JsonWriter::create(output, WriterConfig::default()).unwrap();
    let sink = RecordingSink::default();
    process(inputs, &writer, &sink, &PipelineConfig::default()).map(|_| ())
}

#[test]
fn test_full_pipeline_matches_expected_output() {
    let (result, messages) = run_fixture("example1");

    let expected: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(fixture_dir("example1").join("output.json")).unwrap(),
    )
    .unwrap();

    assert_eq!(result.unwrap(), expected);
    assert!(messages.is_empty());
}

#[test]
fn test_full_pipeline_is_byte_identical_across_runs() {
    let out_dir = tempfile::tempdir().unwrap();
    let inputs = inputs_in(&fixture_dir("example1"));

    let first = out_dir.path().join("first.json");
    let second = out_dir.path().join("second.json");
    run_school(&inputs, &first).unwrap();
    run_school(&inputs, &second).unwrap();

    let first = fs::read(&first).unwrap();
    let second = fs::read(&second).unwrap();
    assert_eq!(first, second);
    // byte-identical to the checked-in expectation as well
    assert_eq!(
        first,
        fs::read(fixture_dir("example1").join("output.json")).unwrap()
    );
}

#[test]
fn test_headers_without_rows_gives_empty_student_list() {
    let (result, _) = run_fixture("cols_no_rows");
    assert_eq!(result.unwrap(), serde_json::json!({"students": []}));
}

#[test]
fn test_empty_courses_file_is_reported() {
    let (result, messages) = run_fixture("empty_files");

    let courses = fixture_dir("empty_files").join("courses.csv");
    let expected = format!("Input file: {}, has no data in it.", courses.display());

    assert!(matches!(result, Err(ReportError::EmptyInput { .. })));
    assert_eq!(messages, vec![expected]);
}

#[test]
fn test_rows_without_header_miss_id_column() {
    let (result, messages) = run_fixture("rows_no_cols");

    let courses = fixture_dir("rows_no_cols").join("courses.csv");
    let expected = format!(
        "Columns in input file {} are insufficient. It does not contain necessary column: id.",
        courses.display()
    );

    assert!(matches!(result, Err(ReportError::MissingColumn { .. })));
    assert_eq!(messages, vec![expected]);
}

#[test]
fn test_bad_test_weights() {
    let (result, messages) = run_fixture("bad_test_weights");

    assert!(result.is_err());
    assert_eq!(
        messages,
        vec!["Invalid course weights. Course has id: 1, weight total is not 100. Total: 110"]
    );
}

#[test]
fn test_duplicate_students() {
    let (_, messages) = run_fixture("duplicate_students");
    assert_eq!(
        messages,
        vec!["Duplicate found with id 1. Found with row: {'id': '1', 'name': 'D'}"]
    );
}

#[test]
fn test_duplicate_courses() {
    let dir = tempfile::tempdir().unwrap();
    let inputs = write_school(
        dir.path(),
        "id,name,teacher\n1,Biology,Mr. D\n1,Chemistry,Mrs. E\n",
        "id,name\n1,A\n",
        "id,course_id,weight\n1,1,100\n",
        "test_id,student_id,mark\n1,1,50\n",
    );

    let err = run_school(&inputs, &dir.path().join("output.json")).unwrap_err();

    assert_eq!(
        err.to_string(),
        "Duplicate found with id 1. Found with row: {'id': '1', 'name': 'Chemistry', 'teacher': 'Mrs. E'}"
    );
}

#[test]
fn test_unknown_student_in_marks() {
    let dir = tempfile::tempdir().unwrap();
    let inputs = write_school(
        dir.path(),
        "id,name,teacher\n1,Biology,Mr. D\n",
        "id,name\n1,A\n",
        "id,course_id,weight\n1,1,100\n",
        "test_id,student_id,mark\n1,1,50\n1,4,60\n",
    );

    let err = run_school(&inputs, &dir.path().join("output.json")).unwrap_err();

    assert_eq!(
        err.to_string(),
        "No such student with id 4 exists. Found in marks with row: {'test_id': '1', 'student_id': '4', 'mark': '60'}"
    );
}

#[test]
fn test_missing_input_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut inputs = write_school(
        dir.path(),
        "id,name,teacher\n",
        "id,name\n",
        "id,course_id,weight\n",
        "test_id,student_id,mark\n",
    );
    inputs.courses = PathBuf::from("bad_file_path");

    let err = run_school(&inputs, &dir.path().join("output.json")).unwrap_err();

    assert_eq!(
        err.to_string(),
        "There was an error opening input file with path: bad_file_path"
    );
}

#[test]
fn test_binary_writes_report_and_exits_zero() {
    let out_dir = tempfile::tempdir().unwrap();
    let output = out_dir.path().join("output.json");
    let fixtures = fixture_dir("example1");

    let status = Command::new(env!("CARGO_BIN_EXE_school_report"))
        .arg(fixtures.join("courses.csv"))
        .arg(fixtures.join("students.csv"))
        .arg(fixtures.join("tests.csv"))
        .arg(fixtures.join("marks.csv"))
        .arg(&output)
        .env("LOG_FILE_PATH", out_dir.path().join("logs/run.log"))
        .status()
        .expect("run school_report");

    assert!(status.success());
    assert_eq!(
        fs::read(&output).unwrap(),
        fs::read(fixtures.join("output.json")).unwrap()
    );
}

#[test]
fn test_binary_error_artifact_and_nonzero_exit() {
    let out_dir = tempfile::tempdir().unwrap();
    let output = out_dir.path().join("output.json");
    let fixtures = fixture_dir("bad_test_weights");

    let status = Command::new(env!("CARGO_BIN_EXE_school_report"))
        .arg(fixtures.join("courses.csv"))
        .arg(fixtures.join("students.csv"))
        .arg(fixtures.join("tests.csv"))
        .arg(fixtures.join("marks.csv"))
        .arg(&output)
        .env("LOG_FILE_PATH", out_dir.path().join("logs/run.log"))
        .status()
        .expect("run school_report");

    assert!(!status.success());
    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(
        value,
        serde_json::json!({"error": "Invalid course weights. Course has id: 1, weight total is not 100. Total: 110"})
    );
}

#[test]
fn test_binary_wrong_argument_count_prints_error() {
    let out_dir = tempfile::tempdir().unwrap();

    let result = Command::new(env!("CARGO_BIN_EXE_school_report"))
        .arg("courses.csv")
        .arg("students.csv")
        .env("LOG_FILE_PATH", out_dir.path().join("logs/run.log"))
        .output()
        .expect("run school_report");

    assert!(!result.status.success());
    let value: serde_json::Value = serde_json::from_slice(&result.stdout).unwrap();
    assert_eq!(
        value,
        serde_json::json!({"error": "Too few file names specified in command line arguments."})
    );
}

#[test]
fn test_binary_reports_failure_on_stderr_when_logging_is_unavailable() {
    let out_dir = tempfile::tempdir().unwrap();
    let output = out_dir.path().join("output.json");
    let fixtures = fixture_dir("bad_test_weights");
    // A regular file where the log directory should be makes logging setup fail.
    let blocker = out_dir.path().join("not_a_dir");
    fs::write(&blocker, "").unwrap();

    let result = Command::new(env!("CARGO_BIN_EXE_school_report"))
        .arg(fixtures.join("courses.csv"))
        .arg(fixtures.join("students.csv"))
        .arg(fixtures.join("tests.csv"))
        .arg(fixtures.join("marks.csv"))
        .arg(&output)
        .env("LOG_FILE_PATH", blocker.join("logs/run.log"))
        .output()
        .expect("run school_report");

    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("Logging disabled"));
    assert!(stderr.contains(
        "Invalid course weights. Course has id: 1, weight total is not 100. Total: 110"
    ));
    assert!(output.exists());
}
