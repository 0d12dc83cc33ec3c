//! Referential linking of marks to students, and of students to courses.

use tracing::debug;

use crate::error::{ReportError, Result};
use crate::grading::types::{CourseworkEntry, Mark, Students, Tests};
use crate::parser::Row;

/// Columns the marks file must carry.
pub const MARK_COLUMNS: &[&str] = &["test_id", "student_id", "mark"];

impl Mark {
    pub fn from_row(row: &Row) -> Result<Self> {
        Ok(Mark {
            test_id: row.int("test_id")?,
            student_id: row.int("student_id")?,
            score: row.int("mark")?,
        })
    }
}

/// Folds every marks row into its student's raw marks.
///
/// A repeated `(student, test)` pair overwrites the earlier score.
///
/// # Errors
///
/// Returns [`ReportError::UnknownStudentReference`] for a mark whose student id
/// is not in `students`.
pub fn associate_marks(students: &mut Students, marks: &[Row]) -> Result<()> {
    for row in marks {
        let mark = Mark::from_row(row)?;

        let Some(student) = students.get_mut(&mark.student_id) else {
            return Err(ReportError::UnknownStudentReference {
                student_id: mark.student_id,
                row: row.clone(),
            });
        };

        if let Some(previous) = student.record_mark(mark.test_id, mark.score) {
            debug!(
                student_id = mark.student_id,
                test_id = mark.test_id,
                previous,
                score = mark.score,
                "Overwriting earlier mark"
            );
        }
    }

    Ok(())
}

/// Groups each student's raw marks by the course their test belongs to.
///
/// Entries within a course keep the order of the marks file.
///
/// # Errors
///
/// Returns [`ReportError::UnknownTestReference`] for a mark on a test id that
/// is not in `tests`.
pub fn associate_coursework(students: &mut Students, tests: &Tests) -> Result<()> {
    for student in students.values_mut() {
        for &(test_id, score) in &student.raw_marks {
            let Some(test) = tests.get(&test_id) else {
                return Err(ReportError::UnknownTestReference {
                    test_id,
                    student_id: student.id,
                });
            };

            student
                .coursework
                .entry(test.course_id)
                .or_default()
                .push(CourseworkEntry {
                    test_id,
                    score,
                    weight: test.weight,
                });
        }

        debug!(
            student_id = student.id,
            courses = student.coursework.len(),
            "Linked coursework"
        );
    }

    Ok(())
}
