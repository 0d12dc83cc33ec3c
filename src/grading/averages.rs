use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::error::{ReportError, Result};
use crate::grading::types::{CourseworkEntry, Student, Students};
use crate::grading::utility::{mean, round_2_decimals};

/// Every course is graded out of this nominal full weight.
const FULL_WEIGHT: f64 = 100.0;

/// Weighted course average: `sum(score * weight) / 100`, rounded to 2 decimals.
///
/// The divisor is always the full weight, not the number of tests taken or
/// the weight actually recorded.
///
/// Returns `None` if the weighted points do not fit in an `i128`.
pub fn course_average(entries: &[CourseworkEntry]) -> Option<f64> {
    let points = entries.iter().try_fold(0i128, |acc, e| {
        acc.checked_add(i128::from(e.score) * i128::from(e.weight))
    })?;
    Some(round_2_decimals(points as f64 / FULL_WEIGHT))
}

/// Fills in `course_averages` and `total_average` for one student.
///
/// A student without coursework gets a total average of `0.0`.
///
/// # Errors
///
/// Returns [`ReportError::ScoreOutOfRange`] if a course's weighted points
/// overflow.
pub fn compute_student_averages(student: &mut Student) -> Result<()> {
    let mut course_averages = BTreeMap::new();
    for (&course_id, entries) in &student.coursework {
        let Some(average) = course_average(entries) else {
            return Err(ReportError::ScoreOutOfRange {
                student_id: student.id,
                course_id,
            });
        };
        course_averages.insert(course_id, average);
    }
    student.course_averages = course_averages;

    if student.course_averages.is_empty() {
        warn!(student_id = student.id, "Student has no recorded marks");
    }

    let averages: Vec<f64> = student.course_averages.values().copied().collect();
    student.total_average = round_2_decimals(mean(&averages));

    debug!(
        student_id = student.id,
        courses = averages.len(),
        total_average = student.total_average,
        "Computed averages"
    );
    Ok(())
}

/// Computes averages for every student.
pub fn compute_averages(students: &mut Students) -> Result<()> {
    for student in students.values_mut() {
        compute_student_averages(student)?;
    }
    Ok(())
}
