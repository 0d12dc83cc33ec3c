use tracing::{debug, warn};

use crate::error::{ReportError, Result};
use crate::grading::types::{Courses, Tests};

/// Adds every test's weight to its course and checks each course total against
/// `max_weight`.
///
/// Totals below `max_weight` are accepted.
///
/// # Errors
///
/// - [`ReportError::UnknownCourseReference`] if a test names a course that does
///   not exist.
/// - [`ReportError::CourseWeightOverflow`] for the lowest course id whose final
///   total exceeds `max_weight`.
pub fn check_course_test_weights(
    courses: &mut Courses,
    tests: &Tests,
    max_weight: i64,
) -> Result<()> {
    for course in courses.values_mut() {
        course.test_weight_sum = 0;
    }

    for test in tests.values() {
        let Some(course) = courses.get_mut(&test.course_id) else {
            return Err(ReportError::UnknownCourseReference {
                course_id: test.course_id,
                test_id: test.id,
            });
        };
        course.test_weight_sum += i128::from(test.weight);
    }

    for course in courses.values() {
        if course.test_weight_sum > i128::from(max_weight) {
            return Err(ReportError::CourseWeightOverflow {
                course_id: course.id,
                total: course.test_weight_sum,
                max: max_weight,
            });
        }
        if course.test_weight_sum < i128::from(max_weight) {
            debug!(
                course_id = course.id,
                total = course.test_weight_sum,
                "Course weights below maximum"
            );
        }
    }

    if tests.is_empty() && !courses.is_empty() {
        warn!(courses = courses.len(), "No tests recorded for any course");
    }

    Ok(())
}
