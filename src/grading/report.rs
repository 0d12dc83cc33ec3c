use crate::grading::types::{CourseReport, Courses, SchoolReport, StudentReport, Students};

/// Projects students and courses into the output report.
///
/// Students are listed by ascending id, and each student's courses by
/// ascending course id. Course name and teacher come from `courses`; the
/// average is the student's own.
pub fn assemble_report(students: &Students, courses: &Courses) -> SchoolReport {
    let students = students
        .values()
        .map(|student| StudentReport {
            id: student.id,
            name: student.name.clone(),
            total_average: student.total_average,
            courses: student
                .course_averages
                .iter()
                .filter_map(|(course_id, &average)| {
                    let course = courses.get(course_id);
                    debug_assert!(
                        course.is_some(),
                        "course {course_id} has averages but no course record"
                    );
                    course.map(|course| CourseReport {
                        id: course.id,
                        name: course.name.clone(),
                        teacher: course.teacher.clone(),
                        course_average: average,
                    })
                })
                .collect(),
        })
        .collect();

    SchoolReport { students }
}
