//! Data types used by the grading pipeline.

use serde::Serialize;
use std::collections::BTreeMap;

/// A taught unit. `test_weight_sum` is filled in by weight validation; it is
/// wider than a single weight so summing any number of tests cannot overflow.
#[derive(Debug, Clone, PartialEq)]
pub struct Course {
    pub id: i64,
    pub name: String,
    pub teacher: String,
    pub test_weight_sum: i128,
}

impl Course {
    pub fn new(id: i64, name: impl Into<String>, teacher: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            teacher: teacher.into(),
            test_weight_sum: 0,
        }
    }
}

/// A gradable event belonging to exactly one course.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Test {
    pub id: i64,
    pub course_id: i64,
    pub weight: i64,
}

/// One student's score on one test, as read from the marks file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark {
    pub test_id: i64,
    pub student_id: i64,
    pub score: i64,
}

/// A recorded test result inside one of a student's courses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CourseworkEntry {
    pub test_id: i64,
    pub score: i64,
    pub weight: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Student {
    pub id: i64,
    pub name: String,
    /// `(test_id, score)` in first-seen order of the marks file.
    pub raw_marks: Vec<(i64, i64)>,
    pub coursework: BTreeMap<i64, Vec<CourseworkEntry>>,
    pub course_averages: BTreeMap<i64, f64>,
    pub total_average: f64,
}

impl Student {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            raw_marks: Vec::new(),
            coursework: BTreeMap::new(),
            course_averages: BTreeMap::new(),
            total_average: 0.0,
        }
    }

    /// Records `score` for `test_id`, replacing any earlier score in place.
    ///
    /// Returns the replaced score, if there was one.
    pub fn record_mark(&mut self, test_id: i64, score: i64) -> Option<i64> {
        match self.raw_marks.iter_mut().find(|(id, _)| *id == test_id) {
            Some((_, existing)) => Some(std::mem::replace(existing, score)),
            None => {
                self.raw_marks.push((test_id, score));
                None
            }
        }
    }
}

pub type Courses = BTreeMap<i64, Course>;
pub type Students = BTreeMap<i64, Student>;
pub type Tests = BTreeMap<i64, Test>;

/// One course line in a student's report entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseReport {
    pub id: i64,
    pub name: String,
    pub teacher: String,
    #[serde(rename = "courseAverage")]
    pub course_average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentReport {
    pub id: i64,
    pub name: String,
    #[serde(rename = "totalAverage")]
    pub total_average: f64,
    pub courses: Vec<CourseReport>,
}

/// Top-level output document, serialized as `{"students": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchoolReport {
    pub students: Vec<StudentReport>,
}

/// Error artifact, serialized as `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorReport {
    pub error: String,
}
