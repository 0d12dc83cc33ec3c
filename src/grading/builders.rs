//! Entity builders: turn decoded rows into typed records keyed by id.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use tracing::debug;

use crate::error::{ReportError, Result};
use crate::grading::types::{Course, Student, Test};
use crate::parser::Row;

/// A record that can be built from one CSV row.
pub trait FromRow: Sized {
    /// Columns the source file must carry.
    const COLUMNS: &'static [&'static str];
    /// Used in log events.
    const KIND: &'static str;

    fn from_row(id: i64, row: &Row) -> Result<Self>;
}

impl FromRow for Course {
    const COLUMNS: &'static [&'static str] = &["id", "name", "teacher"];
    const KIND: &'static str = "course";

    fn from_row(id: i64, row: &Row) -> Result<Self> {
        Ok(Course::new(id, row.text("name"), row.text("teacher")))
    }
}

impl FromRow for Student {
    const COLUMNS: &'static [&'static str] = &["id", "name"];
    const KIND: &'static str = "student";

    fn from_row(id: i64, row: &Row) -> Result<Self> {
        Ok(Student::new(id, row.text("name")))
    }
}

impl FromRow for Test {
    const COLUMNS: &'static [&'static str] = &["id", "course_id", "weight"];
    const KIND: &'static str = "test";

    fn from_row(id: i64, row: &Row) -> Result<Self> {
        Ok(Test {
            id,
            course_id: row.int("course_id")?,
            weight: row.int("weight")?,
        })
    }
}

/// Builds a map from id to record, in row order.
///
/// # Errors
///
/// - [`ReportError::DuplicateId`] on the second row carrying an id already seen.
/// - [`ReportError::MalformedField`] if `id` or a numeric field is not an integer.
pub fn build_records<T: FromRow>(rows: &[Row]) -> Result<BTreeMap<i64, T>> {
    let mut records = BTreeMap::new();

    for row in rows {
        let id = row.int("id")?;
        match records.entry(id) {
            Entry::Occupied(_) => {
                return Err(ReportError::DuplicateId {
                    id,
                    row: row.clone(),
                });
            }
            Entry::Vacant(slot) => {
                slot.insert(T::from_row(id, row)?);
            }
        }
    }

    debug!(kind = T::KIND, count = records.len(), "Built records");
    Ok(records)
}
