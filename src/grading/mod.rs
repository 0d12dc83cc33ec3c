//! Validation and aggregation of school grading records.
//!
//! Stages, in pipeline order: [`builders`] type the course, student and test
//! rows; [`linker`] attaches marks to students and students to courses;
//! [`weights`] checks course test weights; [`averages`] computes course and
//! total averages; [`report`] assembles the ordered output.

pub mod averages;
pub mod builders;
pub mod linker;
pub mod report;
pub mod types;
pub mod utility;
pub mod weights;
