//! Run configuration for the pipeline and the JSON writer.

/// Default cap on the summed test weights of one course.
pub const DEFAULT_MAX_COURSE_WEIGHT: i64 = 100;

/// Default number of spaces per indentation level in written JSON.
pub const DEFAULT_INDENT: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    /// A course whose test weights sum above this fails validation.
    pub max_course_weight: i64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_course_weight: DEFAULT_MAX_COURSE_WEIGHT,
        }
    }
}

/// Formatting of every JSON artifact, report and error alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriterConfig {
    pub indent: usize,
    pub trailing_newline: bool,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT,
            trailing_newline: true,
        }
    }
}

impl WriterConfig {
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }
}
