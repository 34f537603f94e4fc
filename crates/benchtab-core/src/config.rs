//! Parser configuration.

/// Raw output lines kept in [`crate::BenchRun::raw_head`] by default.
pub const DEFAULT_HEAD_LINES: usize = 80;
/// Marker that identifies a per-case row.
pub const DEFAULT_CASE_MARKER: &str = "TestParameters";
/// Marker that identifies a group heading row.
pub const DEFAULT_GROUP_MARKER: &str = "bench_";

/// Options controlling how a report is recognized.
///
/// The markers are plain substrings; the report renders bench function names
/// and argument `Debug` output verbatim, so a substring match is enough to
/// tell group headings from case rows.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Number of raw output lines to keep in the run.
    pub head_lines: usize,
    /// Substring that a case row must contain.
    pub case_marker: String,
    /// Substring that a group heading must contain.
    pub group_marker: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            head_lines: DEFAULT_HEAD_LINES,
            case_marker: DEFAULT_CASE_MARKER.to_string(),
            group_marker: DEFAULT_GROUP_MARKER.to_string(),
        }
    }
}

impl ParserConfig {
    /// Create a new configuration with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how many raw lines are kept.
    pub fn with_head_lines(mut self, lines: usize) -> Self {
        self.head_lines = lines;
        self
    }

    /// Set the case row marker.
    pub fn with_case_marker(mut self, marker: impl Into<String>) -> Self {
        self.case_marker = marker.into();
        self
    }

    /// Set the group heading marker.
    pub fn with_group_marker(mut self, marker: impl Into<String>) -> Self {
        self.group_marker = marker.into();
        self
    }
}
