//! Positional column layout of the report table.
//!
//! The table is drawn with box characters, so cells are located by the
//! character offsets of the header keywords rather than by splitting on a
//! delimiter. Offsets are counted in `char`s, never bytes.

use crate::model::StatRow;
use crate::units::parse_integer;

/// Header keywords in their required left-to-right order.
pub const HEADER_KEYS: [&str; 6] = ["fastest", "slowest", "median", "mean", "samples", "iters"];

/// Column start offsets taken from the header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    starts: [usize; 6],
}

impl ColumnLayout {
    /// Detect the header line.
    ///
    /// Every keyword must occur, and the first occurrences must appear in
    /// [`HEADER_KEYS`] order.
    pub fn detect(line: &str) -> Option<Self> {
        let lowered = line.to_ascii_lowercase();
        let mut starts = [0usize; 6];
        for (slot, key) in starts.iter_mut().zip(HEADER_KEYS) {
            let byte_idx = lowered.find(key)?;
            *slot = lowered[..byte_idx].chars().count();
        }
        if starts.windows(2).any(|pair| pair[0] > pair[1]) {
            return None;
        }
        Some(Self { starts })
    }

    pub fn starts(&self) -> [usize; 6] {
        self.starts
    }

    /// Cut a data line into its label and six cells.
    pub fn slice(&self, line: &str) -> SlicedRow {
        let chars: Vec<char> = line.chars().collect();
        let label = char_span(&chars, 0, self.starts[0]).trim().to_string();

        let mut cells: [String; 6] = Default::default();
        for (idx, cell) in cells.iter_mut().enumerate() {
            let start = self.starts[idx];
            let end = self.starts.get(idx + 1).copied().unwrap_or(chars.len());
            *cell = clean_cell(&char_span(&chars, start, end));
        }

        SlicedRow { label, cells }
    }
}

fn char_span(chars: &[char], start: usize, end: usize) -> String {
    let end = end.min(chars.len());
    if start >= end {
        return String::new();
    }
    chars[start..end].iter().collect()
}

fn clean_cell(raw: &str) -> String {
    raw.trim_matches(|c: char| c == ' ' || c == '\u{2502}' || c == '|')
        .trim()
        .to_string()
}

/// A data line split at the header's column offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlicedRow {
    pub label: String,
    cells: [String; 6],
}

impl SlicedRow {
    pub fn fastest(&self) -> &str {
        &self.cells[0]
    }

    pub fn slowest(&self) -> &str {
        &self.cells[1]
    }

    pub fn median(&self) -> &str {
        &self.cells[2]
    }

    pub fn mean(&self) -> &str {
        &self.cells[3]
    }

    pub fn samples(&self) -> &str {
        &self.cells[4]
    }

    pub fn iters(&self) -> &str {
        &self.cells[5]
    }

    /// Convert the four value cells with `parse` and the two count cells as
    /// plain integers.
    pub fn stat_row(&self, parse: impl Fn(&str) -> Option<f64>) -> StatRow {
        StatRow {
            fastest: parse(self.fastest()),
            slowest: parse(self.slowest()),
            median: parse(self.median()),
            mean: parse(self.mean()),
            samples: parse_integer(self.samples()),
            iters: parse_integer(self.iters()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::parse_time_to_seconds;

    const HEADER: &str =
        "e2e              fastest       │ slowest       │ median        │ mean          │ samples │ iters";

    #[test]
    fn detects_ordered_header() {
        let layout = ColumnLayout::detect(HEADER).unwrap();
        let starts = layout.starts();
        assert_eq!(starts[0], 17);
        assert!(starts.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn header_detection_is_case_insensitive() {
        assert!(ColumnLayout::detect(&HEADER.to_uppercase()).is_some());
    }

    #[test]
    fn rejects_out_of_order_header() {
        let line = "x   slowest │ fastest │ median │ mean │ samples │ iters";
        assert_eq!(ColumnLayout::detect(line), None);
    }

    #[test]
    fn rejects_incomplete_header() {
        let line = "x   fastest │ slowest │ median │ mean │ samples";
        assert_eq!(ColumnLayout::detect(line), None);
    }

    #[test]
    fn offsets_count_chars_not_bytes() {
        // Each box character is three bytes in UTF-8.
        let line = "╰─╰─ fastest slowest median mean samples iters";
        let layout = ColumnLayout::detect(line).unwrap();
        assert_eq!(layout.starts()[0], 5);
    }

    #[test]
    fn slices_cells_and_trims_separators() {
        let layout = ColumnLayout::detect(HEADER).unwrap();
        let row = "╰─ case          12.3 ms       │ 20 ms         │ 13 ms         │ 14 ms         │ 200     │ 400";
        let sliced = layout.slice(row);
        assert_eq!(sliced.label, "╰─ case");
        assert_eq!(sliced.fastest(), "12.3 ms");
        assert_eq!(sliced.slowest(), "20 ms");
        assert_eq!(sliced.mean(), "14 ms");
        assert_eq!(sliced.samples(), "200");
        assert_eq!(sliced.iters(), "400");

        let stats = sliced.stat_row(parse_time_to_seconds);
        assert!((stats.fastest.unwrap() - 0.0123).abs() < 1e-12);
        assert_eq!(stats.samples, Some(200));
        assert_eq!(stats.iters, Some(400));
    }

    #[test]
    fn short_lines_yield_empty_cells() {
        let layout = ColumnLayout::detect(HEADER).unwrap();
        let sliced = layout.slice("tiny");
        assert_eq!(sliced.label, "tiny");
        assert_eq!(sliced.fastest(), "");
        assert_eq!(sliced.iters(), "");
        assert!(sliced.stat_row(parse_time_to_seconds).is_empty());
    }
}
