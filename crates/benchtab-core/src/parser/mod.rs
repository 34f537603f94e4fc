//! Report parser.
//!
//! A single pass over the output: lines are ignored until the column header
//! is found, after which each line is classified and applied to the case
//! currently being built. Nothing in here fails; lines that match no rule
//! are skipped.

pub mod classify;
pub mod columns;

use crate::ansi::strip_ansi;
use crate::config::ParserConfig;
use crate::model::{BenchCase, BenchRun, MetricKind, RunContext, metric_key};
use crate::units::{parse_bytes, parse_count, parse_throughput, parse_time_to_seconds};

pub use columns::{ColumnLayout, HEADER_KEYS, SlicedRow};

/// Rows that follow every metric section heading (a count row, then a bytes row).
pub const METRIC_ROWS_PER_SECTION: usize = 2;

/// What a line means once the header has been seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    Group(String),
    CaseHeader,
    Throughput,
    SectionHeader(String),
    MetricRow,
    Ignored,
}

/// Mutable position of the walk: the open case and the open metric section.
#[derive(Debug, Default)]
struct Cursor {
    group: Option<String>,
    current: Option<usize>,
    section: Option<String>,
    armed_rows: usize,
}

impl Cursor {
    fn close_section(&mut self) {
        self.section = None;
        self.armed_rows = 0;
    }
}

/// Classify a line against the rules, in priority order.
///
/// `has_case` and `section_armed` gate the rules that only make sense while a
/// case (or a metric section) is open.
pub fn classify_line(
    line: &str,
    config: &ParserConfig,
    has_case: bool,
    section_armed: bool,
) -> LineKind {
    if let Some(label) = classify::group_label(line, &config.group_marker) {
        return LineKind::Group(label.to_string());
    }
    if classify::is_case_line(line, &config.case_marker) {
        return LineKind::CaseHeader;
    }
    if !has_case {
        return LineKind::Ignored;
    }
    if classify::is_throughput_line(line) {
        return LineKind::Throughput;
    }
    if let Some(section) = classify::metric_section_label(line) {
        return LineKind::SectionHeader(section);
    }
    if section_armed {
        return LineKind::MetricRow;
    }
    LineKind::Ignored
}

/// Parse the data lines that follow a detected header.
pub fn parse_cases<'a, I>(lines: I, layout: &ColumnLayout, config: &ParserConfig) -> Vec<BenchCase>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut cases: Vec<BenchCase> = Vec::new();
    let mut cursor = Cursor::default();

    for line in lines {
        let section_armed = cursor.section.is_some() && cursor.armed_rows > 0;
        match classify_line(line, config, cursor.current.is_some(), section_armed) {
            LineKind::Group(label) => cursor.group = Some(label),
            LineKind::CaseHeader => {
                let row = layout.slice(line);
                if parse_time_to_seconds(row.fastest()).is_none() {
                    continue;
                }
                let name = classify::strip_tree(&row.label).to_string();
                let time_s = row.stat_row(parse_time_to_seconds);
                cases.push(BenchCase::new(name, cursor.group.clone(), time_s));
                cursor.current = Some(cases.len() - 1);
                cursor.close_section();
            }
            LineKind::Throughput => {
                let Some(case) = cursor.current.and_then(|idx| cases.get_mut(idx)) else {
                    continue;
                };
                let throughput = layout.slice(line).stat_row(parse_throughput);
                if throughput.fastest.is_some() || throughput.mean.is_some() {
                    case.throughput_bps = throughput;
                    cursor.close_section();
                }
            }
            LineKind::SectionHeader(section) => {
                cursor.section = Some(section);
                cursor.armed_rows = METRIC_ROWS_PER_SECTION;
            }
            LineKind::MetricRow => {
                let (Some(case), Some(section)) = (
                    cursor.current.and_then(|idx| cases.get_mut(idx)),
                    cursor.section.as_deref(),
                ) else {
                    continue;
                };
                let row = layout.slice(line);
                let kind = classify::metric_kind(row.fastest());
                let stats = match kind {
                    MetricKind::Count => row.stat_row(parse_count),
                    MetricKind::Bytes => row.stat_row(parse_bytes),
                };
                case.metrics.insert(metric_key(section, kind), stats);

                cursor.armed_rows -= 1;
                if cursor.armed_rows == 0 {
                    cursor.section = None;
                }
            }
            LineKind::Ignored => {}
        }
    }

    cases
}

/// Parse buffered command output into a [`BenchRun`].
pub fn parse_report(text: &str, context: RunContext, config: &ParserConfig) -> BenchRun {
    let lines: Vec<String> = text
        .lines()
        .map(|line| strip_ansi(line).into_owned())
        .collect();
    let raw_head = lines.iter().take(config.head_lines).cloned().collect();

    let header = lines
        .iter()
        .enumerate()
        .find_map(|(idx, line)| ColumnLayout::detect(line).map(|layout| (idx, layout)));

    let cases = match header {
        Some((idx, layout)) => {
            tracing::debug!(
                component = "parser",
                operation = "detect_header",
                line = idx + 1,
                starts = ?layout.starts(),
                header = %lines[idx],
                "Detected report header"
            );
            parse_cases(lines[idx + 1..].iter().map(String::as_str), &layout, config)
        }
        None => {
            tracing::debug!(
                component = "parser",
                operation = "detect_header",
                status = "missing",
                "No report header found"
            );
            Vec::new()
        }
    };

    tracing::debug!(
        component = "parser",
        operation = "parse",
        cases = cases.len(),
        "Parsed report"
    );

    BenchRun {
        cmd: context.cmd,
        started_at_utc: context.started_at_utc,
        cwd: context.cwd,
        raw_head,
        cases,
    }
}
