//! Line classification predicates.
//!
//! Each rule is a standalone function so the tolerance of the parser can be
//! checked one rule at a time.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::MetricKind;
use crate::units::is_count_token;

const BRANCH: &str = "\u{251c}\u{2500}"; // ├─
const LAST_BRANCH: &str = "\u{2570}\u{2500}"; // ╰─
const RAIL: char = '\u{2502}'; // │

static RATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[KMGTP]?B/s").expect("rate pattern is valid"));

static SECTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-zA-Z ]+):$").expect("section pattern is valid"));

fn starts_with_connector(text: &str) -> bool {
    text.starts_with(BRANCH) || text.starts_with(LAST_BRANCH)
}

fn is_tree_char(c: char) -> bool {
    matches!(c, '\u{251c}' | '\u{2570}' | '\u{2500}' | RAIL)
}

/// Top-level branch: `├─` or `╰─` after leading whitespace only.
pub fn has_branch_prefix(line: &str) -> bool {
    starts_with_connector(line.trim_start())
}

/// Branch at any depth: connectors may sit behind `│` rails.
pub fn has_nested_branch_prefix(line: &str) -> bool {
    starts_with_connector(line.trim_start_matches(|c: char| c.is_whitespace() || c == RAIL))
}

/// Drop leading tree drawing and surrounding whitespace.
pub fn strip_tree(text: &str) -> &str {
    text.trim_start_matches(|c: char| c.is_whitespace() || is_tree_char(c))
        .trim()
}

/// Group heading such as `╰─ bench_http_transport`; returns the label.
///
/// Empty cells that trail the heading are not part of the label.
pub fn group_label<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    if !(has_branch_prefix(line) && line.contains(marker)) {
        return None;
    }
    Some(strip_tree(line).trim_end_matches(|c: char| c.is_whitespace() || c == RAIL || c == '|'))
}

/// Row that starts a new case.
pub fn is_case_line(line: &str, marker: &str) -> bool {
    line.contains(marker) && has_nested_branch_prefix(line)
}

/// Row carrying a byte rate somewhere in it.
pub fn is_throughput_line(line: &str) -> bool {
    RATE_RE.is_match(line)
}

/// Metric sub-section heading such as `alloc:` or `max alloc:`.
///
/// Returns the lower-cased section name.
pub fn metric_section_label(line: &str) -> Option<String> {
    let body = line.trim_matches(|c: char| c.is_whitespace() || c == RAIL || c == '|');
    let caps = SECTION_RE.captures(body)?;
    let label = caps.get(1)?.as_str().trim();
    if label.is_empty() {
        return None;
    }
    Some(label.to_lowercase())
}

/// A metric row is a count when its first value is a bare number.
pub fn metric_kind(fastest_cell: &str) -> MetricKind {
    if is_count_token(fastest_cell.trim()) {
        MetricKind::Count
    } else {
        MetricKind::Bytes
    }
}
