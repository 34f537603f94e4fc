//! Parsing and analysis of divan-style benchmark reports.
//!
//! The pipeline is: buffered command output → [`parse_report`] → [`BenchRun`],
//! which is either written as a canonical JSON snapshot ([`snapshot`]) or
//! grouped by payload size ([`bucket`]) and compared to a previous snapshot
//! ([`Baseline`]) for chart output.

pub mod ansi;
pub mod baseline;
pub mod bucket;
pub mod config;
pub mod error;
pub mod model;
pub mod parser;
pub mod snapshot;
pub mod units;

pub use ansi::strip_ansi;
pub use baseline::{Baseline, BaselineCase, Delta, Series, normalize_case_name};
pub use bucket::{Bucket, DEFAULT_BAR_WIDTH, group_by_bucket, human_bar, payload_bucket};
pub use config::ParserConfig;
pub use error::AnalyzerError;
pub use model::{BenchCase, BenchRun, MetricKind, RunContext, StatRow, metric_key};
pub use parser::{ColumnLayout, HEADER_KEYS, parse_report};
pub use units::{
    fmt_bytes, fmt_pct, fmt_seconds, parse_bytes, parse_throughput, parse_time_to_seconds,
    pct_change,
};
