use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Summary statistics for one measured quantity.
///
/// Every field is optional: a cell that fails to parse is recorded as absent
/// rather than rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatRow {
    pub fastest: Option<f64>,
    pub slowest: Option<f64>,
    pub median: Option<f64>,
    pub mean: Option<f64>,
    pub samples: Option<u64>,
    pub iters: Option<u64>,
}

impl StatRow {
    /// Returns true when no field carries a value.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// One named benchmark measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchCase {
    pub name: String,
    pub group: Option<String>,
    pub time_s: StatRow,
    pub throughput_bps: StatRow,
    /// Keyed `"<section>.<count|bytes>"`, e.g. `alloc.bytes`.
    pub metrics: BTreeMap<String, StatRow>,
}

impl BenchCase {
    /// Create a case with time statistics and nothing else attached yet.
    pub fn new(name: impl Into<String>, group: Option<String>, time_s: StatRow) -> Self {
        Self {
            name: name.into(),
            group,
            time_s,
            throughput_bps: StatRow::default(),
            metrics: BTreeMap::new(),
        }
    }
}

/// Kind of a metric sub-section row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Count,
    Bytes,
}

impl MetricKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::Count => "count",
            MetricKind::Bytes => "bytes",
        }
    }
}

/// Build the `metrics` map key for a section row.
pub fn metric_key(section: &str, kind: MetricKind) -> String {
    format!("{section}.{}", kind.as_str())
}

/// Parse result for one execution of the benchmark command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchRun {
    pub cmd: String,
    pub started_at_utc: String,
    pub cwd: String,
    /// Leading lines of the raw output, kept for diagnosing parse misses.
    pub raw_head: Vec<String>,
    pub cases: Vec<BenchCase>,
}

/// Invocation metadata recorded alongside parsed cases.
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    pub cmd: String,
    pub started_at_utc: String,
    pub cwd: String,
}

impl RunContext {
    pub fn new(
        cmd: impl Into<String>,
        started_at_utc: impl Into<String>,
        cwd: impl Into<String>,
    ) -> Self {
        Self {
            cmd: cmd.into(),
            started_at_utc: started_at_utc.into(),
            cwd: cwd.into(),
        }
    }
}
