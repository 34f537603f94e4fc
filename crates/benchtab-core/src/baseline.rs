//! Baseline snapshot loading and percentage deltas.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::AnalyzerError;
use crate::model::{BenchCase, BenchRun, StatRow};
use crate::units::{fmt_pct, pct_change};

/// A case record as persisted in a snapshot.
///
/// Every field is optional so hand-edited or older snapshots still load.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BaselineCase {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub time_s: StatRow,
    #[serde(default)]
    pub throughput_bps: StatRow,
    #[serde(default)]
    pub metrics: BTreeMap<String, StatRow>,
}

impl From<&BenchCase> for BaselineCase {
    fn from(case: &BenchCase) -> Self {
        Self {
            name: Some(case.name.clone()),
            time_s: case.time_s,
            throughput_bps: case.throughput_bps,
            metrics: case.metrics.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct BaselineDocument {
    #[serde(default)]
    cases: Vec<BaselineCase>,
}

/// Which measured series a delta is computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Series<'a> {
    Time,
    Throughput,
    /// A `metrics` entry such as `alloc.bytes`.
    Metric(&'a str),
}

impl Series<'_> {
    fn row_of<'r>(
        &self,
        time_s: &'r StatRow,
        throughput_bps: &'r StatRow,
        metrics: &'r BTreeMap<String, StatRow>,
    ) -> Option<&'r StatRow> {
        match self {
            Series::Time => Some(time_s),
            Series::Throughput => Some(throughput_bps),
            Series::Metric(key) => metrics.get(*key),
        }
    }

    /// Mean of this series for a live case.
    pub fn mean_of(&self, case: &BenchCase) -> Option<f64> {
        self.row_of(&case.time_s, &case.throughput_bps, &case.metrics)?
            .mean
    }
}

/// Change of a case's mean relative to the baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Delta {
    /// The baseline has no mean for this case and series.
    Missing,
    /// The baseline mean is zero, or the current mean is absent.
    NotApplicable,
    /// Percentage change, positive when the value grew.
    Change(f64),
}

impl Delta {
    pub fn percent(&self) -> Option<f64> {
        match self {
            Delta::Change(pct) => Some(*pct),
            Delta::Missing | Delta::NotApplicable => None,
        }
    }

    /// Chart cell text: blank, `n/a`, or a signed percentage.
    pub fn render(&self) -> String {
        match self {
            Delta::Missing => String::new(),
            Delta::NotApplicable => fmt_pct(None),
            Delta::Change(pct) => fmt_pct(Some(*pct)),
        }
    }
}

/// Collapse whitespace runs to a single space and trim.
pub fn normalize_case_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Previous snapshot indexed by normalized case name.
#[derive(Debug, Clone, Default)]
pub struct Baseline {
    index: BTreeMap<String, BaselineCase>,
}

impl Baseline {
    /// Index case records; on a duplicate normalized name the later record wins.
    pub fn from_cases<I>(cases: I) -> Self
    where
        I: IntoIterator<Item = BaselineCase>,
    {
        let mut index = BTreeMap::new();
        for case in cases {
            let key = normalize_case_name(case.name.as_deref().unwrap_or_default());
            if key.is_empty() {
                continue;
            }
            index.insert(key, case);
        }
        Self { index }
    }

    /// Index the cases of a parsed run.
    pub fn from_run(run: &BenchRun) -> Self {
        Self::from_cases(run.cases.iter().map(BaselineCase::from))
    }

    /// Parse a snapshot document.
    pub fn from_json_str(json: &str) -> Result<Self, AnalyzerError> {
        let document: BaselineDocument = serde_json::from_str(json)
            .map_err(|source| AnalyzerError::BaselineParse { path: None, source })?;
        Ok(Self::from_cases(document.cases))
    }

    /// Read and parse a snapshot file.
    pub fn load(path: &Path) -> Result<Self, AnalyzerError> {
        let json = std::fs::read_to_string(path).map_err(|source| AnalyzerError::BaselineIo {
            path: path.to_path_buf(),
            source,
        })?;
        let document: BaselineDocument =
            serde_json::from_str(&json).map_err(|source| AnalyzerError::BaselineParse {
                path: Some(path.to_path_buf()),
                source,
            })?;
        let baseline = Self::from_cases(document.cases);
        tracing::debug!(
            component = "baseline",
            operation = "load",
            path = %path.display(),
            cases = baseline.len(),
            "Loaded baseline"
        );
        Ok(baseline)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Look up a case by (unnormalized) name.
    pub fn get(&self, name: &str) -> Option<&BaselineCase> {
        self.index.get(&normalize_case_name(name))
    }

    /// Iterate normalized names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(String::as_str)
    }

    /// Stored mean of `series` for the named case.
    pub fn baseline_mean(&self, name: &str, series: Series<'_>) -> Option<f64> {
        let case = self.get(name)?;
        series
            .row_of(&case.time_s, &case.throughput_bps, &case.metrics)?
            .mean
    }

    /// Delta of `case`'s current mean against the stored mean.
    pub fn delta(&self, case: &BenchCase, series: Series<'_>) -> Delta {
        let Some(old) = self.baseline_mean(&case.name, series) else {
            return Delta::Missing;
        };
        match series.mean_of(case).and_then(|new| pct_change(new, old)) {
            Some(pct) => Delta::Change(pct),
            None => Delta::NotApplicable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(left: f64, right: f64) {
        assert!((left - right).abs() < 1e-9, "left={left}, right={right}");
    }

    fn case_with_mean(name: &str, mean: f64) -> BenchCase {
        BenchCase::new(
            name,
            None,
            StatRow {
                mean: Some(mean),
                ..StatRow::default()
            },
        )
    }

    #[test]
    fn normalizes_whitespace() {
        assert_eq!(normalize_case_name("  a \t b\n c  "), "a b c");
        assert_eq!(normalize_case_name("   "), "");
    }

    #[test]
    fn delta_against_baseline_mean() {
        let baseline = Baseline::from_json_str(
            r#"{"cases": [{"name": "case  one", "time_s": {"mean": 100.0}}]}"#,
        )
        .unwrap();
        let delta = baseline.delta(&case_with_mean("case one", 150.0), Series::Time);
        match delta {
            Delta::Change(pct) => approx_eq(pct, 50.0),
            other => panic!("expected a change, got {other:?}"),
        }
        assert_eq!(delta.render(), "+50.00%");
    }

    #[test]
    fn zero_baseline_is_not_applicable() {
        let baseline =
            Baseline::from_json_str(r#"{"cases": [{"name": "z", "time_s": {"mean": 0}}]}"#)
                .unwrap();
        let delta = baseline.delta(&case_with_mean("z", 10.0), Series::Time);
        assert_eq!(delta, Delta::NotApplicable);
        assert_eq!(delta.render(), "n/a");
    }

    #[test]
    fn missing_entries_are_reported_as_missing() {
        let baseline = Baseline::from_json_str(
            r#"{"cases": [{"name": "a", "time_s": {"mean": null}}]}"#,
        )
        .unwrap();
        assert_eq!(
            baseline.delta(&case_with_mean("a", 1.0), Series::Time),
            Delta::Missing
        );
        assert_eq!(
            baseline.delta(&case_with_mean("b", 1.0), Series::Time),
            Delta::Missing
        );
        assert_eq!(
            baseline.delta(&case_with_mean("a", 1.0), Series::Metric("alloc.count")),
            Delta::Missing
        );
        assert_eq!(Delta::Missing.render(), "");
    }

    #[test]
    fn duplicate_names_last_wins() {
        let baseline = Baseline::from_json_str(
            r#"{"cases": [
                {"name": "dup", "time_s": {"mean": 1.0}},
                {"name": " dup ", "time_s": {"mean": 2.0}}
            ]}"#,
        )
        .unwrap();
        assert_eq!(baseline.len(), 1);
        assert_eq!(baseline.baseline_mean("dup", Series::Time), Some(2.0));
    }

    #[test]
    fn tolerates_sparse_documents() {
        let baseline = Baseline::from_json_str(r#"{"other": 1}"#).unwrap();
        assert!(baseline.is_empty());

        let baseline =
            Baseline::from_json_str(r#"{"cases": [{"time_s": {"mean": 1.0}}, {"name": "x"}]}"#)
                .unwrap();
        assert_eq!(baseline.names().collect::<Vec<_>>(), vec!["x"]);
        assert_eq!(baseline.baseline_mean("x", Series::Throughput), None);
    }

    #[test]
    fn metric_series_reads_metric_mean() {
        let baseline = Baseline::from_json_str(
            r#"{"cases": [{"name": "m", "metrics": {"alloc.bytes": {"mean": 200.0}}}]}"#,
        )
        .unwrap();
        let mut case = case_with_mean("m", 1.0);
        case.metrics.insert(
            "alloc.bytes".to_string(),
            StatRow {
                mean: Some(100.0),
                ..StatRow::default()
            },
        );
        let pct = baseline
            .delta(&case, Series::Metric("alloc.bytes"))
            .percent()
            .unwrap();
        approx_eq(pct, -50.0);
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = Baseline::from_json_str("{").unwrap_err();
        assert_eq!(err.code(), "BASELINE_PARSE");
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Baseline::load(Path::new("/nonexistent/benchtab/baseline.json")).unwrap_err();
        assert_eq!(err.code(), "BASELINE_IO");
    }
}
