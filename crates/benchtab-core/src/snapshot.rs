//! Canonical JSON snapshot of a run.
//!
//! Keys are sorted at every level and absent values are written as `null`,
//! so two snapshots of the same run are byte-identical.

use std::fs::{File, create_dir_all};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::AnalyzerError;
use crate::model::BenchRun;

/// Render the snapshot document, pretty printed with a trailing newline.
pub fn to_json_string(run: &BenchRun) -> Result<String, AnalyzerError> {
    // Object maps in `serde_json::Value` are ordered by key.
    let value = serde_json::to_value(run).map_err(AnalyzerError::SnapshotEncode)?;
    let mut json = serde_json::to_string_pretty(&value).map_err(AnalyzerError::SnapshotEncode)?;
    json.push('\n');
    Ok(json)
}

/// Write the snapshot to `path`, creating missing parent directories.
pub fn write_snapshot(path: &Path, run: &BenchRun) -> Result<(), AnalyzerError> {
    let json = to_json_string(run)?;
    let io_err = |source: std::io::Error| AnalyzerError::SnapshotIo {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        create_dir_all(parent).map_err(io_err)?;
    }
    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(json.as_bytes()).map_err(io_err)?;
    writer.flush().map_err(io_err)?;

    tracing::debug!(
        component = "snapshot",
        operation = "write",
        path = %path.display(),
        cases = run.cases.len(),
        "Wrote snapshot"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BenchCase, StatRow};

    fn sample_run() -> BenchRun {
        let mut case = BenchCase::new(
            "TestParameters { server: Small, client: Small }",
            Some("bench_io".to_string()),
            StatRow {
                fastest: Some(0.5),
                mean: Some(1.0),
                samples: Some(10),
                ..StatRow::default()
            },
        );
        case.metrics.insert(
            "alloc.count".to_string(),
            StatRow {
                mean: Some(3.0),
                ..StatRow::default()
            },
        );
        BenchRun {
            cmd: "cargo bench".to_string(),
            started_at_utc: "2026-01-01T00:00:00.000000+00:00".to_string(),
            cwd: "/work".to_string(),
            raw_head: vec!["line".to_string()],
            cases: vec![case],
        }
    }

    #[test]
    fn keys_are_sorted_and_nulls_explicit() {
        let json = to_json_string(&sample_run()).unwrap();
        let cases_at = json.find("\"cases\"").unwrap();
        let cmd_at = json.find("\"cmd\"").unwrap();
        let cwd_at = json.find("\"cwd\"").unwrap();
        let head_at = json.find("\"raw_head\"").unwrap();
        let started_at = json.find("\"started_at_utc\"").unwrap();
        assert!(cases_at < cmd_at && cmd_at < cwd_at && cwd_at < head_at && head_at < started_at);

        assert!(json.contains("\"slowest\": null"));
        assert!(json.contains("\"iters\": null"));
        assert!(json.contains("\"throughput_bps\": {"));
        assert!(json.ends_with("}\n"));
    }

    #[test]
    fn snapshot_is_byte_stable() {
        let run = sample_run();
        assert_eq!(to_json_string(&run).unwrap(), to_json_string(&run).unwrap());
    }

    #[test]
    fn snapshot_decodes_back_to_the_run() {
        let run = sample_run();
        let json = to_json_string(&run).unwrap();
        let decoded: BenchRun = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, run);
    }

    #[test]
    fn write_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("run.json");
        write_snapshot(&path, &sample_run()).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, to_json_string(&sample_run()).unwrap());
    }
}
