//! Analyzer error types.

use std::path::PathBuf;

/// Errors raised while loading baselines or writing snapshots.
///
/// Report parsing itself never fails: unrecognized lines are skipped and
/// unparseable tokens become absent values.
#[derive(Debug)]
pub enum AnalyzerError {
    /// Baseline file could not be read.
    BaselineIo {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Baseline document is not valid JSON.
    BaselineParse {
        path: Option<PathBuf>,
        source: serde_json::Error,
    },
    /// Snapshot file or its parent directory could not be written.
    SnapshotIo {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Snapshot could not be encoded as JSON.
    SnapshotEncode(serde_json::Error),
}

impl AnalyzerError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            AnalyzerError::BaselineIo { .. } => "BASELINE_IO",
            AnalyzerError::BaselineParse { .. } => "BASELINE_PARSE",
            AnalyzerError::SnapshotIo { .. } => "SNAPSHOT_IO",
            AnalyzerError::SnapshotEncode(_) => "SNAPSHOT_ENCODE",
        }
    }
}

impl std::fmt::Display for AnalyzerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalyzerError::BaselineIo { path, source } => write!(
                f,
                "[{}] Failed to read baseline {}: {}",
                self.code(),
                path.display(),
                source
            ),
            AnalyzerError::BaselineParse {
                path: Some(path),
                source,
            } => write!(
                f,
                "[{}] Baseline {} is not valid JSON: {}",
                self.code(),
                path.display(),
                source
            ),
            AnalyzerError::BaselineParse { path: None, source } => {
                write!(f, "[{}] Baseline is not valid JSON: {}", self.code(), source)
            }
            AnalyzerError::SnapshotIo { path, source } => write!(
                f,
                "[{}] Failed to write snapshot {}: {}",
                self.code(),
                path.display(),
                source
            ),
            AnalyzerError::SnapshotEncode(source) => {
                write!(f, "[{}] Failed to encode snapshot: {}", self.code(), source)
            }
        }
    }
}

impl std::error::Error for AnalyzerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AnalyzerError::BaselineIo { source, .. } | AnalyzerError::SnapshotIo { source, .. } => {
                Some(source)
            }
            AnalyzerError::BaselineParse { source, .. } | AnalyzerError::SnapshotEncode(source) => {
                Some(source)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json_error() -> serde_json::Error {
        match serde_json::from_str::<serde_json::Value>("{not json") {
            Ok(_) => panic!("malformed input should not parse"),
            Err(err) => err,
        }
    }

    #[test]
    fn test_error_display_baseline_io() {
        let err = AnalyzerError::BaselineIo {
            path: PathBuf::from("base.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        let msg = err.to_string();
        assert!(msg.contains("BASELINE_IO"));
        assert!(msg.contains("base.json"));
        assert!(msg.contains("missing"));
    }

    #[test]
    fn test_error_display_baseline_parse_without_path() {
        let err = AnalyzerError::BaselineParse {
            path: None,
            source: json_error(),
        };
        assert!(err.to_string().starts_with("[BASELINE_PARSE] Baseline is not valid JSON"));
    }

    #[test]
    fn test_error_source_is_exposed() {
        use std::error::Error as _;

        let err = AnalyzerError::SnapshotEncode(json_error());
        assert!(err.source().is_some());
    }

    #[test]
    fn test_error_code() {
        let io = || std::io::Error::other("boom");
        assert_eq!(
            AnalyzerError::BaselineIo {
                path: PathBuf::new(),
                source: io()
            }
            .code(),
            "BASELINE_IO"
        );
        assert_eq!(
            AnalyzerError::SnapshotIo {
                path: PathBuf::new(),
                source: io()
            }
            .code(),
            "SNAPSHOT_IO"
        );
        assert_eq!(
            AnalyzerError::BaselineParse {
                path: None,
                source: json_error()
            }
            .code(),
            "BASELINE_PARSE"
        );
        assert_eq!(
            AnalyzerError::SnapshotEncode(json_error()).code(),
            "SNAPSHOT_ENCODE"
        );
    }
}
