//! Structured results record (C8's output) and its atomic-write path.
//!
//! The write discipline — write to a sibling temp file, flush, then
//! rename into place — is the same one `persistence.rs` used for
//! `LearnedKvStore` snapshots, adapted from a binary checksummed format
//! to a pretty-printed JSON report (matching the original C++ driver's
//! `nlohmann::json` dump, per `hashmap_benchmark.cpp`).

use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::profiler::Snapshot;

#[derive(Serialize, Clone)]
pub struct ExecutorResult {
    pub executor: String,
    pub total_time_seconds: f64,
    pub throughput_queries_per_second: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profiler: Option<Snapshot>,
}

#[derive(Serialize, Clone)]
pub struct DistributionResults {
    pub distribution: String,
    pub executors: Vec<ExecutorResult>,
}

#[derive(Serialize, Clone, Default)]
pub struct RunResults {
    pub runs: Vec<DistributionResults>,
}

impl RunResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes this record to `path` atomically: the file at `path` either
    /// doesn't exist yet, or holds a complete, valid record — never a
    /// partially-written one, even if the process is killed mid-write.
    pub fn write_atomic(&self, path: &Path) -> Result<()> {
        let tmp_path = path.with_extension("json.tmp");
        {
            let mut tmp = File::create(&tmp_path)?;
            let body = serde_json::to_string_pretty(self)?;
            tmp.write_all(body.as_bytes())?;
            tmp.sync_all()?;
        }
        std::fs::rename(&tmp_path, path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn writes_and_reads_back_a_full_record() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.json");

        let mut results = RunResults::new();
        results.runs.push(DistributionResults {
            distribution: "uniform".into(),
            executors: vec![ExecutorResult {
                executor: "scalar".into(),
                total_time_seconds: 1.5,
                throughput_queries_per_second: 1000.0,
                profiler: None,
            }],
        });
        results.write_atomic(&path).unwrap();

        let body = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed["runs"][0]["distribution"], "uniform");
        assert_eq!(parsed["runs"][0]["executors"][0]["executor"], "scalar");
    }

    #[test]
    fn no_temp_file_left_behind_on_success() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.json");
        RunResults::new().write_atomic(&path).unwrap();
        assert!(!dir.path().join("results.json.tmp").exists());
    }
}
