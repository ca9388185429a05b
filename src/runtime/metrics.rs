use serde::Serialize;
use std::io::Write;
use std::path::Path;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// When set, every terminal report is appended to this file as one JSON
/// line, for consumption by CI statistics collectors.
pub const METRICS_PATH_ENV: &str = "DEVRUN_METRICS_PATH";

/// Read-only snapshot of invocation metadata exposed to the callback.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsMeta {
    pid: u32,
    command: String,
    started_at_unix: u64,
}

impl MetricsMeta {
    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn started_at_unix(&self) -> u64 {
        self.started_at_unix
    }
}

#[derive(Debug, Serialize)]
struct MetricsReport<'a> {
    outcome: &'a str,
    duration_ms: u128,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
    meta: &'a MetricsMeta,
}

/// Collects invocation timing and emits one terminal report.
///
/// The harness only triggers [`report_success`](Metrics::report_success) or
/// [`report_error`](Metrics::report_error); it never interprets the values.
pub struct Metrics {
    meta: MetricsMeta,
    started: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        let command = std::env::args()
            .next()
            .and_then(|argv0| {
                Path::new(&argv0)
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
            })
            .unwrap_or_else(|| "devrun".to_string());
        let started_at_unix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or(0);

        Self {
            meta: MetricsMeta {
                pid: std::process::id(),
                command,
                started_at_unix,
            },
            started: Instant::now(),
        }
    }

    pub fn meta(&self) -> &MetricsMeta {
        &self.meta
    }

    pub fn report_success(&self) {
        let duration = self.started.elapsed();
        tracing::info!(
            command = %self.meta.command,
            duration_ms = duration.as_millis() as u64,
            "invocation succeeded"
        );
        self.sink_report("success", None);
    }

    pub fn report_error(&self, message: &str) {
        let duration = self.started.elapsed();
        tracing::error!(
            command = %self.meta.command,
            duration_ms = duration.as_millis() as u64,
            error = %message,
            "invocation failed"
        );
        self.sink_report("failure", Some(message));
    }

    fn sink_report(&self, outcome: &str, error: Option<&str>) {
        let Ok(path) = std::env::var(METRICS_PATH_ENV) else {
            return;
        };
        if let Err(write_error) = self.write_report(Path::new(&path), outcome, error) {
            tracing::warn!(path = %path, error = %write_error, "failed to write metrics report");
        }
    }

    pub(crate) fn write_report(
        &self,
        path: &Path,
        outcome: &str,
        error: Option<&str>,
    ) -> std::io::Result<()> {
        let report = MetricsReport {
            outcome,
            duration_ms: self.started.elapsed().as_millis(),
            error,
            meta: &self.meta,
        };
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        let line = serde_json::to_string(&report).map_err(std::io::Error::other)?;
        writeln!(file, "{line}")
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meta_captures_process_identity() {
        let metrics = Metrics::new();
        assert_eq!(metrics.meta().pid(), std::process::id());
        assert!(!metrics.meta().command().is_empty());
        assert!(metrics.meta().started_at_unix() > 0);
    }

    #[test]
    fn report_serializes_outcome_and_meta() {
        let metrics = Metrics::new();
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("stats.jsonl");

        metrics
            .write_report(&path, "failure", Some("boom"))
            .expect("write report");
        metrics
            .write_report(&path, "success", None)
            .expect("write report");

        let contents = std::fs::read_to_string(&path).expect("read report");
        let lines: Vec<serde_json::Value> = contents
            .lines()
            .map(|line| serde_json::from_str(line).expect("valid json"))
            .collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["outcome"], "failure");
        assert_eq!(lines[0]["error"], "boom");
        assert_eq!(lines[1]["outcome"], "success");
        assert!(lines[1].get("error").is_none());
        assert_eq!(lines[1]["meta"]["pid"], std::process::id());
    }
}
