//! Report Data Structures

use chrono::{DateTime, Utc};
use planbench_metrics::{MetricKey, TrialRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Experiment name written when the world model has none
pub const NO_NAME: &str = "NO_NAME";
/// Host name written when it cannot be determined
pub const UNKNOWN_HOST: &str = "UNKNOWN";

/// Complete benchmark report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkReport {
    /// Header metadata
    pub meta: ReportMeta,
    /// One entry per `(backend, algorithm)` pair, in execution order
    pub entries: Vec<ReportEntry>,
}

/// Run metadata written in the report header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMeta {
    /// Experiment (world model) name
    pub experiment: String,
    /// Host the benchmark ran on
    pub host: String,
    /// Start of data collection
    pub started_at: DateTime<Utc>,
    /// Format of `problem`, e.g. `JSON`
    pub payload_tag: String,
    /// Serialized problem description
    pub problem: String,
    /// Per-attempt planning time budget, seconds
    pub allowed_planning_time: f64,
    /// Wall-clock time spent collecting data, seconds
    pub duration_secs: f64,
    /// Number of `(backend, algorithm)` entries
    pub planner_count: usize,
}

impl ReportMeta {
    /// Experiment name as written (`NO_NAME` if empty)
    pub fn experiment_label(&self) -> &str {
        if self.experiment.is_empty() {
            NO_NAME
        } else {
            &self.experiment
        }
    }

    /// Host name as written (`UNKNOWN` if empty)
    pub fn host_label(&self) -> &str {
        if self.host.is_empty() {
            UNKNOWN_HOST
        } else {
            &self.host
        }
    }

    /// Start timestamp as written
    pub fn started_at_label(&self) -> String {
        format_timestamp(&self.started_at)
    }
}

/// ISO-8601 extended timestamp with microseconds, e.g. `2024-03-01T09:15:00.000000`
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

/// Runs of one `(backend, algorithm)` pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEntry {
    /// `<backend description>_<algorithm id>`
    pub label: String,
    /// Sorted union of the metric keys of all runs
    pub properties: Vec<MetricKey>,
    /// Runs in execution order
    pub runs: Vec<TrialRecord>,
}

impl ReportEntry {
    /// Create an entry, deriving the property columns from the runs
    pub fn new(label: impl Into<String>, runs: Vec<TrialRecord>) -> Self {
        let properties: BTreeSet<MetricKey> =
            runs.iter().flat_map(|r| r.keys().cloned()).collect();
        Self {
            label: label.into(),
            properties: properties.into_iter().collect(),
            runs,
        }
    }

    /// Label for a backend description and algorithm id
    pub fn label_for(backend: &str, algorithm: &str) -> String {
        format!("{}_{}", backend, algorithm)
    }
}

/// Accumulates entries in execution order and yields the final report
#[derive(Debug, Clone)]
pub struct ReportBuilder {
    experiment: String,
    host: String,
    started_at: DateTime<Utc>,
    payload_tag: String,
    problem: String,
    allowed_planning_time: f64,
    entries: Vec<ReportEntry>,
}

impl ReportBuilder {
    /// Start a report for a run that began at `started_at`
    pub fn new(
        experiment: impl Into<String>,
        host: impl Into<String>,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            experiment: single_line("experiment name", experiment.into()),
            host: single_line("host name", host.into()),
            started_at,
            payload_tag: String::new(),
            problem: String::new(),
            allowed_planning_time: 0.0,
            entries: Vec::new(),
        }
    }

    /// Set the serialized problem description and its format tag
    pub fn with_problem(mut self, payload_tag: impl Into<String>, problem: impl Into<String>) -> Self {
        self.payload_tag = payload_tag.into();
        self.problem = problem.into();
        self
    }

    /// Set the per-attempt planning time budget, seconds
    pub fn with_allowed_planning_time(mut self, seconds: f64) -> Self {
        self.allowed_planning_time = seconds;
        self
    }

    /// Append the runs of one entry
    pub fn push_entry(&mut self, label: impl Into<String>, runs: Vec<TrialRecord>) -> &mut Self {
        let label = single_line("entry label", label.into());
        self.entries.push(ReportEntry::new(label, runs));
        self
    }

    /// Number of entries so far
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Finish the report after `duration_secs` of data collection
    pub fn finish(self, duration_secs: f64) -> BenchmarkReport {
        BenchmarkReport {
            meta: ReportMeta {
                experiment: self.experiment,
                host: self.host,
                started_at: self.started_at,
                payload_tag: self.payload_tag,
                problem: self.problem,
                allowed_planning_time: self.allowed_planning_time,
                duration_secs,
                planner_count: self.entries.len(),
            },
            entries: self.entries,
        }
    }
}

/// Names occupy exactly one report line; line breaks become spaces
fn single_line(field: &str, text: String) -> String {
    if !text.contains(['\n', '\r']) {
        return text;
    }
    tracing::warn!(
        "{} '{}' contains line breaks, writing it on one line",
        field,
        text.escape_debug()
    );
    text.replace(['\r', '\n'], " ")
}
