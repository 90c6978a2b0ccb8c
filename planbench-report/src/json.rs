//! JSON Output
//!
//! Machine-readable companion to the log report. Carries the same header
//! and raw runs plus per-entry summaries.

use crate::report::{BenchmarkReport, ReportMeta};
use planbench_metrics::{EntryStatistics, TrialRecord};
use serde::{Deserialize, Serialize};

/// Schema identifier written into every JSON report
pub const SCHEMA: &str = "planbench-report";
/// Schema version
pub const SCHEMA_VERSION: &str = "1";

/// Schema information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSchema {
    /// Schema identifier
    pub schema: String,
    /// Schema version
    pub version: String,
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    schema: ReportSchema,
    meta: &'a ReportMeta,
    entries: Vec<JsonEntry<'a>>,
}

#[derive(Debug, Serialize)]
struct JsonEntry<'a> {
    label: &'a str,
    properties: Vec<&'a str>,
    runs: &'a [TrialRecord],
    #[serde(skip_serializing_if = "Option::is_none")]
    statistics: Option<&'a EntryStatistics>,
}

/// Generate a prettified JSON report.
///
/// `statistics` is matched to entries by position; missing trailing
/// statistics are omitted.
pub fn generate_json_report(
    report: &BenchmarkReport,
    statistics: &[EntryStatistics],
) -> Result<String, serde_json::Error> {
    let entries = report
        .entries
        .iter()
        .enumerate()
        .map(|(i, entry)| JsonEntry {
            label: &entry.label,
            properties: entry.properties.iter().map(|p| p.as_str()).collect(),
            runs: &entry.runs,
            statistics: statistics.get(i),
        })
        .collect();

    let json = JsonReport {
        schema: ReportSchema {
            schema: SCHEMA.to_string(),
            version: SCHEMA_VERSION.to_string(),
        },
        meta: &report.meta,
        entries,
    };
    serde_json::to_string_pretty(&json)
}
