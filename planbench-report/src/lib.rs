#![warn(missing_docs)]
//! PlanBench Report - Benchmark Output
//!
//! Generates the report formats:
//! - Log (self-describing text, the primary output)
//! - JSON (machine-readable, with per-entry summaries)
//!
//! Log reports can be read back with [`parse_log_report`].

mod json;
mod log;
mod report;
mod writer;

pub use json::{ReportSchema, SCHEMA, SCHEMA_VERSION, generate_json_report};
pub use log::{ParseError, generate_log_report, parse_log_report, write_log_report};
pub use report::{
    BenchmarkReport, NO_NAME, ReportBuilder, ReportEntry, ReportMeta, UNKNOWN_HOST,
    format_timestamp,
};
pub use writer::{OutputFormat, ReportError, ReportWriter};
