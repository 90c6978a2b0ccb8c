//! Benchmark Executor
//!
//! Runs the benchmark matrix and turns its results into a report.
//!
//! ## Pipeline Overview
//!
//! ```text
//! ExecutionPlan (from planner)
//!       │
//!       ▼
//! ┌─────────────┐
//! │  execution  │  Run trials, score them
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │   report    │  Header metadata + entries
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ statistics  │  Per-entry summaries (parallel)
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ formatting  │  Human-readable output
//! └─────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`execution`] - Trial execution and fault capture
//! - [`report`] - Report header construction
//! - [`statistics`] - Parallel statistics computation
//! - [`formatting`] - Human-readable output formatting
//! - [`metadata`] - Host, time and problem metadata

mod execution;
mod formatting;
mod metadata;
mod report;
mod statistics;

// Re-export public API
pub use execution::{EntryRun, TrialFailure, TrialRunner};
pub use formatting::format_human_output;
pub use metadata::{PROBLEM_PAYLOAD_TAG, hostname, serialize_problem};
pub use report::{entry_label, start_report};
pub use statistics::compute_statistics;
