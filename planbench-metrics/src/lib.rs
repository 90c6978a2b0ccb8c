#![warn(missing_docs)]
//! PlanBench Metrics - Trajectory Scoring
//!
//! Turns the outcome of one planning attempt into a [`TrialRecord`]:
//! - Path length, clearance and smoothness over resolved waypoints
//! - Collision-based correctness per trajectory segment
//! - Planning overhead not attributed to any segment
//! - Per-entry summaries across repeated trials
//!
//! All metrics are robust to degenerate trajectories: empty, single-point,
//! zero-length and collinear paths produce defined values, never NaN.

mod collector;
mod geometry;
mod record;
mod summary;

pub use collector::{MetricsCollector, PROCESS_TIME, SOLVED, TOTAL_TIME, segment_metric};
pub use geometry::{clearance, is_correct, path_length, smoothness};
pub use record::{MetricKey, MetricKind, MetricValue, TrialRecord, TrialRecordBuilder};
pub use summary::{Distribution, EntryStatistics, summarize};
