//! Metrics Collection
//!
//! Scores one trial. Every record carries `total_time` and `solved`; solved
//! trials additionally get per-segment quality metrics and the planning
//! overhead not attributed to any segment.
//!
//! ## Metric Names
//!
//! | Metric | Kind | Recorded when |
//! |--------|------|---------------|
//! | `total_time` | REAL | always |
//! | `solved` | BOOLEAN | always |
//! | `path_<seg>_correct` | BOOLEAN | solved |
//! | `path_<seg>_length` | REAL | solved |
//! | `path_<seg>_clearance` | REAL | solved |
//! | `path_<seg>_smoothness` | REAL | solved |
//! | `path_<seg>_time` | REAL | solved |
//! | `process_time` | REAL | solved |

use crate::geometry::{clearance, is_correct, path_length, smoothness};
use crate::record::TrialRecord;
use planbench_core::{SampledSegment, WorldModel};
use std::time::Duration;

/// Total wall-clock time of the trial, seconds
pub const TOTAL_TIME: &str = "total_time";
/// Whether the backend reported a solution
pub const SOLVED: &str = "solved";
/// Planning overhead not attributed to any segment, seconds
pub const PROCESS_TIME: &str = "process_time";

/// Name of a per-segment metric, e.g. `path_plan_length`.
///
/// Line breaks in the segment description are replaced by `_`.
pub fn segment_metric(segment: &str, metric: &str) -> String {
    format!("path_{}_{}", segment.replace(['\r', '\n'], "_"), metric)
}

/// Scores trials against a world model
pub struct MetricsCollector<'w> {
    world: &'w dyn WorldModel,
}

impl<'w> MetricsCollector<'w> {
    /// Create a collector that queries `world`
    pub fn new(world: &'w dyn WorldModel) -> Self {
        Self { world }
    }

    /// Score one trial
    pub fn collect(
        &self,
        segments: &[SampledSegment],
        solved: bool,
        elapsed: Duration,
    ) -> TrialRecord {
        let total_time = elapsed.as_secs_f64();
        let mut record = TrialRecord::builder()
            .real(TOTAL_TIME, total_time)
            .boolean(SOLVED, solved);

        if !solved {
            return record.build();
        }

        let mut process_time = total_time;
        for segment in segments {
            let name = &segment.description;
            let waypoints = &segment.waypoints;
            let segment_time = segment.processing_time.as_secs_f64();

            record = record
                .boolean(&segment_metric(name, "correct"), is_correct(self.world, waypoints))
                .real(&segment_metric(name, "length"), path_length(self.world, waypoints))
                .real(&segment_metric(name, "clearance"), clearance(self.world, waypoints))
                .real(&segment_metric(name, "smoothness"), smoothness(self.world, waypoints))
                .real(&segment_metric(name, "time"), segment_time);

            process_time -= segment_time;
        }

        record.real(PROCESS_TIME, planning_overhead(process_time)).build()
    }
}

/// Clamp the unattributed remainder of the trial time at zero
fn planning_overhead(remainder: f64) -> f64 {
    if remainder > 0.0 { remainder } else { 0.0 }
}
