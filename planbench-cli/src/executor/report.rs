//! Report Building
//!
//! Starts the report of a run with its header metadata. Entries are
//! appended by the orchestrator as the matrix executes.
//!
//! ## Pipeline
//!
//! ```text
//!   world name + MotionRequest
//!              │
//!              ▼
//!   ┌─────────────────────┐
//!   │   ReportBuilder     │  host, start time, JSON problem
//!   └──────────┬──────────┘
//!              │  push_entry per (backend, algorithm)
//!              ▼
//!   ┌─────────────────────┐
//!   │  BenchmarkReport    │  Ready for log/JSON output
//!   └─────────────────────┘
//! ```

use super::metadata::{PROBLEM_PAYLOAD_TAG, hostname, serialize_problem, start_time};
use planbench_core::MotionRequest;
use planbench_report::{ReportBuilder, ReportEntry};

/// Begin a report for `problem` run against the world named `experiment`
pub fn start_report(experiment: &str, problem: &MotionRequest) -> ReportBuilder {
    ReportBuilder::new(experiment, hostname(), start_time())
        .with_problem(PROBLEM_PAYLOAD_TAG, serialize_problem(problem))
        .with_allowed_planning_time(problem.allowed_planning_time)
}

/// Label of the entry for `algorithm` on a backend described as `description`
pub fn entry_label(description: &str, algorithm: &str) -> String {
    ReportEntry::label_for(description, algorithm)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_report_fills_header() {
        let problem = MotionRequest {
            group_name: "arm".into(),
            allowed_planning_time: 2.5,
            ..Default::default()
        };

        let report = start_report("kitchen", &problem).finish(0.0);

        assert_eq!(report.meta.experiment, "kitchen");
        assert_eq!(report.meta.payload_tag, "JSON");
        assert_eq!(report.meta.allowed_planning_time, 2.5);
        assert!(report.meta.problem.contains("\"group_name\": \"arm\""));
        assert_eq!(report.meta.planner_count, 0);
    }

    #[test]
    fn test_entry_label() {
        assert_eq!(entry_label("ompl", "RRT"), "ompl_RRT");
    }
}
