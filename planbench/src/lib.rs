#![warn(missing_docs)]
//! # PlanBench
//!
//! Benchmark harness for interchangeable motion-planning backends.
//!
//! PlanBench runs every selected `(backend, algorithm)` pair on one planning
//! problem a fixed number of times, scores each attempt and writes a
//! self-describing report:
//! - **Backend Contract**: one `PlannerBackend` trait for every planner family
//! - **Deterministic Execution**: registry name order × algorithm order × repetition
//! - **Trajectory Metrics**: correctness, length, clearance, smoothness, timing
//! - **Fault Capture**: a backend error or panic ends its entry, not the run
//! - **Log Reports**: line-oriented output that can be parsed back
//!
//! ## Quick Start
//!
//! ```ignore
//! use planbench::prelude::*;
//!
//! struct MyPlanner;
//!
//! impl PlannerBackend for MyPlanner {
//!     fn describe(&self) -> String { "mine".into() }
//!     fn algorithms(&self) -> Vec<String> { vec!["rrt".into()] }
//!     fn can_service(&self, _: &MotionRequest) -> Capability { Capability::supported() }
//!     fn solve(
//!         &self,
//!         world: &dyn WorldModel,
//!         request: &MotionRequest,
//!         algorithm: &str,
//!     ) -> Result<SolveOutcome, BackendError> {
//!         // plan here
//!         Ok(SolveOutcome::unsolved())
//!     }
//! }
//!
//! fn main() -> anyhow::Result<()> {
//!     let world = SphereWorld::new("scene", RobotState::from_positions([0.0, 0.0]));
//!     let registry = BackendRegistry::new().with_backend("mine", MyPlanner);
//!     let request = BenchmarkRequest::new(MotionRequest::default());
//!     planbench::run(&registry, &world, request)
//! }
//! ```

// Re-export core types
pub use planbench_core::{
    BackendError, BackendInfo, BackendRegistry, BenchmarkRequest, Capability, DetailedResult,
    JointTrajectory, MotionRequest, PlannerBackend, PlannerSelection, RobotState, SampledSegment,
    SolveOutcome, SphereObstacle, SphereWorld, TrajectorySampler, TrajectorySegment, WorldModel,
};

// Re-export metrics
pub use planbench_metrics::{
    Distribution, EntryStatistics, MetricKey, MetricKind, MetricValue, MetricsCollector,
    TrialRecord, summarize,
};

// Re-export report types
pub use planbench_report::{
    BenchmarkReport, OutputFormat, ParseError, ReportBuilder, ReportEntry, ReportError,
    ReportMeta, ReportWriter, generate_json_report, generate_log_report, parse_log_report,
};

// Re-export orchestration
pub use planbench_cli::{
    BenchmarkError, BenchmarkOrchestrator, BenchmarkOutcome, BenchmarkResponse, ResponseStatus,
    TrialFailure, TrialRunner,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        BackendError, BackendRegistry, BenchmarkOrchestrator, BenchmarkRequest, Capability,
        DetailedResult, JointTrajectory, MotionRequest, PlannerBackend, PlannerSelection,
        ReportWriter, RobotState, SolveOutcome, SphereWorld, TrajectorySegment, WorldModel,
    };
}

/// Run the PlanBench CLI harness.
///
/// Call this from your benchmark binary's `main()`:
/// ```ignore
/// fn main() -> anyhow::Result<()> {
///     planbench::run(&registry, &world, request)
/// }
/// ```
pub use planbench_cli::run;
