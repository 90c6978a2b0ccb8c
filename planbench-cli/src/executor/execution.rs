//! Trial Execution
//!
//! Runs the repetitions of one `(backend, algorithm)` entry and scores each
//! attempt.
//!
//! ## Data Flow
//!
//! ```text
//! backend.solve(world, request, algorithm)   (timed, panics caught)
//!        │
//!        ▼
//!   SolveOutcome { solved, DetailedResult }
//!        │  TrajectorySampler::sample_all
//!        ▼
//!   Vec<SampledSegment>
//!        │  MetricsCollector::collect
//!        ▼
//!   TrialRecord
//! ```
//!
//! A backend fault (an `Err` or a panic) ends the entry: the records of the
//! repetitions already completed are kept and the fault is reported as a
//! [`TrialFailure`].

use indicatif::ProgressBar;
use planbench_core::{
    BackendError, DetailedResult, MotionRequest, PlannerBackend, SolveOutcome, TrajectorySampler,
    WorldModel,
};
use planbench_metrics::{MetricsCollector, TrialRecord};
use serde::Serialize;
use std::time::Instant;

/// A backend fault that ended an entry early
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrialFailure {
    /// Registry name of the backend
    pub backend: String,
    /// Algorithm id being run
    pub algorithm: String,
    /// Zero-based repetition that faulted
    pub repetition: usize,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for TrialFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} / {} (run {}): {}",
            self.backend, self.algorithm, self.repetition, self.message
        )
    }
}

/// Outcome of running one entry
#[derive(Debug, Default)]
pub struct EntryRun {
    /// One record per completed repetition, in order
    pub records: Vec<TrialRecord>,
    /// First solved result of this entry
    pub first_success: Option<DetailedResult>,
    /// Fault that ended the entry early
    pub failure: Option<TrialFailure>,
}

/// Runs and scores planning attempts against one world model
pub struct TrialRunner<'w> {
    world: &'w dyn WorldModel,
    progress: Option<ProgressBar>,
}

impl<'w> TrialRunner<'w> {
    /// Create a runner that evaluates trajectories in `world`
    pub fn new(world: &'w dyn WorldModel) -> Self {
        Self {
            world,
            progress: None,
        }
    }

    /// Advance `bar` once per attempted repetition
    pub fn with_progress(mut self, bar: ProgressBar) -> Self {
        self.progress = Some(bar);
        self
    }

    /// Run `repetitions` attempts of `algorithm` on `backend`
    pub fn run(
        &self,
        backend_name: &str,
        backend: &dyn PlannerBackend,
        algorithm: &str,
        request: &MotionRequest,
        repetitions: usize,
    ) -> EntryRun {
        let sampler = TrajectorySampler::new(self.world);
        let collector = MetricsCollector::new(self.world);
        let mut run = EntryRun {
            records: Vec::with_capacity(repetitions),
            ..Default::default()
        };

        for repetition in 0..repetitions {
            if let Some(pb) = &self.progress {
                pb.inc(1);
            }

            let start = Instant::now();
            let outcome = solve_guarded(backend, self.world, request, algorithm);
            let elapsed = start.elapsed();

            let outcome = match outcome {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!(
                        "Backend '{}' failed on '{}' (run {}): {}",
                        backend_name,
                        algorithm,
                        repetition,
                        e
                    );
                    run.failure = Some(TrialFailure {
                        backend: backend_name.to_string(),
                        algorithm: algorithm.to_string(),
                        repetition,
                        message: e.to_string(),
                    });
                    break;
                }
            };

            let segments = if outcome.solved {
                sampler.sample_all(&outcome.result)
            } else {
                Vec::new()
            };
            let record = collector.collect(&segments, outcome.solved, elapsed);
            tracing::debug!(
                "{} / {} run {}: solved={} in {:.6}s",
                backend_name,
                algorithm,
                repetition,
                outcome.solved,
                elapsed.as_secs_f64()
            );
            run.records.push(record);

            if outcome.solved && run.first_success.is_none() {
                run.first_success = Some(outcome.result);
            }
        }

        run
    }
}

/// Call `solve`, turning a panic into [`BackendError::Panicked`]
fn solve_guarded(
    backend: &dyn PlannerBackend,
    world: &dyn WorldModel,
    request: &MotionRequest,
    algorithm: &str,
) -> Result<SolveOutcome, BackendError> {
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        backend.solve(world, request, algorithm)
    }));

    match result {
        Ok(outcome) => outcome,
        Err(panic) => {
            let message = if let Some(s) = panic.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            };
            Err(BackendError::Panicked(message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planbench_core::{
        Capability, JointTrajectory, RobotState, SphereWorld, TrajectorySegment,
    };
    use std::cell::Cell;
    use std::time::Duration;

    /// Solves on every `solve_every`-th call, faults on call `fault_at`
    struct Scripted {
        calls: Cell<usize>,
        solve_every: usize,
        fault_at: Option<usize>,
        panic: bool,
    }

    impl Scripted {
        fn new(solve_every: usize) -> Self {
            Self {
                calls: Cell::new(0),
                solve_every,
                fault_at: None,
                panic: false,
            }
        }
    }

    impl PlannerBackend for Scripted {
        fn describe(&self) -> String {
            "scripted".to_string()
        }

        fn algorithms(&self) -> Vec<String> {
            vec!["line".to_string()]
        }

        fn can_service(&self, _request: &MotionRequest) -> Capability {
            Capability::supported()
        }

        fn solve(
            &self,
            _world: &dyn WorldModel,
            _request: &MotionRequest,
            _algorithm: &str,
        ) -> Result<SolveOutcome, BackendError> {
            let call = self.calls.get();
            self.calls.set(call + 1);

            if Some(call) == self.fault_at {
                if self.panic {
                    panic!("solver exploded");
                }
                return Err(BackendError::Internal("lost contact".into()));
            }
            if call % self.solve_every != self.solve_every - 1 {
                return Ok(SolveOutcome::unsolved());
            }

            let end = call as f64;
            Ok(SolveOutcome::solved(DetailedResult {
                trajectory_start: RobotState::from_positions([0.0, 0.0]),
                segments: vec![TrajectorySegment {
                    description: "plan".to_string(),
                    trajectory: JointTrajectory::new(
                        vec!["j0".into(), "j1".into()],
                        vec![vec![0.0, 0.0], vec![end, 0.0]],
                    ),
                    processing_time: Duration::from_micros(10),
                }],
            }))
        }
    }

    fn world() -> SphereWorld {
        SphereWorld::new("exec", RobotState::from_positions([0.0, 0.0]))
    }

    #[test]
    fn test_one_record_per_repetition() {
        let w = world();
        let backend = Scripted::new(1);
        let runner = TrialRunner::new(&w);

        let run = runner.run("s", &backend, "line", &MotionRequest::default(), 4);

        assert_eq!(run.records.len(), 4);
        assert!(run.failure.is_none());
        assert!(run.records.iter().all(|r| r.boolean("solved") == Some(true)));
    }

    #[test]
    fn test_unsolved_records_have_two_metrics() {
        let w = world();
        let backend = Scripted::new(usize::MAX);
        let runner = TrialRunner::new(&w);

        let run = runner.run("s", &backend, "line", &MotionRequest::default(), 2);

        assert!(run.records.iter().all(|r| r.len() == 2));
        assert!(run.first_success.is_none());
    }

    #[test]
    fn test_first_success_is_kept() {
        let w = world();
        // solves on calls 1 and 3
        let backend = Scripted::new(2);
        let runner = TrialRunner::new(&w);

        let run = runner.run("s", &backend, "line", &MotionRequest::default(), 4);

        let first = run.first_success.unwrap();
        assert_eq!(first.segments[0].trajectory.points[1], vec![1.0, 0.0]);
        assert_eq!(run.records[0].boolean("solved"), Some(false));
        assert_eq!(run.records[1].real("path_plan_length"), Some(1.0));
    }

    #[test]
    fn test_fault_keeps_completed_runs() {
        let w = world();
        let mut backend = Scripted::new(1);
        backend.fault_at = Some(2);
        let runner = TrialRunner::new(&w);

        let run = runner.run("s", &backend, "line", &MotionRequest::default(), 5);

        assert_eq!(run.records.len(), 2);
        let failure = run.failure.unwrap();
        assert_eq!(failure.repetition, 2);
        assert_eq!(failure.backend, "s");
        assert!(failure.message.contains("lost contact"));
    }

    #[test]
    fn test_panic_is_caught() {
        let w = world();
        let mut backend = Scripted::new(1);
        backend.fault_at = Some(0);
        backend.panic = true;
        let runner = TrialRunner::new(&w);

        let run = runner.run("s", &backend, "line", &MotionRequest::default(), 3);

        assert!(run.records.is_empty());
        let failure = run.failure.unwrap();
        assert!(failure.message.contains("solver exploded"));
    }

    #[test]
    fn test_progress_counts_attempts() {
        let w = world();
        let backend = Scripted::new(1);
        let pb = ProgressBar::hidden();
        pb.set_length(3);
        let runner = TrialRunner::new(&w).with_progress(pb.clone());

        runner.run("s", &backend, "line", &MotionRequest::default(), 3);

        assert_eq!(pb.position(), 3);
    }
}
