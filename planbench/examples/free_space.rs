//! PlanBench Example Benchmark
//!
//! Two toy backends race across a 2-D configuration space with two spherical
//! obstacles. Serves as a template for wiring real planners into the harness.
//!
//! Run with:
//!   cargo run --example free_space                       # Run everything
//!   cargo run --example free_space -- list               # List backends
//!   cargo run --example free_space -- -n 20              # 20 runs per algorithm
//!   cargo run --example free_space -- --filter jitter    # Only the jittered backend
//!   cargo run --example free_space -- --format json -o target/planbench

use planbench::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cell::RefCell;
use std::time::{Duration, Instant};

// ============================================================================
// Backends
// ============================================================================

/// Evenly spaced waypoints on the segment from start to goal
fn interpolate(start: &RobotState, goal: &RobotState, steps: usize) -> Vec<Vec<f64>> {
    (0..=steps)
        .map(|i| {
            let t = i as f64 / steps as f64;
            start
                .positions
                .iter()
                .zip(&goal.positions)
                .map(|(a, b)| a + t * (b - a))
                .collect()
        })
        .collect()
}

/// Straight-line interpolation, solved only if the line is collision free
struct StraightLine;

impl PlannerBackend for StraightLine {
    fn describe(&self) -> String {
        "straight".to_string()
    }

    fn algorithms(&self) -> Vec<String> {
        vec!["coarse".to_string(), "fine".to_string()]
    }

    fn can_service(&self, request: &MotionRequest) -> Capability {
        if request.start_state.len() == request.goal_state.len() {
            Capability::supported()
        } else {
            Capability::unsupported("start and goal have different dimensions")
        }
    }

    fn solve(
        &self,
        world: &dyn WorldModel,
        request: &MotionRequest,
        algorithm: &str,
    ) -> Result<SolveOutcome, BackendError> {
        let steps = match algorithm {
            "coarse" => 4,
            "fine" => 32,
            other => return Err(BackendError::UnknownAlgorithm(other.to_string())),
        };

        let start = Instant::now();
        let points = interpolate(&request.start_state, &request.goal_state, steps);
        let names = request.start_state.joint_names.clone();
        let collides = points
            .iter()
            .any(|p| world.is_in_collision(&RobotState::new(names.clone(), p.clone())));
        if collides {
            return Ok(SolveOutcome::unsolved());
        }

        Ok(SolveOutcome::solved(DetailedResult {
            trajectory_start: request.start_state.clone(),
            segments: vec![TrajectorySegment {
                description: "plan".to_string(),
                trajectory: JointTrajectory::new(names, points),
                processing_time: start.elapsed(),
            }],
        }))
    }
}

/// Random perturbations of the straight line, retried until collision free
struct Jittered {
    rng: RefCell<StdRng>,
}

impl Jittered {
    fn new(seed: u64) -> Self {
        Self {
            rng: RefCell::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl PlannerBackend for Jittered {
    fn describe(&self) -> String {
        "jitter".to_string()
    }

    fn algorithms(&self) -> Vec<String> {
        vec!["small".to_string(), "large".to_string()]
    }

    fn can_service(&self, _request: &MotionRequest) -> Capability {
        Capability::supported()
    }

    fn solve(
        &self,
        world: &dyn WorldModel,
        request: &MotionRequest,
        algorithm: &str,
    ) -> Result<SolveOutcome, BackendError> {
        let amplitude = match algorithm {
            "small" => 0.3,
            "large" => 1.5,
            other => return Err(BackendError::UnknownAlgorithm(other.to_string())),
        };
        let budget = Duration::from_secs_f64(request.allowed_planning_time);
        let names = request.start_state.joint_names.clone();
        let started = Instant::now();
        let mut rng = self.rng.borrow_mut();

        for _ in 0..50 {
            if started.elapsed() > budget {
                break;
            }
            let mut points = interpolate(&request.start_state, &request.goal_state, 16);
            let last = points.len() - 1;
            for point in &mut points[1..last] {
                for x in point.iter_mut() {
                    *x += rng.random_range(-amplitude..amplitude);
                }
            }

            let collides = points
                .iter()
                .any(|p| world.is_in_collision(&RobotState::new(names.clone(), p.clone())));
            if collides {
                continue;
            }

            let plan_time = started.elapsed();
            let simplify_start = Instant::now();
            let simplified = vec![
                points[0].clone(),
                points[last / 2].clone(),
                points[last].clone(),
            ];

            return Ok(SolveOutcome::solved(DetailedResult {
                trajectory_start: request.start_state.clone(),
                segments: vec![
                    TrajectorySegment {
                        description: "plan".to_string(),
                        trajectory: JointTrajectory::new(names.clone(), points),
                        processing_time: plan_time,
                    },
                    TrajectorySegment {
                        description: "simplify".to_string(),
                        trajectory: JointTrajectory::new(names, simplified),
                        processing_time: simplify_start.elapsed(),
                    },
                ],
            }));
        }

        Ok(SolveOutcome::unsolved())
    }
}

// ============================================================================
// Main
// ============================================================================

fn main() -> anyhow::Result<()> {
    let world = SphereWorld::new("free_space", RobotState::from_positions([0.0, 0.0]))
        .with_obstacle(vec![5.0, 1.5], 1.0)
        .with_obstacle(vec![2.0, -2.0], 0.75);

    let registry = BackendRegistry::new()
        .with_backend("straight", StraightLine)
        .with_backend("jitter", Jittered::new(42));

    let request = BenchmarkRequest::new(MotionRequest {
        group_name: "point".to_string(),
        start_state: RobotState::from_positions([0.0, 0.0]),
        goal_state: RobotState::from_positions([10.0, 0.0]),
        allowed_planning_time: 1.0,
        ..Default::default()
    })
    .with_default_average_count(5);

    planbench::run(&registry, &world, request)
}
