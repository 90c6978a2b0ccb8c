#![warn(missing_docs)]
//! PlanBench Core - Collaborator Contracts
//!
//! This crate defines what the benchmark needs from its environment:
//! - `PlannerBackend` trait every planning backend is driven through
//! - `BackendRegistry` of loaded backends, iterated in name order
//! - `WorldModel` trait for collision, clearance and distance queries
//! - `TrajectorySampler` turning raw backend output into scored waypoints
//! - Request types describing what to benchmark

mod backend;
mod registry;
mod request;
mod state;
mod trajectory;
mod world;

pub use backend::{BackendError, Capability, PlannerBackend, SolveOutcome};
pub use registry::{BackendInfo, BackendRegistry};
pub use request::{BenchmarkRequest, DEFAULT_AVERAGE_COUNT, MotionRequest, PlannerSelection};
pub use state::RobotState;
pub use trajectory::{
    DetailedResult, JointTrajectory, SampledSegment, TrajectorySampler, TrajectorySegment,
};
pub use world::{SphereObstacle, SphereWorld, WorldModel};
