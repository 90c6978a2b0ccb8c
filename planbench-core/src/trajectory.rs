//! Trajectories and Sampling
//!
//! A backend returns a [`DetailedResult`]: one or more named trajectory
//! segments (e.g. "plan", "simplify", "interpolate") plus the state the
//! trajectory starts from. [`TrajectorySampler`] turns a segment into fully
//! resolved waypoints that the metrics can score.
//!
//! ## Waypoint Resolution
//!
//! ```text
//! world.current_state()
//!        │  overlay trajectory_start
//!        ▼
//!   start state
//!        │  overlay point k (by joint name)
//!        ▼
//!  world.resolve_state()  ──►  waypoint k
//! ```

use crate::state::RobotState;
use crate::world::WorldModel;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Sequence of joint-space points over a fixed set of joints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JointTrajectory {
    /// Joints each point assigns
    pub joint_names: Vec<String>,
    /// Points, each parallel with `joint_names`
    pub points: Vec<Vec<f64>>,
}

impl JointTrajectory {
    /// Create a trajectory over the given joints
    pub fn new(joint_names: Vec<String>, points: Vec<Vec<f64>>) -> Self {
        Self {
            joint_names,
            points,
        }
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the trajectory has no points
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// One named trajectory segment produced by a backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySegment {
    /// Segment name, used in metric names (`path_<description>_length`)
    pub description: String,
    /// Joint-space trajectory
    pub trajectory: JointTrajectory,
    /// Time the backend spent producing this segment
    pub processing_time: Duration,
}

/// Full result of one planning attempt
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetailedResult {
    /// State the trajectory starts from
    pub trajectory_start: RobotState,
    /// Trajectory segments in production order
    pub segments: Vec<TrajectorySegment>,
}

impl DetailedResult {
    /// Total processing time reported across all segments
    pub fn total_processing_time(&self) -> Duration {
        self.segments.iter().map(|s| s.processing_time).sum()
    }
}

/// Waypoints of one segment, ready for scoring
#[derive(Debug, Clone, PartialEq)]
pub struct SampledSegment {
    /// Segment name
    pub description: String,
    /// Fully resolved waypoints
    pub waypoints: Vec<RobotState>,
    /// Time the backend spent producing this segment
    pub processing_time: Duration,
}

/// Converts raw trajectory segments into fully resolved waypoints
pub struct TrajectorySampler<'w> {
    world: &'w dyn WorldModel,
}

impl<'w> TrajectorySampler<'w> {
    /// Create a sampler that resolves states against `world`
    pub fn new(world: &'w dyn WorldModel) -> Self {
        Self { world }
    }

    /// Waypoints of segment `segment_index`.
    ///
    /// Returns an empty sequence if the index is out of range or the
    /// segment has no points.
    pub fn sample(&self, result: &DetailedResult, segment_index: usize) -> Vec<RobotState> {
        let Some(segment) = result.segments.get(segment_index) else {
            tracing::debug!(
                segment_index,
                segments = result.segments.len(),
                "segment index out of range"
            );
            return Vec::new();
        };

        let trajectory = &segment.trajectory;
        if trajectory.is_empty() {
            return Vec::new();
        }

        let mut start = self.world.current_state();
        start.apply(&result.trajectory_start);

        trajectory
            .points
            .iter()
            .enumerate()
            .filter_map(|(k, point)| {
                if point.len() != trajectory.joint_names.len() {
                    tracing::debug!(
                        segment = %segment.description,
                        point = k,
                        expected = trajectory.joint_names.len(),
                        got = point.len(),
                        "skipping malformed trajectory point"
                    );
                    return None;
                }
                let mut state = start.clone();
                for (name, value) in trajectory.joint_names.iter().zip(point) {
                    state.set(name, *value);
                }
                Some(self.world.resolve_state(state))
            })
            .collect()
    }

    /// Waypoints of every segment, in segment order
    pub fn sample_all(&self, result: &DetailedResult) -> Vec<SampledSegment> {
        result
            .segments
            .iter()
            .enumerate()
            .map(|(i, segment)| SampledSegment {
                description: segment.description.clone(),
                waypoints: self.sample(result, i),
                processing_time: segment.processing_time,
            })
            .collect()
    }
}
