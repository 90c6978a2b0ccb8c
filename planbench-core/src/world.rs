//! World Model
//!
//! The robot/world model is owned by the environment. The benchmark only
//! needs read access to it: the current state used to complete partial
//! waypoints, collision and clearance queries, and the configuration-space
//! distance metric.

use crate::state::RobotState;
use serde::{Deserialize, Serialize};

/// Read-only view of the robot and its environment
pub trait WorldModel {
    /// Scene name, written as the report's experiment name
    fn name(&self) -> &str;

    /// State used to fill joints a trajectory does not mention
    fn current_state(&self) -> RobotState;

    /// Whether `state` is in collision
    fn is_in_collision(&self, state: &RobotState) -> bool;

    /// Distance from `state` to the nearest collision
    fn distance_to_collision(&self, state: &RobotState) -> f64;

    /// Configuration-space distance between two states
    fn distance(&self, a: &RobotState, b: &RobotState) -> f64 {
        a.euclidean_distance(b)
    }

    /// Apply frame transforms to a fully populated state
    fn resolve_state(&self, state: RobotState) -> RobotState {
        state
    }
}

/// Spherical obstacle in configuration space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SphereObstacle {
    /// Center, one coordinate per joint of the world's robot
    pub center: Vec<f64>,
    /// Radius
    pub radius: f64,
}

/// Point robot in configuration space surrounded by spherical obstacles.
///
/// Distance to collision is the signed distance to the closest obstacle
/// surface (negative inside an obstacle). With no obstacles the clearance is
/// `f64::INFINITY`, so callers usually add at least one.
#[derive(Debug, Clone)]
pub struct SphereWorld {
    name: String,
    home: RobotState,
    obstacles: Vec<SphereObstacle>,
}

impl SphereWorld {
    /// Create a world whose current state is `home`
    pub fn new(name: impl Into<String>, home: RobotState) -> Self {
        Self {
            name: name.into(),
            home,
            obstacles: Vec::new(),
        }
    }

    /// Add an obstacle
    pub fn with_obstacle(mut self, center: Vec<f64>, radius: f64) -> Self {
        self.obstacles.push(SphereObstacle { center, radius });
        self
    }

    /// Obstacles in insertion order
    pub fn obstacles(&self) -> &[SphereObstacle] {
        &self.obstacles
    }

    fn coordinates(&self, state: &RobotState) -> Vec<f64> {
        self.home
            .joint_names
            .iter()
            .map(|name| state.position(name).unwrap_or(0.0))
            .collect()
    }

    fn signed_distance(obstacle: &SphereObstacle, point: &[f64]) -> f64 {
        let squared: f64 = obstacle
            .center
            .iter()
            .zip(point)
            .map(|(c, p)| (c - p) * (c - p))
            .sum();
        squared.sqrt() - obstacle.radius
    }
}

impl WorldModel for SphereWorld {
    fn name(&self) -> &str {
        &self.name
    }

    fn current_state(&self) -> RobotState {
        self.home.clone()
    }

    fn is_in_collision(&self, state: &RobotState) -> bool {
        let point = self.coordinates(state);
        self.obstacles
            .iter()
            .any(|o| Self::signed_distance(o, &point) < 0.0)
    }

    fn distance_to_collision(&self, state: &RobotState) -> f64 {
        let point = self.coordinates(state);
        self.obstacles
            .iter()
            .map(|o| Self::signed_distance(o, &point))
            .fold(f64::INFINITY, f64::min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> SphereWorld {
        SphereWorld::new("unit", RobotState::from_positions([0.0, 0.0]))
            .with_obstacle(vec![5.0, 0.0], 1.0)
    }

    #[test]
    fn test_collision_inside_obstacle() {
        let w = world();
        assert!(w.is_in_collision(&RobotState::from_positions([5.5, 0.0])));
        assert!(!w.is_in_collision(&RobotState::from_positions([0.0, 0.0])));
    }

    #[test]
    fn test_distance_to_collision() {
        let w = world();
        let d = w.distance_to_collision(&RobotState::from_positions([1.0, 0.0]));
        assert!((d - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_missing_joints_use_zero() {
        let w = world();
        let partial = RobotState::new(vec!["j0".into()], vec![2.0]);
        let d = w.distance_to_collision(&partial);
        assert!((d - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_no_obstacles_is_infinitely_clear() {
        let w = SphereWorld::new("empty", RobotState::from_positions([0.0]));
        assert!(w.distance_to_collision(&w.current_state()).is_infinite());
        assert!(!w.is_in_collision(&w.current_state()));
    }
}
