//! Trajectory Geometry
//!
//! Quality measures over a waypoint sequence. All of them are defined for
//! degenerate input: empty and single-point paths, repeated waypoints and
//! collinear segments resolve to a value instead of an error or NaN.

use planbench_core::{RobotState, WorldModel};
use std::f64::consts::PI;

/// Sum of distances between consecutive waypoints (0 below two waypoints)
pub fn path_length(world: &dyn WorldModel, waypoints: &[RobotState]) -> f64 {
    waypoints
        .windows(2)
        .map(|w| world.distance(&w[0], &w[1]))
        .sum()
}

/// True iff no waypoint is in collision
pub fn is_correct(world: &dyn WorldModel, waypoints: &[RobotState]) -> bool {
    !waypoints.iter().any(|w| world.is_in_collision(w))
}

/// Mean distance to the nearest collision (0 for an empty path)
pub fn clearance(world: &dyn WorldModel, waypoints: &[RobotState]) -> f64 {
    if waypoints.is_empty() {
        return 0.0;
    }
    let total: f64 = waypoints
        .iter()
        .map(|w| world.distance_to_collision(w))
        .sum();
    total / waypoints.len() as f64
}

/// Exterior-angle smoothness score.
///
/// For every triplet `(k-2, k-1, k)` with `a = d(k-2, k-1)`,
/// `b = d(k-1, k)` and `c = d(k-2, k)`, the law of cosines gives
/// `cos θ = (a² + b² - c²) / 2ab`. Only triplets with `cos θ` strictly inside
/// `(-1, 1)` contribute `(2 (π - acos cos θ))²`; zero-length segments and
/// collinear triplets contribute nothing. The sum is divided by the number
/// of waypoints. Paths with fewer than three waypoints score 0.
pub fn smoothness(world: &dyn WorldModel, waypoints: &[RobotState]) -> f64 {
    if waypoints.len() < 3 {
        return 0.0;
    }

    let mut sum = 0.0;
    let mut a = world.distance(&waypoints[0], &waypoints[1]);
    for k in 2..waypoints.len() {
        let b = world.distance(&waypoints[k - 1], &waypoints[k]);
        let c = world.distance(&waypoints[k - 2], &waypoints[k]);
        if let Some(cos_theta) = triangle_cosine(a, b, c) {
            let angle = PI - cos_theta.acos();
            let u = 2.0 * angle;
            sum += u * u;
        }
        a = b;
    }
    sum / waypoints.len() as f64
}

/// Cosine of the angle between sides `a` and `b`, if strictly inside (-1, 1)
fn triangle_cosine(a: f64, b: f64, c: f64) -> Option<f64> {
    if a <= 0.0 || b <= 0.0 {
        return None;
    }
    let cos_theta = (a * a + b * b - c * c) / (2.0 * a * b);
    (cos_theta > -1.0 && cos_theta < 1.0).then_some(cos_theta)
}
