//! Robot States
//!
//! A robot configuration is a list of named joint positions. States coming
//! out of a backend are frequently partial (only the joints of the planning
//! group), so lookups and updates are by joint name rather than by index.

use serde::{Deserialize, Serialize};

/// Named joint configuration of the robot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RobotState {
    /// Joint names, parallel with `positions`
    pub joint_names: Vec<String>,
    /// Joint positions
    pub positions: Vec<f64>,
}

impl RobotState {
    /// Create a state from parallel name/position lists.
    ///
    /// Extra names or positions beyond the shorter list are dropped.
    pub fn new(joint_names: Vec<String>, positions: Vec<f64>) -> Self {
        let len = joint_names.len().min(positions.len());
        let mut joint_names = joint_names;
        let mut positions = positions;
        joint_names.truncate(len);
        positions.truncate(len);
        Self {
            joint_names,
            positions,
        }
    }

    /// Create a state with joints named `j0`, `j1`, ...
    pub fn from_positions(positions: impl IntoIterator<Item = f64>) -> Self {
        let positions: Vec<f64> = positions.into_iter().collect();
        let joint_names = (0..positions.len()).map(|i| format!("j{}", i)).collect();
        Self {
            joint_names,
            positions,
        }
    }

    /// Number of joints
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the state has no joints
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Position of a joint by name
    pub fn position(&self, name: &str) -> Option<f64> {
        self.joint_names
            .iter()
            .position(|n| n == name)
            .and_then(|i| self.positions.get(i).copied())
    }

    /// Set a joint position, appending the joint if it is not present yet.
    ///
    /// Names without a position are dropped first, as in [`new`](Self::new).
    pub fn set(&mut self, name: &str, value: f64) {
        let len = self.joint_names.len().min(self.positions.len());
        self.joint_names.truncate(len);
        self.positions.truncate(len);
        match self.joint_names.iter().position(|n| n == name) {
            Some(i) => self.positions[i] = value,
            None => {
                self.joint_names.push(name.to_string());
                self.positions.push(value);
            }
        }
    }

    /// Overlay every joint of `other` onto this state
    pub fn apply(&mut self, other: &RobotState) {
        for (name, value) in other.joints() {
            self.set(name, value);
        }
    }

    /// Iterate over `(name, position)` pairs
    pub fn joints(&self) -> impl Iterator<Item = (&str, f64)> {
        self.joint_names
            .iter()
            .map(String::as_str)
            .zip(self.positions.iter().copied())
    }

    /// Euclidean distance over the union of both states' joints.
    ///
    /// A joint missing from one side reads as 0 on that side.
    pub fn euclidean_distance(&self, other: &RobotState) -> f64 {
        let mut sum = 0.0;
        for (name, value) in self.joints() {
            let d = value - other.position(name).unwrap_or(0.0);
            sum += d * d;
        }
        for (name, value) in other.joints() {
            if self.position(name).is_none() {
                sum += value * value;
            }
        }
        sum.sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_updates_and_appends() {
        let mut state = RobotState::from_positions([1.0, 2.0]);
        state.set("j1", 5.0);
        state.set("elbow", 0.5);

        assert_eq!(state.len(), 3);
        assert_eq!(state.position("j1"), Some(5.0));
        assert_eq!(state.position("elbow"), Some(0.5));
        assert_eq!(state.position("wrist"), None);
    }

    #[test]
    fn test_new_truncates_to_shorter_list() {
        let state = RobotState::new(vec!["a".into(), "b".into()], vec![1.0]);
        assert_eq!(state.joint_names, vec!["a".to_string()]);
        assert_eq!(state.positions, vec![1.0]);
    }

    #[test]
    fn test_mismatched_lists_do_not_panic() {
        let mut state = RobotState {
            joint_names: vec!["a".into(), "b".into()],
            positions: vec![0.0],
        };
        assert_eq!(state.position("b"), None);

        state.set("b", 2.0);
        assert_eq!(state.joint_names, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(state.positions, vec![0.0, 2.0]);
    }

    #[test]
    fn test_euclidean_distance() {
        let a = RobotState::from_positions([0.0, 0.0]);
        let b = RobotState::from_positions([3.0, 4.0]);
        assert!((a.euclidean_distance(&b) - 5.0).abs() < 1e-12);
        assert!((b.euclidean_distance(&a) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_euclidean_distance_missing_joints_read_as_zero() {
        let a = RobotState::from_positions([3.0]);
        let b = RobotState::new(vec!["j1".into()], vec![4.0]);
        assert!((a.euclidean_distance(&b) - 5.0).abs() < 1e-12);
    }
}
