//! Benchmark Requests

use crate::state::RobotState;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Problem handed to every backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MotionRequest {
    /// Planning group, also used for qualified algorithm ids (`group[id]`)
    #[serde(default)]
    pub group_name: String,
    /// Start configuration
    #[serde(default)]
    pub start_state: RobotState,
    /// Goal configuration
    #[serde(default)]
    pub goal_state: RobotState,
    /// Time budget per attempt, in seconds. Enforcement is up to the backend.
    #[serde(default = "default_allowed_planning_time")]
    pub allowed_planning_time: f64,
    /// Backend-specific parameters
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
}

fn default_allowed_planning_time() -> f64 {
    5.0
}

impl MotionRequest {
    /// Qualified form of an algorithm id for this request's group
    pub fn qualified_algorithm(&self, algorithm: &str) -> String {
        format!("{}[{}]", self.group_name, algorithm)
    }
}

/// Explicit choice of one backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlannerSelection {
    /// Registry name of the backend
    pub name: String,
    /// Algorithms to run; empty means all the backend declares
    #[serde(default)]
    pub algorithms: Vec<String>,
    /// Repetitions per algorithm, overriding the request default
    #[serde(default)]
    pub average_count: Option<usize>,
}

impl PlannerSelection {
    /// Select a backend with all of its algorithms
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            algorithms: Vec::new(),
            average_count: None,
        }
    }

    /// Restrict to the given algorithms
    pub fn with_algorithms<I, S>(mut self, algorithms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.algorithms = algorithms.into_iter().map(Into::into).collect();
        self
    }

    /// Override the repetition count
    pub fn with_average_count(mut self, count: usize) -> Self {
        self.average_count = Some(count);
        self
    }
}

/// A complete benchmark request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRequest {
    /// The problem every backend attempts
    pub motion_request: MotionRequest,
    /// Backends to test; empty means every registered backend
    #[serde(default)]
    pub planners: Vec<PlannerSelection>,
    /// Repetitions per algorithm when a selection does not override it;
    /// `None` defers to the harness configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_average_count: Option<usize>,
    /// Report filename; empty means a generated one
    #[serde(default)]
    pub filename: String,
}

/// Repetitions used when neither the request nor the configuration sets any
pub const DEFAULT_AVERAGE_COUNT: usize = 1;

impl BenchmarkRequest {
    /// Request benchmarking every registered backend on `motion_request`
    pub fn new(motion_request: MotionRequest) -> Self {
        Self {
            motion_request,
            planners: Vec::new(),
            default_average_count: None,
            filename: String::new(),
        }
    }

    /// Add an explicit backend selection
    pub fn with_planner(mut self, selection: PlannerSelection) -> Self {
        self.planners.push(selection);
        self
    }

    /// Set the default repetition count
    pub fn with_default_average_count(mut self, count: usize) -> Self {
        self.default_average_count = Some(count);
        self
    }

    /// Effective default repetition count, never below 1
    pub fn average_count(&self) -> usize {
        self.default_average_count
            .unwrap_or(DEFAULT_AVERAGE_COUNT)
            .max(1)
    }

    /// Set the report filename
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    /// First selection naming `backend`
    pub fn selection_for(&self, backend: &str) -> Option<&PlannerSelection> {
        self.planners.iter().find(|s| s.name == backend)
    }
}
