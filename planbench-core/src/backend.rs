//! Planning Backend Contract
//!
//! Every planning backend, whatever algorithm family it implements, is
//! driven through [`PlannerBackend`]. A normal "no solution found" is an
//! `Ok` outcome with `solved == false`; `Err` is reserved for faults.

use crate::request::MotionRequest;
use crate::trajectory::DetailedResult;
use crate::world::WorldModel;
use thiserror::Error;

/// Unexpected backend failure during a solve
#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend rejected the request at solve time
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The algorithm id is not one the backend can run
    #[error("unknown algorithm '{0}'")]
    UnknownAlgorithm(String),

    /// Internal failure inside the backend
    #[error("backend failure: {0}")]
    Internal(String),

    /// The backend panicked
    #[error("backend panicked: {0}")]
    Panicked(String),
}

/// Answer to a "can you solve this" query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capability {
    /// Whether the backend accepts the request
    pub can_service: bool,
    /// Free-form reason, mostly useful when refusing
    pub detail: Option<String>,
}

impl Capability {
    /// Accept the request
    pub fn supported() -> Self {
        Self {
            can_service: true,
            detail: None,
        }
    }

    /// Refuse the request
    pub fn unsupported(detail: impl Into<String>) -> Self {
        Self {
            can_service: false,
            detail: Some(detail.into()),
        }
    }
}

/// Normal outcome of one planning attempt
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolveOutcome {
    /// Whether a solution was found
    pub solved: bool,
    /// Trajectories produced (may be empty when unsolved)
    pub result: DetailedResult,
}

impl SolveOutcome {
    /// A solved attempt
    pub fn solved(result: DetailedResult) -> Self {
        Self {
            solved: true,
            result,
        }
    }

    /// An attempt that found no solution
    pub fn unsolved() -> Self {
        Self::default()
    }
}

/// A loaded planning backend
pub trait PlannerBackend {
    /// Human-readable identifier, used in report entry labels
    fn describe(&self) -> String;

    /// Algorithm ids the backend declares, in its preferred order
    fn algorithms(&self) -> Vec<String>;

    /// Whether the backend can attempt `request`
    fn can_service(&self, request: &MotionRequest) -> Capability;

    /// Attempt `request` with the given algorithm
    fn solve(
        &self,
        world: &dyn WorldModel,
        request: &MotionRequest,
        algorithm: &str,
    ) -> Result<SolveOutcome, BackendError>;
}
