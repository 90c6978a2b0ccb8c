//! Benchmark Planner
//!
//! Builds the execution plan by resolving a request against the registry.
//!
//! Resolution, per registered backend in name order:
//! - Regex filter on the backend name (CLI `--filter`)
//! - Explicit selection: unselected backends are skipped when the request names any
//! - Capability query: refusing backends are skipped with a warning
//! - Algorithms: all declared ids, or the requested ids that match exactly or
//!   as `group[id]`, kept in request order
//! - Repetitions: selection override or request default, at least 1
//!
//! Requested backends missing from the registry are reported and ignored.

use planbench_core::{BackendRegistry, BenchmarkRequest, MotionRequest, PlannerBackend};

/// One backend with its resolved algorithms
pub struct PlannedBackend<'r> {
    /// Registry name
    pub name: String,
    /// Backend description, the prefix of every entry label
    pub description: String,
    /// The backend itself
    pub backend: &'r dyn PlannerBackend,
    /// Algorithm ids to run, in order
    pub algorithms: Vec<String>,
    /// Repetitions per algorithm
    pub average_count: usize,
}

impl PlannedBackend<'_> {
    /// Repetitions across all algorithms of this backend
    pub fn total_runs(&self) -> usize {
        self.algorithms.len() * self.average_count
    }
}

impl std::fmt::Debug for PlannedBackend<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlannedBackend")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("algorithms", &self.algorithms)
            .field("average_count", &self.average_count)
            .finish()
    }
}

/// Execution plan for a benchmark
#[derive(Debug, Default)]
pub struct ExecutionPlan<'r> {
    /// Backends to run, in registry name order
    pub backends: Vec<PlannedBackend<'r>>,
}

impl ExecutionPlan<'_> {
    /// Whether nothing is left to run
    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    /// Number of `(backend, algorithm)` entries
    pub fn total_planners(&self) -> usize {
        self.backends.iter().map(|b| b.algorithms.len()).sum()
    }

    /// Number of trials across the whole matrix
    pub fn total_runs(&self) -> usize {
        self.backends.iter().map(PlannedBackend::total_runs).sum()
    }
}

/// Build execution plan from the registry
///
/// Never fails; an empty plan means no backend qualified.
pub fn build_plan<'r>(
    registry: &'r BackendRegistry,
    request: &BenchmarkRequest,
    filter: Option<&regex::Regex>,
) -> ExecutionPlan<'r> {
    for selection in &request.planners {
        if !registry.contains(&selection.name) {
            tracing::error!("Planning backend '{}' was not found", selection.name);
        }
    }

    let problem = &request.motion_request;
    let mut backends = Vec::new();

    for (name, backend) in registry.iter() {
        if let Some(re) = filter {
            if !re.is_match(name) {
                tracing::debug!("Skipping backend '{}' (filtered out)", name);
                continue;
            }
        }

        let selection = request.selection_for(name);
        if !request.planners.is_empty() && selection.is_none() {
            continue;
        }

        let capability = backend.can_service(problem);
        if !capability.can_service {
            match capability.detail {
                Some(detail) => tracing::warn!(
                    "Planning backend '{}' is not able to solve the benchmark problem: {}",
                    backend.describe(),
                    detail
                ),
                None => tracing::warn!(
                    "Planning backend '{}' is not able to solve the benchmark problem",
                    backend.describe()
                ),
            }
            continue;
        }

        let declared = backend.algorithms();
        let algorithms = match selection {
            Some(s) if !s.algorithms.is_empty() => {
                match_algorithms(name, problem, &declared, &s.algorithms)
            }
            _ => declared,
        };
        if algorithms.is_empty() {
            tracing::warn!("Planning backend '{}' has no algorithms to run", name);
            continue;
        }

        let average_count = selection
            .and_then(|s| s.average_count)
            .unwrap_or_else(|| request.average_count())
            .max(1);

        backends.push(PlannedBackend {
            name: name.to_string(),
            description: backend.describe(),
            backend,
            algorithms,
            average_count,
        });
    }

    ExecutionPlan { backends }
}

/// Requested ids that the backend declares, in request order
fn match_algorithms(
    backend: &str,
    problem: &MotionRequest,
    declared: &[String],
    requested: &[String],
) -> Vec<String> {
    requested
        .iter()
        .filter(|id| {
            let known = declared
                .iter()
                .any(|d| d == *id || problem.qualified_algorithm(d) == **id);
            if !known {
                tracing::error!(
                    "The algorithm id '{}' is not known to the planning backend '{}'",
                    id,
                    backend
                );
            }
            known
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use planbench_core::{
        BackendError, Capability, PlannerSelection, SolveOutcome, WorldModel,
    };

    struct Fixed {
        algorithms: &'static [&'static str],
        accepts: bool,
    }

    impl PlannerBackend for Fixed {
        fn describe(&self) -> String {
            "fixed".to_string()
        }

        fn algorithms(&self) -> Vec<String> {
            self.algorithms.iter().map(|a| a.to_string()).collect()
        }

        fn can_service(&self, _request: &MotionRequest) -> Capability {
            if self.accepts {
                Capability::supported()
            } else {
                Capability::unsupported("refused")
            }
        }

        fn solve(
            &self,
            _world: &dyn WorldModel,
            _request: &MotionRequest,
            _algorithm: &str,
        ) -> Result<SolveOutcome, BackendError> {
            Ok(SolveOutcome::unsolved())
        }
    }

    fn registry() -> BackendRegistry {
        BackendRegistry::new()
            .with_backend(
                "c",
                Fixed {
                    algorithms: &["x"],
                    accepts: true,
                },
            )
            .with_backend(
                "a",
                Fixed {
                    algorithms: &["alg1", "alg2", "alg3"],
                    accepts: true,
                },
            )
            .with_backend(
                "b",
                Fixed {
                    algorithms: &["y"],
                    accepts: false,
                },
            )
    }

    fn request() -> BenchmarkRequest {
        BenchmarkRequest::new(MotionRequest {
            group_name: "arm".into(),
            ..Default::default()
        })
    }

    fn names(plan: &ExecutionPlan<'_>) -> Vec<String> {
        plan.backends.iter().map(|b| b.name.clone()).collect()
    }

    #[test]
    fn test_no_selection_uses_all_serviceable_backends() {
        let reg = registry();
        let plan = build_plan(&reg, &request(), None);

        // Sorted by name, refusing backend "b" skipped
        assert_eq!(names(&plan), vec!["a", "c"]);
        assert_eq!(plan.backends[0].algorithms, vec!["alg1", "alg2", "alg3"]);
        assert_eq!(plan.total_planners(), 4);
        assert_eq!(plan.total_runs(), 4);
    }

    #[test]
    fn test_explicit_algorithms_keep_request_order() {
        let reg = registry();
        let req = request().with_planner(
            PlannerSelection::new("a")
                .with_algorithms(["alg2", "arm[alg1]", "nope"])
                .with_average_count(3),
        );

        let plan = build_plan(&reg, &req, None);

        assert_eq!(names(&plan), vec!["a"]);
        assert_eq!(plan.backends[0].algorithms, vec!["alg2", "arm[alg1]"]);
        assert_eq!(plan.backends[0].average_count, 3);
        assert_eq!(plan.total_runs(), 6);
    }

    #[test]
    fn test_qualified_id_needs_matching_group() {
        let reg = registry();
        let req = request().with_planner(PlannerSelection::new("a").with_algorithms(["leg[alg1]"]));

        let plan = build_plan(&reg, &req, None);
        assert!(plan.is_empty());
    }

    #[test]
    fn test_unknown_backend_is_ignored() {
        let reg = registry();
        let req = request()
            .with_planner(PlannerSelection::new("missing"))
            .with_planner(PlannerSelection::new("c"));

        let plan = build_plan(&reg, &req, None);
        assert_eq!(names(&plan), vec!["c"]);
    }

    #[test]
    fn test_only_unknown_backend_gives_empty_plan() {
        let reg = registry();
        let req = request().with_planner(PlannerSelection::new("B"));

        assert!(build_plan(&reg, &req, None).is_empty());
    }

    #[test]
    fn test_refusing_backend_is_skipped_even_when_selected() {
        let reg = registry();
        let req = request().with_planner(PlannerSelection::new("b"));

        assert!(build_plan(&reg, &req, None).is_empty());
    }

    #[test]
    fn test_average_count_at_least_one() {
        let reg = registry();
        let req = request()
            .with_default_average_count(0)
            .with_planner(PlannerSelection::new("a").with_average_count(0))
            .with_planner(PlannerSelection::new("c"));

        let plan = build_plan(&reg, &req, None);
        assert!(plan.backends.iter().all(|b| b.average_count == 1));
    }

    #[test]
    fn test_default_average_count_applies() {
        let reg = registry();
        let req = request().with_default_average_count(5);

        let plan = build_plan(&reg, &req, None);
        assert!(plan.backends.iter().all(|b| b.average_count == 5));
        assert_eq!(plan.total_runs(), 20);
    }

    #[test]
    fn test_regex_filter() {
        let reg = registry();
        let re = regex::Regex::new("^c").unwrap();

        let plan = build_plan(&reg, &request(), Some(&re));
        assert_eq!(names(&plan), vec!["c"]);
    }
}
