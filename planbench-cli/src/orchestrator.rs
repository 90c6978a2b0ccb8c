//! Benchmark Orchestration
//!
//! Resolves a request into an execution plan, runs the full
//! `(backend, algorithm, repetition)` matrix sequentially and assembles the
//! report. Only two conditions fail a benchmark: an empty plan and a report
//! that cannot be written. Everything else is logged and absorbed.

use crate::executor::{
    TrialFailure, TrialRunner, compute_statistics, entry_label, start_report,
};
use crate::planner::{ExecutionPlan, build_plan};
use indicatif::{ProgressBar, ProgressStyle};
use planbench_core::{BackendRegistry, BenchmarkRequest, DetailedResult, WorldModel};
use planbench_report::{BenchmarkReport, ReportError, ReportWriter};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Instant;
use thiserror::Error;

/// Benchmark-level failure
#[derive(Debug, Error)]
pub enum BenchmarkError {
    /// No backend qualified for the request
    #[error("there are no planning backends to benchmark")]
    NoPlanners,

    /// The report could not be written
    #[error(transparent)]
    Report(#[from] ReportError),
}

/// Everything a completed benchmark produced
#[derive(Debug)]
pub struct BenchmarkOutcome {
    /// The report, entries in execution order
    pub report: BenchmarkReport,
    /// First solved result per backend name
    pub first_success: BTreeMap<String, DetailedResult>,
    /// Backend faults, in execution order
    pub failures: Vec<TrialFailure>,
}

/// Result status of the "run benchmark" operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResponseStatus {
    /// Report written
    Success,
    /// No report produced
    Failure {
        /// Why the benchmark failed
        message: String,
    },
}

/// Response of the "run benchmark" operation
#[derive(Debug, Serialize)]
pub struct BenchmarkResponse {
    /// Overall status
    #[serde(flatten)]
    pub status: ResponseStatus,
    /// Report file, present on success
    pub report_path: Option<PathBuf>,
    /// First solved result per backend name
    pub first_success: BTreeMap<String, DetailedResult>,
    /// Backend faults, in execution order
    pub failures: Vec<TrialFailure>,
}

impl BenchmarkResponse {
    /// Whether the report was written
    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }

    fn failure(error: &BenchmarkError) -> Self {
        Self {
            status: ResponseStatus::Failure {
                message: error.to_string(),
            },
            report_path: None,
            first_success: BTreeMap::new(),
            failures: Vec::new(),
        }
    }
}

/// Drives benchmarks over a registry of backends and one world model
pub struct BenchmarkOrchestrator<'a> {
    registry: &'a BackendRegistry,
    world: &'a dyn WorldModel,
    filter: Option<Regex>,
    progress: bool,
}

impl<'a> BenchmarkOrchestrator<'a> {
    /// Create an orchestrator with progress reporting enabled
    pub fn new(registry: &'a BackendRegistry, world: &'a dyn WorldModel) -> Self {
        Self {
            registry,
            world,
            filter: None,
            progress: true,
        }
    }

    /// Only consider backends whose name matches `filter`
    pub fn with_filter(mut self, filter: Option<Regex>) -> Self {
        self.filter = filter;
        self
    }

    /// Enable or disable the progress bar
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// Resolve `request` without running anything
    pub fn plan(&self, request: &BenchmarkRequest) -> ExecutionPlan<'a> {
        build_plan(self.registry, request, self.filter.as_ref())
    }

    /// Run the benchmark matrix and build the report
    pub fn execute(&self, request: &BenchmarkRequest) -> Result<BenchmarkOutcome, BenchmarkError> {
        self.execute_plan(self.plan(request), request)
    }

    /// Run an already resolved plan. Backends are not queried again.
    pub fn execute_plan(
        &self,
        plan: ExecutionPlan<'_>,
        request: &BenchmarkRequest,
    ) -> Result<BenchmarkOutcome, BenchmarkError> {
        if plan.is_empty() {
            tracing::error!("There are no planning backends to benchmark");
            return Err(BenchmarkError::NoPlanners);
        }
        log_plan(&plan);

        let problem = &request.motion_request;
        let mut builder = start_report(self.world.name(), problem);
        let mut first_success = BTreeMap::new();
        let mut failures = Vec::new();

        let pb = self.progress_bar(plan.total_runs());
        let runner = TrialRunner::new(self.world).with_progress(pb.clone());
        let start = Instant::now();

        for planned in &plan.backends {
            for algorithm in &planned.algorithms {
                let label = entry_label(&planned.description, algorithm);
                pb.set_message(label.clone());

                let run = runner.run(
                    &planned.name,
                    planned.backend,
                    algorithm,
                    problem,
                    planned.average_count,
                );

                if let Some(result) = run.first_success {
                    first_success.entry(planned.name.clone()).or_insert(result);
                }
                if let Some(failure) = run.failure {
                    failures.push(failure);
                }
                // A fault on the first run still leaves a `0 runs` block and
                // counts towards the planner total.
                builder.push_entry(label, run.records);
            }
        }

        let duration = start.elapsed().as_secs_f64();
        pb.finish_with_message("Complete");
        tracing::info!(
            "Benchmark completed: {} planners, {} runs in {:.3}s",
            builder.entry_count(),
            plan.total_runs(),
            duration
        );

        Ok(BenchmarkOutcome {
            report: builder.finish(duration),
            first_success,
            failures,
        })
    }

    /// Run the benchmark and write its report; the "run benchmark" operation
    pub fn run_and_write(
        &self,
        request: &BenchmarkRequest,
        writer: &ReportWriter,
    ) -> BenchmarkResponse {
        let outcome = match self.execute(request) {
            Ok(outcome) => outcome,
            Err(e) => return BenchmarkResponse::failure(&e),
        };

        match write_outcome(&outcome, request, writer) {
            Ok(path) => BenchmarkResponse {
                status: ResponseStatus::Success,
                report_path: Some(path),
                first_success: outcome.first_success,
                failures: outcome.failures,
            },
            Err(e) => BenchmarkResponse {
                failures: outcome.failures,
                ..BenchmarkResponse::failure(&e)
            },
        }
    }

    fn progress_bar(&self, total: usize) -> ProgressBar {
        if !self.progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(total as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb
    }
}

/// Write the report of `outcome` where `request` asks for it
pub fn write_outcome(
    outcome: &BenchmarkOutcome,
    request: &BenchmarkRequest,
    writer: &ReportWriter,
) -> Result<PathBuf, BenchmarkError> {
    let statistics = compute_statistics(&outcome.report);
    let path = writer.write(&outcome.report, Some(request.filename.as_str()), &statistics)?;
    Ok(path)
}

fn log_plan(plan: &ExecutionPlan<'_>) {
    let mut listing = String::new();
    for planned in &plan.backends {
        listing.push_str(&format!(
            "  * {} [ {} ] x{}\n",
            planned.description,
            planned.algorithms.join(" "),
            planned.average_count
        ));
    }
    tracing::info!("Benchmarking planning backends:\n{}", listing.trim_end());
}
