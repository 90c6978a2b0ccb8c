#![warn(missing_docs)]
//! PlanBench CLI Library
//!
//! This module provides orchestration and the CLI harness for benchmark binaries.
//! The environment loads its planning backends into a [`BackendRegistry`],
//! supplies a world model and a default request, and calls [`run`].
//!
//! # Example
//!
//! ```ignore
//! use planbench::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let world = SphereWorld::new("scene", RobotState::from_positions([0.0, 0.0]));
//!     let registry = BackendRegistry::new().with_backend("straight", StraightLine);
//!     let request = BenchmarkRequest::new(MotionRequest::default());
//!     planbench_cli::run(&registry, &world, request)
//! }
//! ```

mod config;
mod executor;
mod orchestrator;
mod planner;

pub use config::*;
pub use executor::{
    EntryRun, PROBLEM_PAYLOAD_TAG, TrialFailure, TrialRunner, compute_statistics,
    format_human_output, hostname,
};
pub use orchestrator::{
    BenchmarkError, BenchmarkOrchestrator, BenchmarkOutcome, BenchmarkResponse, ResponseStatus,
    write_outcome,
};
pub use planner::{ExecutionPlan, PlannedBackend, build_plan};

use clap::{Parser, Subcommand};
use planbench_core::{BackendRegistry, BenchmarkRequest, WorldModel};
use planbench_report::{OutputFormat, ReportWriter};
use rayon::ThreadPoolBuilder;
use regex::Regex;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// PlanBench CLI arguments
#[derive(Parser, Debug)]
#[command(name = "planbench")]
#[command(author, version, about = "PlanBench - motion planning benchmark harness")]
pub struct Cli {
    /// Optional subcommand (List, Run); defaults to Run
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Benchmark request file (JSON); the binary's built-in request if omitted
    #[arg(short, long)]
    pub request: Option<PathBuf>,

    /// Filter backends by regex pattern on their registry name
    #[arg(long)]
    pub filter: Option<String>,

    /// Report format: log, json
    #[arg(long)]
    pub format: Option<String>,

    /// Output directory for the report
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Report file name (generated if not specified)
    #[arg(long)]
    pub filename: Option<String>,

    /// Repetitions per algorithm
    #[arg(long, short = 'n')]
    pub average_count: Option<usize>,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Number of threads for parallel statistics computation
    /// 0 = use all available cores (default), 1 = single-threaded
    #[arg(long, short = 'j', default_value = "0")]
    pub threads: usize,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List registered backends and their algorithms
    List,
    /// Run the benchmark (default)
    Run,
}

/// Run the PlanBench CLI with the given registry, world and default request.
/// This is the main entry point for benchmark binaries.
///
/// # Returns
/// Returns `Ok(())` on success, or an error if no backend qualified or the
/// report could not be written.
pub fn run(
    registry: &BackendRegistry,
    world: &dyn WorldModel,
    request: BenchmarkRequest,
) -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli, registry, world, request)
}

/// Run the PlanBench CLI with pre-parsed arguments.
pub fn run_with_cli(
    cli: Cli,
    registry: &BackendRegistry,
    world: &dyn WorldModel,
    request: BenchmarkRequest,
) -> anyhow::Result<()> {
    init_logging(cli.verbose);

    // Discover planbench.toml configuration (CLI flags override)
    let config = PlanBenchConfig::discover().unwrap_or_default();

    match cli.command {
        Some(Commands::List) => {
            list_backends(registry);
            Ok(())
        }
        Some(Commands::Run) | None => run_benchmark(&cli, &config, registry, world, request),
    }
}

/// Initialize tracing; `RUST_LOG` wins over `--verbose`
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // A subscriber may already be installed by the host binary
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn list_backends(registry: &BackendRegistry) {
    println!("PlanBench Backends:");

    let backends = registry.describe_all();
    for info in &backends {
        println!("├── {}", info.name);
        for algorithm in &info.algorithms {
            println!("│   ├── {}", algorithm);
        }
    }

    println!("{} backends found.", backends.len());
}

/// Layer the request: request file or built-in → planbench.toml → CLI flags
fn resolve_request(
    cli: &Cli,
    config: &PlanBenchConfig,
    default_request: BenchmarkRequest,
) -> anyhow::Result<BenchmarkRequest> {
    let mut request = match &cli.request {
        Some(path) => {
            let content = std::fs::read_to_string(path)?;
            serde_json::from_str(&content)
                .map_err(|e| anyhow::anyhow!("Invalid request {}: {}", path.display(), e))?
        }
        None => default_request,
    };

    // CLI > request > planbench.toml
    request.default_average_count = cli
        .average_count
        .or(request.default_average_count)
        .or(Some(config.runner.default_average_count));

    if let Some(name) = &cli.filename {
        request.filename = name.clone();
    }

    Ok(request)
}

fn build_writer(cli: &Cli, config: &PlanBenchConfig) -> anyhow::Result<ReportWriter> {
    let format: OutputFormat = cli
        .format
        .as_deref()
        .unwrap_or(config.output.format.as_str())
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;
    let directory = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.output.directory));
    Ok(ReportWriter::new(directory).with_format(format))
}

fn run_benchmark(
    cli: &Cli,
    config: &PlanBenchConfig,
    registry: &BackendRegistry,
    world: &dyn WorldModel,
    default_request: BenchmarkRequest,
) -> anyhow::Result<()> {
    // Configure Rayon thread pool for statistics computation
    if cli.threads > 0 {
        ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .ok();
    }

    let request = resolve_request(cli, config, default_request)?;
    let writer = build_writer(cli, config)?;
    let filter = cli
        .filter
        .as_deref()
        .map(Regex::new)
        .transpose()
        .map_err(|e| anyhow::anyhow!("Invalid filter: {}", e))?;

    let progress = config.runner.progress && !cli.no_progress;
    let orchestrator = BenchmarkOrchestrator::new(registry, world)
        .with_filter(filter)
        .with_progress(progress);

    let plan = orchestrator.plan(&request);
    println!(
        "Running {} planners, {} runs...\n",
        plan.total_planners(),
        plan.total_runs()
    );

    let outcome = orchestrator.execute_plan(plan, &request)?;
    let statistics = compute_statistics(&outcome.report);
    let path = writer.write(&outcome.report, Some(request.filename.as_str()), &statistics)?;

    print!(
        "{}",
        format_human_output(&outcome.report, &statistics, &outcome.failures)
    );
    println!("\nReport written to: {}", path.display());

    if !outcome.failures.is_empty() {
        eprintln!(
            "\n{} backend fault(s) during execution",
            outcome.failures.len()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use planbench_core::{
        BackendError, Capability, MotionRequest, PlannerBackend, PlannerSelection, RobotState,
        SolveOutcome, SphereWorld,
    };
    use std::cell::Cell;
    use std::rc::Rc;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["planbench"];
        argv.extend_from_slice(args);
        Cli::parse_from(argv)
    }

    #[test]
    fn test_parse_defaults() {
        let cli = cli(&[]);
        assert!(cli.command.is_none());
        assert!(cli.request.is_none());
        assert!(!cli.no_progress);
        assert_eq!(cli.threads, 0);
    }

    #[test]
    fn test_parse_list() {
        let cli = cli(&["list"]);
        assert!(matches!(cli.command, Some(Commands::List)));
    }

    #[test]
    fn test_cli_average_count_wins() {
        let mut config = PlanBenchConfig::default();
        config.runner.default_average_count = 7;
        let request = BenchmarkRequest::new(MotionRequest::default());

        let resolved = resolve_request(&cli(&["-n", "3"]), &config, request.clone()).unwrap();
        assert_eq!(resolved.default_average_count, Some(3));

        let resolved = resolve_request(&cli(&[]), &config, request).unwrap();
        assert_eq!(resolved.default_average_count, Some(7));
    }

    #[test]
    fn test_request_value_beats_config() {
        let mut config = PlanBenchConfig::default();
        config.runner.default_average_count = 7;
        let request =
            BenchmarkRequest::new(MotionRequest::default()).with_default_average_count(4);

        let resolved = resolve_request(&cli(&[]), &config, request).unwrap();
        assert_eq!(resolved.default_average_count, Some(4));
    }

    #[test]
    fn test_explicit_request_count_of_one_beats_config() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("request.json");
        std::fs::write(
            &path,
            r#"{"motion_request":{},"default_average_count":1}"#,
        )
        .unwrap();
        let mut config = PlanBenchConfig::default();
        config.runner.default_average_count = 5;

        let resolved = resolve_request(
            &cli(&["--request", path.to_str().unwrap()]),
            &config,
            BenchmarkRequest::new(MotionRequest::default()),
        )
        .unwrap();

        assert_eq!(resolved.default_average_count, Some(1));
        assert_eq!(resolved.average_count(), 1);
    }

    #[test]
    fn test_request_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("request.json");
        let request = BenchmarkRequest::new(MotionRequest::default())
            .with_planner(PlannerSelection::new("a").with_algorithms(["rrt"]));
        std::fs::write(&path, serde_json::to_string(&request).unwrap()).unwrap();

        let resolved = resolve_request(
            &cli(&["--request", path.to_str().unwrap(), "--filename", "x.log"]),
            &PlanBenchConfig::default(),
            BenchmarkRequest::new(MotionRequest::default()),
        )
        .unwrap();

        assert_eq!(resolved.planners, request.planners);
        assert_eq!(resolved.filename, "x.log");
    }

    struct Counting {
        queries: Rc<Cell<usize>>,
    }

    impl PlannerBackend for Counting {
        fn describe(&self) -> String {
            "counting".to_string()
        }

        fn algorithms(&self) -> Vec<String> {
            vec!["only".to_string()]
        }

        fn can_service(&self, _request: &MotionRequest) -> Capability {
            self.queries.set(self.queries.get() + 1);
            Capability::supported()
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

    #[test]
    fn test_run_queries_each_backend_once() {
        let dir = tempfile::TempDir::new().unwrap();
        let queries = Rc::new(Cell::new(0));
        let registry = BackendRegistry::new().with_backend(
            "counting",
            Counting {
                queries: Rc::clone(&queries),
            },
        );
        let world = SphereWorld::new("count", RobotState::from_positions([0.0]));
        let args = cli(&["--no-progress", "-o", dir.path().to_str().unwrap()]);

        run_with_cli(
            args,
            &registry,
            &world,
            BenchmarkRequest::new(MotionRequest::default()),
        )
        .unwrap();

        assert_eq!(queries.get(), 1);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_build_writer_format() {
        let writer = build_writer(
            &cli(&["--format", "json", "-o", "reports"]),
            &PlanBenchConfig::default(),
        )
        .unwrap();
        assert_eq!(writer.format(), OutputFormat::Json);
        assert_eq!(writer.directory(), std::path::Path::new("reports"));

        assert!(build_writer(&cli(&["--format", "html"]), &PlanBenchConfig::default()).is_err());
    }
}
