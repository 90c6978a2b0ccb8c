//! Output Formatting
//!
//! Human-readable output formatting for benchmark reports.
//!
//! Generates terminal-friendly output with:
//! - One line per entry with a status icon (✓ all solved, ~ some, ✗ none)
//! - Solve rate and `total_time` distribution
//! - Mean path length of the first segment when available
//! - Backend faults

use super::execution::TrialFailure;
use planbench_metrics::EntryStatistics;
use planbench_report::BenchmarkReport;

/// Format a report for human-readable terminal display
///
/// `statistics` is parallel with `report.entries`.
pub fn format_human_output(
    report: &BenchmarkReport,
    statistics: &[EntryStatistics],
    failures: &[TrialFailure],
) -> String {
    let meta = &report.meta;
    let mut output = String::new();

    output.push('\n');
    output.push_str("PlanBench Results\n");
    output.push_str(&"=".repeat(60));
    output.push('\n');
    output.push_str(&format!(
        "  Experiment: {}  Host: {}\n",
        meta.experiment_label(),
        meta.host_label()
    ));
    output.push_str(&format!("  Started: {}\n\n", meta.started_at_label()));

    for (entry, stats) in report.entries.iter().zip(statistics) {
        let icon = if stats.run_count > 0 && stats.solved_count == stats.run_count {
            "✓"
        } else if stats.solved_count > 0 {
            "~"
        } else {
            "✗"
        };

        output.push_str(&format!("  {} {}\n", icon, entry.label));
        output.push_str(&format!(
            "      solved: {}/{} ({:.1}%)\n",
            stats.solved_count,
            stats.run_count,
            stats.solve_rate() * 100.0
        ));
        let t = &stats.total_time;
        if t.count > 0 {
            output.push_str(&format!(
                "      time: mean {:.4} s  median {:.4} s  stddev {:.4} s\n",
                t.mean, t.median, t.std_dev
            ));
            output.push_str(&format!(
                "      min: {:.4} s  max: {:.4} s\n",
                t.min, t.max
            ));
        }

        let lengths: Vec<_> = stats
            .means
            .iter()
            .filter(|(name, _)| name.starts_with("path_") && name.ends_with("_length"))
            .collect();
        if let Some((name, value)) = lengths.first() {
            output.push_str(&format!("      {}: {:.4}\n", name, value));
        }
        output.push('\n');
    }

    if !failures.is_empty() {
        output.push_str("Failures\n");
        output.push_str(&"-".repeat(60));
        output.push('\n');
        for failure in failures {
            output.push_str(&format!("  💥 {}\n", failure));
        }
        output.push('\n');
    }

    // Summary
    let total_runs: usize = statistics.iter().map(|s| s.run_count).sum();
    let solved: usize = statistics.iter().map(|s| s.solved_count).sum();
    output.push_str("Summary\n");
    output.push_str(&"-".repeat(60));
    output.push('\n');
    output.push_str(&format!(
        "  Planners: {}  Runs: {}  Solved: {}  Faults: {}\n",
        meta.planner_count,
        total_runs,
        solved,
        failures.len()
    ));
    output.push_str(&format!("  Duration: {:.2} s\n", meta.duration_secs));

    output
}
