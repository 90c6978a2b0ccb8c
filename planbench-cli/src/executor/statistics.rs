//! Statistics Computation
//!
//! Parallel computation of per-entry summaries for the terminal output and
//! JSON reports.
//!
//! Uses Rayon to parallelize across entries. Trials themselves always run
//! sequentially; only the finished records are summarized here.

use planbench_metrics::{EntryStatistics, summarize};
use planbench_report::BenchmarkReport;
use rayon::prelude::*;

/// Compute statistics for every report entry, in entry order
pub fn compute_statistics(report: &BenchmarkReport) -> Vec<EntryStatistics> {
    report
        .entries
        .par_iter()
        .map(|entry| summarize(&entry.runs))
        .collect()
}
