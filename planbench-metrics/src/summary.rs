//! Entry Summaries
//!
//! Aggregates the trial records of one `(backend, algorithm)` entry for the
//! terminal summary and the JSON report. The raw per-run values in the log
//! report are the primary output; these are conveniences on top.
//!
//! - Solve rate over all runs
//! - Timing distribution (mean, median, stddev, min, max) of `total_time`
//! - Mean of every `REAL` metric over the runs that recorded it

use crate::collector::{SOLVED, TOTAL_TIME};
use crate::record::{MetricKind, TrialRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Distribution of one real-valued metric
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    /// Number of values
    pub count: usize,
    /// Arithmetic mean
    pub mean: f64,
    /// Median (linear interpolation)
    pub median: f64,
    /// Sample standard deviation
    pub std_dev: f64,
    /// Smallest value
    pub min: f64,
    /// Largest value
    pub max: f64,
}

impl Distribution {
    /// Summarize `values`; all fields are 0 for an empty slice
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let n = sorted.len();
        let mean = sorted.iter().sum::<f64>() / n as f64;
        let std_dev = if n < 2 {
            0.0
        } else {
            let variance = sorted.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
            variance.sqrt()
        };

        Self {
            count: n,
            mean,
            median: interpolated_median(&sorted),
            std_dev,
            min: sorted[0],
            max: sorted[n - 1],
        }
    }
}

fn interpolated_median(sorted: &[f64]) -> f64 {
    let rank = 0.5 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = (lower + 1).min(sorted.len() - 1);
    let fraction = rank - lower as f64;
    sorted[lower] + fraction * (sorted[upper] - sorted[lower])
}

/// Summary of every run of one entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryStatistics {
    /// Number of runs
    pub run_count: usize,
    /// Runs that reported a solution
    pub solved_count: usize,
    /// Distribution of `total_time`, seconds
    pub total_time: Distribution,
    /// Mean of each real metric over the runs that recorded it
    pub means: BTreeMap<String, f64>,
}

impl EntryStatistics {
    /// Fraction of runs that solved the problem (0 with no runs)
    pub fn solve_rate(&self) -> f64 {
        if self.run_count == 0 {
            0.0
        } else {
            self.solved_count as f64 / self.run_count as f64
        }
    }
}

/// Summarize the runs of one entry
pub fn summarize(runs: &[TrialRecord]) -> EntryStatistics {
    let solved_count = runs
        .iter()
        .filter(|r| r.boolean(SOLVED).unwrap_or(false))
        .count();

    let times: Vec<f64> = runs.iter().filter_map(|r| r.real(TOTAL_TIME)).collect();

    let mut sums: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for run in runs {
        for (key, value) in run.iter() {
            if key.kind() != MetricKind::Real {
                continue;
            }
            let Ok(v) = value.parse::<f64>() else {
                continue;
            };
            let slot = sums.entry(key.name().to_string()).or_default();
            slot.0 += v;
            slot.1 += 1;
        }
    }

    EntryStatistics {
        run_count: runs.len(),
        solved_count,
        total_time: Distribution::from_values(&times),
        means: sums
            .into_iter()
            .map(|(name, (sum, count))| (name, sum / count as f64))
            .collect(),
    }
}
