#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Repeated-run experiment driver.
//!
//! An experiment executes R independent runs of one heuristic on one
//! formula. Run `i` gets its own RNG seeded with `base_seed + i`, so every
//! run is reproducible in isolation and the whole experiment is reproducible
//! from the base seed. Runs are sequential; they share no state beyond the
//! immutable formula.

use crate::maxsat::formula::Formula;
use crate::maxsat::search::{SearchKind, SearchOutcome, SearchParams, run_search};
use std::time::{Duration, Instant};

/// Configuration of one experiment.
#[derive(Debug, Clone)]
pub struct ExperimentConfig {
    /// The heuristic to run.
    pub kind: SearchKind,
    /// Number of independent runs.
    pub runs: usize,
    /// Seed of run 0; run `i` uses `base_seed + i`.
    pub base_seed: u64,
    /// Heuristic parameters shared by all runs.
    pub params: SearchParams,
    /// Print one progress line per run.
    pub verbose: bool,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            kind: SearchKind::Multistart,
            runs: 30,
            base_seed: 0,
            params: SearchParams::default(),
            verbose: true,
        }
    }
}

/// Result of a single run.
#[derive(Debug, Clone)]
pub struct RunRecord {
    /// Best satisfied-clause count the run reached.
    pub fitness: usize,
    /// Fitness evaluations the run consumed.
    pub evaluations: usize,
    /// Wall time of the run.
    pub time: Duration,
    /// Whether the run satisfied every clause.
    pub fully_satisfied: bool,
}

/// Aggregate statistics over all runs of one experiment.
#[derive(Debug, Clone)]
pub struct ExperimentSummary {
    /// Per-run records, in run order.
    pub records: Vec<RunRecord>,
    /// The best outcome over all runs.
    pub best: SearchOutcome,
}

impl ExperimentSummary {
    /// Mean wall time per run, in seconds.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn avg_time_secs(&self) -> f64 {
        let total: f64 = self.records.iter().map(|r| r.time.as_secs_f64()).sum();
        total / self.records.len() as f64
    }

    /// Mean best fitness per run.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn avg_fitness(&self) -> f64 {
        let total: usize = self.records.iter().map(|r| r.fitness).sum();
        total as f64 / self.records.len() as f64
    }

    /// Maximum fitness over all runs.
    #[must_use]
    pub fn max_fitness(&self) -> usize {
        self.records.iter().map(|r| r.fitness).max().unwrap_or(0)
    }

    /// Mean evaluation count per run.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn avg_evaluations(&self) -> f64 {
        let total: usize = self.records.iter().map(|r| r.evaluations).sum();
        total as f64 / self.records.len() as f64
    }

    /// Number of runs that satisfied every clause.
    #[must_use]
    pub fn satisfied_runs(&self) -> usize {
        self.records.iter().filter(|r| r.fully_satisfied).count()
    }
}

/// Runs the configured experiment on `formula`.
///
/// # Panics
///
/// Panics if `config.runs` is zero.
#[must_use]
pub fn run_experiment(formula: &Formula, config: &ExperimentConfig) -> ExperimentSummary {
    assert!(config.runs > 0, "an experiment needs at least one run");

    let mut records = Vec::with_capacity(config.runs);
    let mut best: Option<SearchOutcome> = None;

    for run in 0..config.runs {
        let mut rng = fastrand::Rng::with_seed(config.base_seed + run as u64);
        let start = Instant::now();
        let outcome = run_search(config.kind, formula.clone(), config.params.clone(), &mut rng);
        let time = start.elapsed();

        if config.verbose {
            println!(
                "Run {}: {}/{} clauses, {} evaluations, {:.4}s",
                run + 1,
                outcome.best_fitness,
                formula.max_fitness(),
                outcome.evaluations,
                time.as_secs_f64()
            );
        }

        records.push(RunRecord {
            fitness: outcome.best_fitness,
            evaluations: outcome.evaluations,
            time,
            fully_satisfied: outcome.fully_satisfied,
        });

        if best
            .as_ref()
            .is_none_or(|b| outcome.best_fitness > b.best_fitness)
        {
            best = Some(outcome);
        }
    }

    // `runs > 0` was asserted above, so a best outcome always exists.
    let best = best.unwrap_or_else(|| unreachable!());
    ExperimentSummary { records, best }
}
