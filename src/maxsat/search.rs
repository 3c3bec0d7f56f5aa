#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The common surface shared by every search heuristic.
//!
//! All heuristics follow the same driver shape: draw or receive an initial
//! assignment, evaluate it, scan candidates, accept per the variant's policy,
//! and restart or stop once the evaluation budget is exhausted, the move
//! stagnation limit is hit, or a fully satisfying assignment is found.
//! Variants differ only in their acceptance and restart policies.
//!
//! Randomness is never ambient: every heuristic receives an explicit
//! `fastrand::Rng`, so a run is fully determined by its seed.

use crate::maxsat::assignment::Assignment;
use crate::maxsat::brute_force::BruteForce;
use crate::maxsat::formula::Formula;
use crate::maxsat::genetic::Genetic;
use crate::maxsat::multistart::Multistart;
use crate::maxsat::next_ascent::NextAscent;
use crate::maxsat::tabu::Tabu;
use crate::maxsat::variable_depth::VariableDepth;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A MAXSAT search heuristic.
pub trait Search {
    /// Creates the heuristic for one formula with the given parameters.
    fn new(formula: Formula, params: SearchParams) -> Self;

    /// Runs the search to completion and returns the best result found.
    fn run(&mut self, rng: &mut fastrand::Rng) -> SearchOutcome;
}

/// Tunable knobs shared across heuristics; each variant reads the subset it
/// cares about.
#[derive(Debug, Clone)]
pub struct SearchParams {
    /// Global fitness-evaluation budget per run.
    pub max_evaluations: usize,
    /// Consecutive non-improving moves tolerated before stopping (tabu).
    pub max_stagnation: usize,
    /// Population size (genetic).
    pub population_size: usize,
    /// Fraction of the population mutated each generation (genetic).
    pub mutation_rate: f64,
    /// Fraction of the population retained unchanged each generation (genetic).
    pub elitism: f64,
    /// FIFO tenure of the recently-visited list (tabu).
    pub tabu_tenure: usize,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            max_evaluations: 100_000,
            max_stagnation: 100,
            population_size: 10,
            mutation_rate: 0.1,
            elitism: 0.15,
            tabu_tenure: 10,
        }
    }
}

/// The result of one search run.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Best assignment found.
    pub best: Assignment,
    /// Number of clauses the best assignment satisfies.
    pub best_fitness: usize,
    /// Fitness evaluations consumed.
    pub evaluations: usize,
    /// Whether the best assignment satisfies every clause.
    pub fully_satisfied: bool,
}

impl SearchOutcome {
    pub(crate) fn new(
        formula: &Formula,
        best: Assignment,
        best_fitness: usize,
        budget: &EvalBudget,
    ) -> Self {
        Self {
            fully_satisfied: best_fitness == formula.max_fitness(),
            best,
            best_fitness,
            evaluations: budget.used(),
        }
    }
}

/// Counts fitness evaluations against a global per-run limit.
///
/// Every heuristic routes its fitness calls through [`EvalBudget::evaluate`],
/// so the counter is exact. The limit is a soft cutoff: the evaluation that
/// crosses the limit still completes, and callers check
/// [`EvalBudget::exhausted`] afterwards.
#[derive(Debug, Clone)]
pub struct EvalBudget {
    limit: usize,
    used: usize,
}

impl EvalBudget {
    /// Creates a budget allowing `limit` evaluations.
    #[must_use]
    pub const fn new(limit: usize) -> Self {
        Self { limit, used: 0 }
    }

    /// Evaluates `assignment` against `formula`, counting one evaluation.
    pub fn evaluate(&mut self, formula: &Formula, assignment: &Assignment) -> usize {
        self.used += 1;
        formula.satisfied_count(assignment)
    }

    /// Whether the budget is spent.
    #[must_use]
    pub const fn exhausted(&self) -> bool {
        self.used >= self.limit
    }

    /// Evaluations consumed so far.
    #[must_use]
    pub const fn used(&self) -> usize {
        self.used
    }
}

/// Selects one of the bundled heuristics, e.g. on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    /// Single-start next-ascent hill climbing.
    NextAscent,
    /// Multistart next-ascent hill climbing.
    Multistart,
    /// Multistart variable-neighbourhood search (flip depth up to 3).
    VariableDepth,
    /// Generational genetic algorithm.
    Genetic,
    /// Multistart tabu search.
    Tabu,
    /// Exact enumeration of all assignments.
    BruteForce,
}

impl SearchKind {
    /// All selectable heuristics, in menu order.
    pub const ALL: [Self; 6] = [
        Self::NextAscent,
        Self::Multistart,
        Self::VariableDepth,
        Self::Genetic,
        Self::Tabu,
        Self::BruteForce,
    ];

    /// The conventional evaluation budget for this heuristic.
    #[must_use]
    pub const fn default_max_evaluations(self) -> usize {
        match self {
            Self::Genetic => 1_000,
            _ => 100_000,
        }
    }
}

impl fmt::Display for SearchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NextAscent => "next-ascent",
            Self::Multistart => "multistart",
            Self::VariableDepth => "variable-depth",
            Self::Genetic => "genetic",
            Self::Tabu => "tabu",
            Self::BruteForce => "brute-force",
        };
        f.write_str(name)
    }
}

/// Error returned when a heuristic name cannot be parsed.
#[derive(Debug, Error)]
#[error("unknown search heuristic '{0}', expected one of: next-ascent, multistart, variable-depth, genetic, tabu, brute-force")]
pub struct UnknownSearchKind(String);

impl FromStr for SearchKind {
    type Err = UnknownSearchKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "next-ascent" | "next_ascent" | "nahc" => Ok(Self::NextAscent),
            "multistart" | "msnahc" => Ok(Self::Multistart),
            "variable-depth" | "variable_depth" | "vns" => Ok(Self::VariableDepth),
            "genetic" | "ga" => Ok(Self::Genetic),
            "tabu" => Ok(Self::Tabu),
            "brute-force" | "brute_force" => Ok(Self::BruteForce),
            _ => Err(UnknownSearchKind(s.to_string())),
        }
    }
}

/// Constructs and runs the heuristic named by `kind` on one formula.
#[must_use]
pub fn run_search(
    kind: SearchKind,
    formula: Formula,
    params: SearchParams,
    rng: &mut fastrand::Rng,
) -> SearchOutcome {
    match kind {
        SearchKind::NextAscent => NextAscent::new(formula, params).run(rng),
        SearchKind::Multistart => Multistart::new(formula, params).run(rng),
        SearchKind::VariableDepth => VariableDepth::new(formula, params).run(rng),
        SearchKind::Genetic => Genetic::new(formula, params).run(rng),
        SearchKind::Tabu => Tabu::new(formula, params).run(rng),
        SearchKind::BruteForce => BruteForce::new(formula, params).run(rng),
    }
}
