#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Exact MAXSAT by exhaustive enumeration.
//!
//! Walks all `2^n` assignments, counts satisfied clauses for each, and keeps
//! every assignment attaining the maximum. Only viable for small `n`; the
//! variable count is capped at [`BruteForce::MAX_VARS`].

use crate::maxsat::assignment::Assignment;
use crate::maxsat::formula::Formula;
use crate::maxsat::search::{Search, SearchOutcome, SearchParams};

/// Exhaustive enumeration of every assignment.
#[derive(Debug, Clone)]
pub struct BruteForce {
    formula: Formula,
}

/// The full result of an exhaustive enumeration.
#[derive(Debug, Clone)]
pub struct Enumeration {
    /// The maximum satisfied-clause count over all assignments.
    pub best_fitness: usize,
    /// Every assignment attaining `best_fitness`, in ascending bit order.
    pub maximizers: Vec<Assignment>,
    /// Number of assignments examined (always `2^num_vars`).
    pub examined: usize,
}

impl Enumeration {
    /// Number of assignments attaining the maximum.
    #[must_use]
    pub fn count(&self) -> usize {
        self.maximizers.len()
    }
}

impl BruteForce {
    /// Largest variable count the enumerator accepts.
    pub const MAX_VARS: usize = 30;

    /// Enumerates all assignments and collects the maximizers.
    ///
    /// # Panics
    ///
    /// Panics if the formula has more than [`Self::MAX_VARS`] variables.
    #[must_use]
    pub fn enumerate(&self) -> Enumeration {
        let n = self.formula.num_vars;
        assert!(
            n <= Self::MAX_VARS,
            "brute force is capped at {} variables, got {n}",
            Self::MAX_VARS
        );

        let mut best_fitness = 0;
        let mut maximizers = Vec::new();
        for bits in 0..(1_u64 << n) {
            let assignment = assignment_from_bits(bits, n);
            let fitness = self.formula.satisfied_count(&assignment);
            if fitness > best_fitness {
                best_fitness = fitness;
                maximizers.clear();
            }
            if fitness == best_fitness {
                maximizers.push(assignment);
            }
        }

        Enumeration {
            best_fitness,
            maximizers,
            examined: 1 << n,
        }
    }
}

fn assignment_from_bits(bits: u64, n: usize) -> Assignment {
    let mut assignment = Assignment::new(n);
    for i in 0..n {
        assignment.set(i, bits & (1 << i) != 0);
    }
    assignment
}

impl Search for BruteForce {
    fn new(formula: Formula, _params: SearchParams) -> Self {
        Self { formula }
    }

    /// Runs the enumeration; the RNG and parameters are unused, which keeps
    /// the enumerator interchangeable with the stochastic heuristics.
    fn run(&mut self, _rng: &mut fastrand::Rng) -> SearchOutcome {
        let enumeration = self.enumerate();
        SearchOutcome {
            fully_satisfied: enumeration.best_fitness == self.formula.max_fitness(),
            best: enumeration.maximizers[0].clone(),
            best_fitness: enumeration.best_fitness,
            evaluations: enumeration.examined,
        }
    }
}
