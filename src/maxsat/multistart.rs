#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Multistart next-ascent hill climbing (MSNAHC).
//!
//! Runs next-ascent climbs from fresh uniformly random assignments until the
//! global evaluation budget is spent or some restart satisfies every clause,
//! keeping the best assignment seen across restarts.

use crate::maxsat::assignment::Assignment;
use crate::maxsat::formula::Formula;
use crate::maxsat::neighborhood::Neighborhood;
use crate::maxsat::next_ascent::{ClimbEnd, climb};
use crate::maxsat::search::{EvalBudget, Search, SearchOutcome, SearchParams};

/// Multistart next-ascent hill climbing.
#[derive(Debug, Clone)]
pub struct Multistart {
    formula: Formula,
    params: SearchParams,
    restarts: usize,
    /// Evaluation count at which the best assignment was first reached.
    best_found_at: usize,
}

impl Multistart {
    /// Restarts performed during the last [`Search::run`].
    #[must_use]
    pub const fn restarts(&self) -> usize {
        self.restarts
    }

    /// Evaluation count at which the best-ever assignment was found.
    #[must_use]
    pub const fn best_found_at(&self) -> usize {
        self.best_found_at
    }
}

impl Search for Multistart {
    fn new(formula: Formula, params: SearchParams) -> Self {
        Self {
            formula,
            params,
            restarts: 0,
            best_found_at: 0,
        }
    }

    fn run(&mut self, rng: &mut fastrand::Rng) -> SearchOutcome {
        let mut budget = EvalBudget::new(self.params.max_evaluations);
        let mut neighborhood = Neighborhood::new(self.formula.num_vars, 1);
        let target = self.formula.max_fitness();
        self.restarts = 0;

        let mut best: Option<(Assignment, usize)> = None;
        loop {
            self.restarts += 1;
            let initial = Assignment::random(rng, self.formula.num_vars);
            let initial_fitness = budget.evaluate(&self.formula, &initial);
            let (local, local_fitness, end) = climb(
                &self.formula,
                &mut neighborhood,
                &mut budget,
                rng,
                initial,
                initial_fitness,
            );

            if best.as_ref().is_none_or(|&(_, f)| local_fitness > f) {
                best = Some((local, local_fitness));
                self.best_found_at = budget.used();
            }

            let best_fitness = best.as_ref().map_or(0, |&(_, f)| f);
            if best_fitness == target
                || budget.exhausted()
                || end == ClimbEnd::BudgetExhausted
            {
                break;
            }
        }

        // At least one restart ran, so `best` is always populated.
        let (best, best_fitness) = best.unwrap_or_else(|| unreachable!());
        SearchOutcome::new(&self.formula, best, best_fitness, &budget)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maxsat::dimacs::parse_dimacs;

    #[test]
    fn test_finds_satisfying_assignment_on_small_instance() {
        // (x1 xor-ish structure) with exactly one satisfying assignment per
        // variable pair; restarts make eventual success near-certain.
        let formula =
            parse_dimacs("p cnf 3 4\n1 2 0\n-1 3 0\n-2 -3 0\n1 3 0\n".as_bytes()).unwrap();
        let mut search = Multistart::new(formula, SearchParams::default());
        let mut rng = fastrand::Rng::with_seed(9);
        let outcome = search.run(&mut rng);
        assert!(outcome.fully_satisfied);
        assert!(search.restarts() >= 1);
        assert!(search.best_found_at() <= outcome.evaluations);
    }

    #[test]
    fn test_stops_at_budget_on_unsatisfiable_formula() {
        // x and not-x cannot both hold; the search must spend its budget and
        // settle for one satisfied clause.
        let formula = parse_dimacs("p cnf 1 2\n1 0\n-1 0\n".as_bytes()).unwrap();
        let params = SearchParams {
            max_evaluations: 200,
            ..SearchParams::default()
        };
        let mut search = Multistart::new(formula, params);
        let mut rng = fastrand::Rng::with_seed(4);
        let outcome = search.run(&mut rng);
        assert!(!outcome.fully_satisfied);
        assert_eq!(outcome.best_fitness, 1);
        assert!(outcome.evaluations >= 200);
    }

    #[test]
    fn test_zero_budget_still_reports_an_assignment() {
        let formula = parse_dimacs("p cnf 2 1\n1 2 0\n".as_bytes()).unwrap();
        let params = SearchParams {
            max_evaluations: 0,
            ..SearchParams::default()
        };
        let mut search = Multistart::new(formula.clone(), params);
        let mut rng = fastrand::Rng::with_seed(5);
        let outcome = search.run(&mut rng);
        assert_eq!(outcome.best.len(), formula.num_vars);
        assert_eq!(formula.satisfied_count(&outcome.best), outcome.best_fitness);
    }
}
