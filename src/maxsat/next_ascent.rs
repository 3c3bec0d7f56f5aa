#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Next-ascent hill climbing over the 1-flip neighborhood.
//!
//! Each scan visits the neighbors in a fresh random order and adopts the
//! *first* strictly improving one, rather than the best of the whole scan.
//! The search stops at a local optimum (a full scan with no improvement),
//! on budget exhaustion, or when every clause is satisfied.

use crate::maxsat::assignment::Assignment;
use crate::maxsat::formula::Formula;
use crate::maxsat::neighborhood::Neighborhood;
use crate::maxsat::search::{EvalBudget, Search, SearchOutcome, SearchParams};

/// Single-start next-ascent hill climbing.
#[derive(Debug, Clone)]
pub struct NextAscent {
    formula: Formula,
    params: SearchParams,
}

/// How one next-ascent climb ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ClimbEnd {
    /// A full neighbor scan produced no improvement.
    LocalOptimum,
    /// The evaluation budget ran out mid-climb.
    BudgetExhausted,
    /// The current assignment satisfies every clause.
    FullySatisfied,
}

/// Climbs from `(current, current_fitness)` until a stop condition, scanning
/// the shuffled neighborhood and accepting the first strict improvement.
///
/// Shared by the single-start, multistart and variable-depth drivers; returns
/// the final assignment, its fitness, and why the climb ended.
pub(crate) fn climb(
    formula: &Formula,
    neighborhood: &mut Neighborhood,
    budget: &mut EvalBudget,
    rng: &mut fastrand::Rng,
    mut current: Assignment,
    mut current_fitness: usize,
) -> (Assignment, usize, ClimbEnd) {
    let target = formula.max_fitness();
    loop {
        if current_fitness == target {
            return (current, current_fitness, ClimbEnd::FullySatisfied);
        }
        if budget.exhausted() {
            return (current, current_fitness, ClimbEnd::BudgetExhausted);
        }

        neighborhood.shuffle(rng);
        let mut adopted = None;
        for flips in neighborhood.iter() {
            let candidate = current.with_flipped(flips);
            let fitness = budget.evaluate(formula, &candidate);
            if fitness > current_fitness {
                adopted = Some((candidate, fitness));
                break;
            }
            if budget.exhausted() {
                break;
            }
        }

        match adopted {
            Some((assignment, fitness)) => {
                current = assignment;
                current_fitness = fitness;
            }
            None => {
                let end = if budget.exhausted() {
                    ClimbEnd::BudgetExhausted
                } else {
                    ClimbEnd::LocalOptimum
                };
                return (current, current_fitness, end);
            }
        }
    }
}

impl Search for NextAscent {
    fn new(formula: Formula, params: SearchParams) -> Self {
        Self { formula, params }
    }

    fn run(&mut self, rng: &mut fastrand::Rng) -> SearchOutcome {
        let mut budget = EvalBudget::new(self.params.max_evaluations);
        let mut neighborhood = Neighborhood::new(self.formula.num_vars, 1);

        let initial = Assignment::random(rng, self.formula.num_vars);
        let initial_fitness = budget.evaluate(&self.formula, &initial);
        let (best, best_fitness, _) = climb(
            &self.formula,
            &mut neighborhood,
            &mut budget,
            rng,
            initial,
            initial_fitness,
        );

        SearchOutcome::new(&self.formula, best, best_fitness, &budget)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maxsat::dimacs::parse_dimacs;

    fn formula() -> Formula {
        parse_dimacs("p cnf 2 3\n1 2 0\n-1 2 0\n1 -2 0\n".as_bytes()).unwrap()
    }

    #[test]
    fn test_solves_tiny_satisfiable_formula() {
        // Only (true, true) satisfies all three clauses; the 1-flip landscape
        // of this formula has no local optimum below the maximum.
        let mut search = NextAscent::new(formula(), SearchParams::default());
        let mut rng = fastrand::Rng::with_seed(0);
        let outcome = search.run(&mut rng);
        assert!(outcome.fully_satisfied);
        assert_eq!(outcome.best_fitness, 3);
        assert_eq!(outcome.best.to_bools(), vec![true, true]);
    }

    #[test]
    fn test_respects_evaluation_budget() {
        let params = SearchParams {
            max_evaluations: 5,
            ..SearchParams::default()
        };
        let mut search = NextAscent::new(formula(), params);
        let mut rng = fastrand::Rng::with_seed(1);
        let outcome = search.run(&mut rng);
        // The scan that crosses the limit finishes its current evaluation.
        assert!(outcome.evaluations <= 6);
    }

    #[test]
    fn test_climb_never_decreases_fitness() {
        let formula = formula();
        let mut neighborhood = Neighborhood::new(formula.num_vars, 1);
        let mut budget = EvalBudget::new(1_000);
        let mut rng = fastrand::Rng::with_seed(2);
        let start = Assignment::new(formula.num_vars);
        let start_fitness = budget.evaluate(&formula, &start);
        let (_, end_fitness, _) = climb(
            &formula,
            &mut neighborhood,
            &mut budget,
            &mut rng,
            start,
            start_fitness,
        );
        assert!(end_fitness >= start_fitness);
    }
}
