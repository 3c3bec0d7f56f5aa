#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Multistart tabu search over the 1-flip neighborhood.
//!
//! Unlike the next-ascent climbers this driver is best-of-scan: every scan
//! evaluates all 1-flip neighbors and moves to the fittest eligible one,
//! even when that move is non-improving. A FIFO queue of recently visited
//! assignments (the tenure) is forbidden as a move target, unless the move
//! would beat the best fitness seen so far (the aspiration criterion). When
//! a scan leaves no eligible neighbor, the search reseeds from a fresh
//! random assignment. Termination: `max_stagnation` consecutive
//! non-improving moves, budget exhaustion, or full satisfaction.

use crate::maxsat::assignment::Assignment;
use crate::maxsat::formula::Formula;
use crate::maxsat::search::{EvalBudget, Search, SearchOutcome, SearchParams};
use rustc_hash::FxHashSet;
use std::collections::VecDeque;

/// FIFO tenure of recently visited assignments with O(1) membership checks.
#[derive(Debug)]
struct TabuList {
    queue: VecDeque<Assignment>,
    members: FxHashSet<Assignment>,
    tenure: usize,
}

impl TabuList {
    fn new(tenure: usize) -> Self {
        Self {
            queue: VecDeque::with_capacity(tenure),
            members: FxHashSet::default(),
            tenure,
        }
    }

    fn contains(&self, assignment: &Assignment) -> bool {
        self.members.contains(assignment)
    }

    /// Records a visited assignment, evicting the oldest past the tenure.
    fn visit(&mut self, assignment: Assignment) {
        if self.tenure == 0 {
            return;
        }
        self.members.insert(assignment.clone());
        self.queue.push_back(assignment);
        if self.queue.len() > self.tenure {
            if let Some(evicted) = self.queue.pop_front() {
                self.members.remove(&evicted);
            }
        }
    }
}

/// Multistart tabu search.
#[derive(Debug, Clone)]
pub struct Tabu {
    formula: Formula,
    params: SearchParams,
    reseeds: usize,
}

impl Tabu {
    /// Random reseeds forced by all-tabu scans during the last [`Search::run`].
    #[must_use]
    pub const fn reseeds(&self) -> usize {
        self.reseeds
    }

    /// Best-of-scan over all 1-flip neighbors of `working`, honoring the
    /// tabu list and the aspiration criterion.
    #[allow(clippy::cast_possible_truncation)]
    fn best_eligible_neighbor(
        &self,
        working: &Assignment,
        tabu: &TabuList,
        best_fitness: usize,
        budget: &mut EvalBudget,
    ) -> Option<(Assignment, usize)> {
        let mut best_neighbor: Option<(Assignment, usize)> = None;
        for i in 0..self.formula.num_vars {
            let candidate = working.with_flipped(&[i as u32]);
            let fitness = budget.evaluate(&self.formula, &candidate);
            let aspires = fitness > best_fitness;
            if tabu.contains(&candidate) && !aspires {
                continue;
            }
            if best_neighbor.as_ref().is_none_or(|&(_, f)| fitness > f) {
                best_neighbor = Some((candidate, fitness));
            }
        }
        best_neighbor
    }
}

impl Search for Tabu {
    fn new(formula: Formula, params: SearchParams) -> Self {
        Self {
            formula,
            params,
            reseeds: 0,
        }
    }

    fn run(&mut self, rng: &mut fastrand::Rng) -> SearchOutcome {
        let mut budget = EvalBudget::new(self.params.max_evaluations);
        let target = self.formula.max_fitness();
        let mut tabu = TabuList::new(self.params.tabu_tenure);
        self.reseeds = 0;

        let mut working = Assignment::random(rng, self.formula.num_vars);
        let mut best_fitness = budget.evaluate(&self.formula, &working);
        let mut best = working.clone();
        let mut failures = 0;

        while failures < self.params.max_stagnation
            && !budget.exhausted()
            && best_fitness < target
        {
            let Some((neighbor, neighbor_fitness)) =
                self.best_eligible_neighbor(&working, &tabu, best_fitness, &mut budget)
            else {
                // Every neighbor is tabu and none aspires: reseed.
                self.reseeds += 1;
                working = Assignment::random(rng, self.formula.num_vars);
                let fitness = budget.evaluate(&self.formula, &working);
                if fitness > best_fitness {
                    best = working.clone();
                    best_fitness = fitness;
                    failures = 0;
                } else {
                    failures += 1;
                }
                continue;
            };

            tabu.visit(working);
            working = neighbor;

            if neighbor_fitness > best_fitness {
                best = working.clone();
                best_fitness = neighbor_fitness;
                failures = 0;
            } else {
                failures += 1;
            }
        }

        SearchOutcome::new(&self.formula, best, best_fitness, &budget)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maxsat::dimacs::parse_dimacs;

    #[test]
    fn test_tabu_list_evicts_fifo() {
        let mut tabu = TabuList::new(2);
        let a = Assignment::from_bools(&[true]);
        let b = Assignment::from_bools(&[false]);
        let mut rng = fastrand::Rng::with_seed(1);
        let c = Assignment::random(&mut rng, 1);
        tabu.visit(a.clone());
        tabu.visit(b.clone());
        assert!(tabu.contains(&a));
        tabu.visit(c);
        assert!(!tabu.contains(&a), "oldest entry must be evicted first");
        assert!(tabu.contains(&b));
    }

    #[test]
    fn test_solves_tiny_satisfiable_formula() {
        let formula = parse_dimacs("p cnf 2 3\n1 2 0\n-1 2 0\n1 -2 0\n".as_bytes()).unwrap();
        let mut search = Tabu::new(formula, SearchParams::default());
        let mut rng = fastrand::Rng::with_seed(21);
        let outcome = search.run(&mut rng);
        assert!(outcome.fully_satisfied);
        assert_eq!(outcome.best.to_bools(), vec![true, true]);
    }

    #[test]
    fn test_accepts_non_improving_moves_but_stops_on_stagnation() {
        let formula = parse_dimacs("p cnf 1 2\n1 0\n-1 0\n".as_bytes()).unwrap();
        let params = SearchParams {
            max_stagnation: 5,
            ..SearchParams::default()
        };
        let mut search = Tabu::new(formula, params);
        let mut rng = fastrand::Rng::with_seed(22);
        let outcome = search.run(&mut rng);
        assert!(!outcome.fully_satisfied);
        assert_eq!(outcome.best_fitness, 1);
        // 1 initial + at most (stagnation + reseeds) scans of 1 neighbor each,
        // far below the default budget.
        assert!(outcome.evaluations < 100);
    }

    #[test]
    fn test_reseed_evaluations_are_counted() {
        // Every assignment of this formula has fitness 1, so no move or
        // reseed ever improves and the search runs exactly `max_stagnation`
        // iterations: one scan of the single neighbor each, plus one
        // evaluation per reseed, plus the initial evaluation.
        let formula = parse_dimacs("p cnf 1 2\n1 0\n-1 0\n".as_bytes()).unwrap();
        let params = SearchParams {
            max_stagnation: 5,
            ..SearchParams::default()
        };
        let mut search = Tabu::new(formula, params);
        let mut rng = fastrand::Rng::with_seed(30);
        let outcome = search.run(&mut rng);
        assert!(search.reseeds() >= 1);
        assert_eq!(outcome.evaluations, 1 + 5 + search.reseeds());
    }

    #[test]
    fn test_aspiration_allows_tabu_move_that_beats_best() {
        let mut tabu = TabuList::new(4);
        let formula = parse_dimacs("p cnf 2 3\n1 2 0\n-1 2 0\n1 -2 0\n".as_bytes()).unwrap();
        let search = Tabu::new(formula, SearchParams::default());
        let working = Assignment::from_bools(&[true, false]);
        // Make the improving neighbor (true, true) tabu; with best_fitness
        // below 3 it must still be eligible through aspiration.
        tabu.visit(Assignment::from_bools(&[true, true]));
        let mut budget = EvalBudget::new(100);
        let (neighbor, fitness) = search
            .best_eligible_neighbor(&working, &tabu, 2, &mut budget)
            .unwrap();
        assert_eq!(neighbor.to_bools(), vec![true, true]);
        assert_eq!(fitness, 3);
    }
}
