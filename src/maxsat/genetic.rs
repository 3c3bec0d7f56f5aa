#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! A generational genetic algorithm for MAXSAT.
//!
//! Each generation: evaluate the population, clone individuals with
//! probability proportional to their fitness (satisfied-clause count),
//! recombine clones with single-point crossover, flip one random gene in a
//! `mutation_rate` fraction of the offspring, and carry the fittest
//! `elitism` fraction of the old population over unchanged.

use crate::maxsat::assignment::Assignment;
use crate::maxsat::formula::Formula;
use crate::maxsat::search::{EvalBudget, Search, SearchOutcome, SearchParams};
use std::cmp::Reverse;

/// Generational genetic algorithm with fitness-proportional selection,
/// single-point crossover, per-gene mutation and elitist retention.
#[derive(Debug, Clone)]
pub struct Genetic {
    formula: Formula,
    params: SearchParams,
    generations: usize,
}

impl Genetic {
    /// Generations completed during the last [`Search::run`].
    #[must_use]
    pub const fn generations(&self) -> usize {
        self.generations
    }

    /// Draws one index with probability proportional to `weights`.
    /// Falls back to a uniform draw when every weight is zero.
    fn roulette(weights: &[usize], rng: &mut fastrand::Rng) -> usize {
        let total: usize = weights.iter().sum();
        if total == 0 {
            return rng.usize(..weights.len());
        }
        let mut ticket = rng.usize(..total);
        for (i, &w) in weights.iter().enumerate() {
            if ticket < w {
                return i;
            }
            ticket -= w;
        }
        weights.len() - 1
    }

    /// Single-point crossover: genes `0..cut` from `left`, the rest from `right`.
    fn crossover(left: &Assignment, right: &Assignment, rng: &mut fastrand::Rng) -> Assignment {
        let n = left.len();
        if n < 2 {
            return left.clone();
        }
        let cut = rng.usize(1..n);
        let mut child = left.clone();
        for i in cut..n {
            child.set(i, right.get(i));
        }
        child
    }
}

impl Search for Genetic {
    fn new(formula: Formula, params: SearchParams) -> Self {
        Self {
            formula,
            params,
            generations: 0,
        }
    }

    #[allow(clippy::cast_sign_loss, clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    fn run(&mut self, rng: &mut fastrand::Rng) -> SearchOutcome {
        let mut budget = EvalBudget::new(self.params.max_evaluations);
        let target = self.formula.max_fitness();
        let pop_size = self.params.population_size.max(2);
        let elite_count = (pop_size as f64 * self.params.elitism) as usize;
        let mutations_per_gen = (pop_size as f64 * self.params.mutation_rate) as usize;
        self.generations = 0;

        let mut population: Vec<Assignment> = (0..pop_size)
            .map(|_| Assignment::random(rng, self.formula.num_vars))
            .collect();
        let mut best: Option<(Assignment, usize)> = None;

        loop {
            let fitness: Vec<usize> = population
                .iter()
                .map(|individual| budget.evaluate(&self.formula, individual))
                .collect();

            // Rank the generation best-first; elites survive unchanged.
            let mut order: Vec<usize> = (0..pop_size).collect();
            order.sort_by_key(|&i| Reverse(fitness[i]));
            let ranked: Vec<Assignment> = order.iter().map(|&i| population[i].clone()).collect();
            let ranked_fitness: Vec<usize> = order.iter().map(|&i| fitness[i]).collect();

            if best.as_ref().is_none_or(|&(_, f)| ranked_fitness[0] > f) {
                best = Some((ranked[0].clone(), ranked_fitness[0]));
            }

            let best_fitness = best.as_ref().map_or(0, |&(_, f)| f);
            if best_fitness == target || budget.exhausted() {
                break;
            }
            self.generations += 1;

            // Fitness-proportional cloning.
            let clones: Vec<Assignment> = (0..pop_size)
                .map(|_| ranked[Self::roulette(&ranked_fitness, rng)].clone())
                .collect();

            // Single-point crossover between random clone pairs.
            let mut offspring: Vec<Assignment> = (0..pop_size)
                .map(|_| {
                    let left = &clones[rng.usize(..pop_size)];
                    let right = &clones[rng.usize(..pop_size)];
                    Self::crossover(left, right, rng)
                })
                .collect();

            // Per-gene random-flip mutation on a fraction of the offspring.
            if self.formula.num_vars > 0 {
                for _ in 0..mutations_per_gen {
                    let individual = rng.usize(..pop_size);
                    let gene = rng.usize(..self.formula.num_vars);
                    offspring[individual].flip(gene);
                }
            }

            offspring.truncate(pop_size - elite_count);
            population = ranked[..elite_count]
                .iter()
                .cloned()
                .chain(offspring)
                .collect();
        }

        // The first generation is always evaluated, so `best` is populated.
        let (best, best_fitness) = best.unwrap_or_else(|| unreachable!());
        SearchOutcome::new(&self.formula, best, best_fitness, &budget)
    }
}
