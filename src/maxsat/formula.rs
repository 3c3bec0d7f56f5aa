#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! CNF formulas and the clause-satisfaction fitness kernel.
//!
//! A [`Formula`] is a conjunction of [`Clause`]s over `num_vars` boolean
//! variables. Literals use the DIMACS convention: a signed `i32` whose
//! magnitude is a 1-indexed variable id and whose sign is the polarity.
//!
//! [`Formula::satisfied_count`] is the fitness function of every search
//! heuristic in this crate and dominates their runtime; it is a single pass
//! over the literal arrays with no allocation.

use crate::maxsat::assignment::Assignment;
use smallvec::SmallVec;
use std::fmt;

/// A signed DIMACS literal.
pub type Literal = i32;

/// A disjunction of literals, stored inline for the common short-clause case.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Clause {
    literals: SmallVec<[Literal; 8]>,
}

impl Clause {
    /// Builds a clause from its literals.
    #[must_use]
    pub fn new(literals: impl IntoIterator<Item = Literal>) -> Self {
        Self {
            literals: literals.into_iter().collect(),
        }
    }

    /// True iff at least one literal evaluates true under `assignment`.
    #[must_use]
    pub fn is_satisfied_by(&self, assignment: &Assignment) -> bool {
        self.literals
            .iter()
            .any(|&lit| assignment.literal_value(lit))
    }

    /// Whether the clause mentions the 1-indexed variable `var` in either polarity.
    #[must_use]
    pub fn mentions(&self, var: usize) -> bool {
        self.literals
            .iter()
            .any(|&lit| lit.unsigned_abs() as usize == var)
    }

    /// The literals of this clause.
    #[must_use]
    pub fn literals(&self) -> &[Literal] {
        &self.literals
    }

    /// Number of literals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.literals.len()
    }

    /// Whether the clause is empty (and therefore unsatisfiable).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }
}

/// A CNF formula: a clause collection plus its variable count.
///
/// Invariant: every literal magnitude lies in `1..=num_vars`. The DIMACS
/// loader enforces this; constructing a formula by hand with out-of-range
/// literals will panic inside the fitness kernel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formula {
    /// Number of variables, as declared by the instance header.
    pub num_vars: usize,
    /// The clauses of the conjunction.
    pub clauses: Vec<Clause>,
}

impl Formula {
    /// Builds a formula from raw signed-literal clause vectors.
    #[must_use]
    pub fn new(num_vars: usize, clauses: impl IntoIterator<Item = Vec<Literal>>) -> Self {
        Self {
            num_vars,
            clauses: clauses.into_iter().map(Clause::new).collect(),
        }
    }

    /// The fitness evaluator: counts clauses satisfied by `assignment`.
    ///
    /// Deterministic, side-effect free, O(total literal count).
    #[must_use]
    pub fn satisfied_count(&self, assignment: &Assignment) -> usize {
        self.clauses
            .iter()
            .filter(|clause| clause.is_satisfied_by(assignment))
            .count()
    }

    /// True iff every clause is satisfied.
    #[must_use]
    pub fn is_satisfied_by(&self, assignment: &Assignment) -> bool {
        self.clauses
            .iter()
            .all(|clause| clause.is_satisfied_by(assignment))
    }

    /// The maximum reachable fitness: the clause count.
    #[must_use]
    pub fn max_fitness(&self) -> usize {
        self.clauses.len()
    }

    /// Total number of literal occurrences across all clauses.
    #[must_use]
    pub fn num_literals(&self) -> usize {
        self.clauses.iter().map(Clause::len).sum()
    }
}

impl fmt::Display for Formula {
    /// Re-serializes the formula as DIMACS CNF text.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "p cnf {} {}", self.num_vars, self.clauses.len())?;
        for clause in &self.clauses {
            for lit in clause.literals() {
                write!(f, "{lit} ")?;
            }
            writeln!(f, "0")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_clause_formula() -> Formula {
        Formula::new(2, vec![vec![1, 2], vec![-1, 2], vec![1, -2]])
    }

    #[test]
    fn test_fitness_all_true_satisfies_all() {
        let formula = three_clause_formula();
        let a = Assignment::from_bools(&[true, true]);
        assert_eq!(formula.satisfied_count(&a), 3);
        assert!(formula.is_satisfied_by(&a));
    }

    #[test]
    fn test_fitness_all_false_satisfies_negated_literals() {
        // Under (F, F) the literals -1 and -2 hold, so the second and third
        // clauses are satisfied and only the first is not.
        let formula = three_clause_formula();
        let a = Assignment::from_bools(&[false, false]);
        assert_eq!(formula.satisfied_count(&a), 2);
        assert!(!formula.is_satisfied_by(&a));
    }

    #[test]
    fn test_single_clause_only_one_falsifying_assignment() {
        let formula = Formula::new(3, vec![vec![1, -2, 3]]);
        for mask in 0..8_u32 {
            let a = Assignment::from_bools(&[mask & 1 != 0, mask & 2 != 0, mask & 4 != 0]);
            let expected = usize::from(a.to_bools() != vec![false, true, false]);
            assert_eq!(formula.satisfied_count(&a), expected);
        }
    }

    #[test]
    fn test_fitness_never_exceeds_clause_count() {
        let formula = three_clause_formula();
        let mut rng = fastrand::Rng::with_seed(1);
        for _ in 0..32 {
            let a = Assignment::random(&mut rng, formula.num_vars);
            assert!(formula.satisfied_count(&a) <= formula.max_fitness());
        }
    }

    #[test]
    fn test_flipping_unmentioned_variable_preserves_clause_status() {
        let formula = Formula::new(3, vec![vec![1, -2]]);
        let clause = &formula.clauses[0];
        assert!(!clause.mentions(3));
        let mut rng = fastrand::Rng::with_seed(17);
        for _ in 0..16 {
            let a = Assignment::random(&mut rng, 3);
            let flipped = a.with_flipped(&[2]);
            assert_eq!(clause.is_satisfied_by(&a), clause.is_satisfied_by(&flipped));
        }
    }

    #[test]
    fn test_display_round_trips_literal_multisets() {
        let formula = three_clause_formula();
        let text = formula.to_string();
        let reparsed = crate::maxsat::dimacs::parse_dimacs(text.as_bytes()).unwrap();
        assert_eq!(reparsed.num_vars, formula.num_vars);
        assert_eq!(reparsed.clauses.len(), formula.clauses.len());
        for (a, b) in formula.clauses.iter().zip(reparsed.clauses.iter()) {
            let mut lhs = a.literals().to_vec();
            let mut rhs = b.literals().to_vec();
            lhs.sort_unstable();
            rhs.sort_unstable();
            assert_eq!(lhs, rhs);
        }
    }

    #[test]
    fn test_num_literals_counts_occurrences() {
        let formula = three_clause_formula();
        assert_eq!(formula.num_literals(), 6);
    }
}
