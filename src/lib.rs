#![deny(missing_docs)]
//! This crate provides stochastic local-search heuristics for the MAXSAT problem:
//! given a boolean formula in CNF, find a variable assignment maximizing the
//! number of satisfied clauses.

/// The `maxsat` module implements the CNF data model, the DIMACS loader, and the
/// family of search heuristics (hill climbing, variable-neighbourhood search,
/// genetic algorithm, tabu search, brute force).
pub mod maxsat;

/// The `runner` module executes repeated independent seeded runs of a heuristic
/// on one instance and aggregates per-run statistics.
pub mod runner;
