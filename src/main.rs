//! # `MaxsatSolver`
//!
//! A configurable command-line MAXSAT solver. It parses boolean formulas in
//! DIMACS CNF format and searches for an assignment maximizing the number of
//! satisfied clauses using stochastic local-search metaheuristics:
//!
//! 1. **Next-ascent hill climbing**: adopt the first improving 1-flip
//!    neighbor in randomized scan order.
//! 2. **Multistart next-ascent**: restart from fresh random assignments
//!    until the evaluation budget is spent.
//! 3. **Variable-depth search**: widen the flip neighborhood up to depth 3
//!    before restarting.
//! 4. **Genetic algorithm**: fitness-proportional selection, single-point
//!    crossover, random-flip mutation, elitist retention.
//! 5. **Tabu search**: best-of-scan moves with a FIFO tenure of forbidden
//!    assignments and an aspiration criterion.
//! 6. **Brute force**: exact enumeration for small instances.
//!
//! Every experiment aggregates 30 independent seeded runs by default and
//! prints per-run progress plus a summary table (average time, average and
//! maximum fitness, average evaluation count, memory usage).
//!
//! ## Usage
//!
//! ```sh
//! # Multistart hill climbing on a DIMACS file, 30 runs
//! maxsat_solver problem.cnf
//!
//! # Tabu search with a custom budget and seed
//! maxsat_solver file --path problem.cnf --search tabu --max-evaluations 50000 --seed 7
//!
//! # Every instance under a directory
//! maxsat_solver suite --dir instances/ --search variable-depth
//!
//! # Interactive selection of a bundled SATLIB instance
//! maxsat_solver pick --search genetic
//! ```

mod command_line;

/// Global allocator using `tikv-jemallocator` for performance and for the
/// memory statistics reported after each experiment.
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn main() {
    if let Err(e) = command_line::cli::run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
