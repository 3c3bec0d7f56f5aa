#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
pub mod assignment;
pub mod brute_force;
pub mod dimacs;
pub mod formula;
pub mod genetic;
pub mod multistart;
pub mod neighborhood;
pub mod next_ascent;
pub mod search;
pub mod tabu;
pub mod variable_depth;
