#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! A parser for the DIMACS CNF file format.
//!
//! The format, as used by the SATLIB `uf*` instance families:
//! - comment lines start with `c`;
//! - a problem line `p cnf <num_vars> <num_clauses>` declares the expected
//!   counts;
//! - every other non-blank line is a clause: whitespace-separated signed
//!   integers terminated by a `0`, which is stripped;
//! - `%` and bare `0` lines (SATLIB end-of-data markers) are skipped, as are
//!   blank lines.
//!
//! Unlike permissive competition parsers, this one validates the instance:
//! literals must stay within the declared variable range and the parsed
//! clause count must match the declared one.

use crate::maxsat::formula::Formula;
use std::io::{self, BufRead};
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading a DIMACS instance. All are terminal for the
/// current invocation; there is no recovery or retry.
#[derive(Debug, Error)]
pub enum DimacsError {
    /// Underlying read failure.
    #[error("failed to read DIMACS input: {0}")]
    Io(#[from] io::Error),

    /// A clause line appeared before any `p cnf` header.
    #[error("clause line before 'p cnf' header")]
    MissingHeader,

    /// The `p` line did not have the shape `p cnf <vars> <clauses>`.
    #[error("malformed problem line: '{0}'")]
    BadHeader(String),

    /// A clause token failed integer parsing.
    #[error("failed to parse literal '{0}'")]
    BadLiteral(String),

    /// A literal's magnitude is outside `1..=num_vars`.
    #[error("literal {literal} out of range for {num_vars} variables")]
    LiteralOutOfRange {
        /// The offending literal.
        literal: i32,
        /// The declared variable count.
        num_vars: usize,
    },

    /// The parsed clause count disagrees with the header.
    #[error("expected {declared} clauses but got {parsed}")]
    ClauseCountMismatch {
        /// Clause count declared on the `p` line.
        declared: usize,
        /// Clause count actually parsed.
        parsed: usize,
    },
}

/// Parses DIMACS formatted data from a `BufRead` source into a [`Formula`].
///
/// # Errors
///
/// Returns a [`DimacsError`] on read failure, on a malformed header or
/// literal, on an out-of-range literal, or when the parsed clause count does
/// not match the count declared on the `p` line.
pub fn parse_dimacs<R: BufRead>(reader: R) -> Result<Formula, DimacsError> {
    let mut header: Option<(usize, usize)> = None;
    let mut clauses: Vec<Vec<i32>> = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();

        if line.is_empty()
            || line.starts_with('c')
            || line.starts_with('%')
            || line.starts_with('0')
        {
            continue;
        }

        if line.starts_with('p') {
            header = Some(parse_header(line)?);
            clauses.reserve(header.map_or(0, |(_, declared)| declared));
            continue;
        }

        let (num_vars, _) = header.ok_or(DimacsError::MissingHeader)?;
        let clause = parse_clause(line, num_vars)?;
        if !clause.is_empty() {
            clauses.push(clause);
        }
    }

    let (num_vars, declared) = header.ok_or(DimacsError::MissingHeader)?;
    if clauses.len() != declared {
        return Err(DimacsError::ClauseCountMismatch {
            declared,
            parsed: clauses.len(),
        });
    }

    Ok(Formula::new(num_vars, clauses))
}

/// Parses a DIMACS CNF file specified by its path.
///
/// Convenience wrapper that opens the file, wraps it in a `BufReader`, and
/// calls [`parse_dimacs`].
///
/// # Errors
///
/// Returns [`DimacsError::Io`] if the file cannot be opened, plus every
/// failure mode of [`parse_dimacs`].
pub fn parse_file(path: impl AsRef<Path>) -> Result<Formula, DimacsError> {
    let file = std::fs::File::open(path)?;
    parse_dimacs(io::BufReader::new(file))
}

fn parse_header(line: &str) -> Result<(usize, usize), DimacsError> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    match parts.as_slice() {
        ["p", "cnf", vars, clauses] => {
            let num_vars = vars
                .parse()
                .map_err(|_| DimacsError::BadHeader(line.to_string()))?;
            let num_clauses = clauses
                .parse()
                .map_err(|_| DimacsError::BadHeader(line.to_string()))?;
            Ok((num_vars, num_clauses))
        }
        _ => Err(DimacsError::BadHeader(line.to_string())),
    }
}

fn parse_clause(line: &str, num_vars: usize) -> Result<Vec<i32>, DimacsError> {
    let mut literals = Vec::new();
    for token in line.split_whitespace() {
        let lit: i32 = token
            .parse()
            .map_err(|_| DimacsError::BadLiteral(token.to_string()))?;
        if lit == 0 {
            // Terminating zero; anything after it on the same line is ignored.
            break;
        }
        if lit.unsigned_abs() as usize > num_vars {
            return Err(DimacsError::LiteralOutOfRange {
                literal: lit,
                num_vars,
            });
        }
        literals.push(lit);
    }
    Ok(literals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_simple_dimacs() {
        let content = "c comment\np cnf 3 2\n1 -2 0\n2 3 0\n";
        let formula = parse_dimacs(Cursor::new(content)).unwrap();
        assert_eq!(formula.num_vars, 3);
        assert_eq!(formula.clauses.len(), 2);
        assert_eq!(formula.clauses[0].literals(), &[1, -2]);
        assert_eq!(formula.clauses[1].literals(), &[2, 3]);
    }

    #[test]
    fn test_parse_skips_blank_percent_and_zero_lines() {
        let content = "p cnf 2 2\n\n1 0\n-2 0\n%\n0\n";
        let formula = parse_dimacs(Cursor::new(content)).unwrap();
        assert_eq!(formula.clauses.len(), 2);
    }

    #[test]
    fn test_parse_clause_count_mismatch() {
        let content = "p cnf 2 3\n1 0\n-2 0\n";
        let err = parse_dimacs(Cursor::new(content)).unwrap_err();
        assert!(matches!(
            err,
            DimacsError::ClauseCountMismatch {
                declared: 3,
                parsed: 2
            }
        ));
        assert_eq!(err.to_string(), "expected 3 clauses but got 2");
    }

    #[test]
    fn test_parse_clause_before_header() {
        let content = "1 -2 0\np cnf 2 1\n";
        assert!(matches!(
            parse_dimacs(Cursor::new(content)).unwrap_err(),
            DimacsError::MissingHeader
        ));
    }

    #[test]
    fn test_parse_malformed_literal() {
        let content = "p cnf 2 1\n1 abc 0\n";
        assert!(matches!(
            parse_dimacs(Cursor::new(content)).unwrap_err(),
            DimacsError::BadLiteral(token) if token == "abc"
        ));
    }

    #[test]
    fn test_parse_literal_out_of_range() {
        let content = "p cnf 2 1\n1 -5 0\n";
        assert!(matches!(
            parse_dimacs(Cursor::new(content)).unwrap_err(),
            DimacsError::LiteralOutOfRange {
                literal: -5,
                num_vars: 2
            }
        ));
    }

    #[test]
    fn test_parse_malformed_header() {
        let content = "p cnf two 1\n1 0\n";
        assert!(matches!(
            parse_dimacs(Cursor::new(content)).unwrap_err(),
            DimacsError::BadHeader(_)
        ));
    }

    #[test]
    fn test_parse_bundled_instance() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/uf20-01.cnf");
        let formula = parse_file(path).unwrap();
        assert_eq!(formula.num_vars, 20);
        assert_eq!(formula.clauses.len(), 91);
        assert!(formula.clauses.iter().all(|c| c.len() == 3));
    }
}
