#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::cast_precision_loss, clippy::cast_possible_wrap)]
//! Command-line interface of the MAXSAT solver.
//!
//! Uses `clap` for parsing arguments. Three ways to choose an instance:
//! an explicit DIMACS file, a directory suite, or an interactive numeric
//! prompt over the bundled SATLIB instances.

use clap::{Args, CommandFactory, Parser, Subcommand};
use maxsat_solver::maxsat::assignment::Assignment;
use maxsat_solver::maxsat::brute_force::{BruteForce, Enumeration};
use maxsat_solver::maxsat::dimacs::{DimacsError, parse_file};
use maxsat_solver::maxsat::formula::Formula;
use maxsat_solver::maxsat::search::{Search, SearchKind, SearchOutcome, SearchParams};
use maxsat_solver::runner::{ExperimentConfig, ExperimentSummary, RunRecord, run_experiment};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use thiserror::Error;
use tikv_jemalloc_ctl::{epoch, stats};

/// The bundled SATLIB instances offered by the interactive prompt.
const BUNDLED_INSTANCES: [&str; 3] = [
    "data/uf20-01.cnf",
    "data/uf100-01.cnf",
    "data/uf250-01.cnf",
];

/// Invalid user input; reported on stderr, the process exits non-zero
/// without running any search.
#[derive(Debug, Error)]
pub(crate) enum InputError {
    /// The interactive instance selection was not 1, 2 or 3.
    #[error("invalid choice '{0}', expected 1, 2 or 3")]
    BadSelection(String),

    /// Brute force on an instance too large to enumerate.
    #[error("brute force is capped at {max} variables, instance has {num_vars}")]
    BruteForceTooLarge {
        num_vars: usize,
        max: usize,
    },

    /// A suite directory contained no instances.
    #[error("no .cnf files found under '{0}'")]
    EmptySuite(PathBuf),
}

/// Everything that can abort an invocation.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    #[error(transparent)]
    Dimacs(#[from] DimacsError),
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Defines the command-line interface for the MAXSAT solver application.
#[derive(Parser, Debug)]
#[command(name = "maxsat_solver", version, about = "A MAXSAT local-search solver")]
pub(crate) struct Cli {
    /// An optional global path argument. If provided without a subcommand,
    /// it's treated as the path to a DIMACS .cnf file to run on.
    #[arg(global = true)]
    pub path: Option<PathBuf>,

    /// Specifies the subcommand to execute (e.g. `file`, `suite`, `pick`).
    #[clap(subcommand)]
    pub command: Option<Commands>,

    /// Common options applicable to all commands.
    #[command(flatten)]
    pub common: CommonOptions,
}

/// Enumerates the available subcommands.
#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Run a heuristic on a CNF file in DIMACS format.
    File {
        /// Path to the DIMACS .cnf file.
        #[arg(long)]
        path: PathBuf,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Run a heuristic on every .cnf file under a directory.
    Suite {
        /// Directory to scan recursively for .cnf files.
        #[arg(long)]
        dir: PathBuf,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Pick one of the bundled SATLIB instances interactively.
    Pick {
        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Generate shell completion scripts.
    Completions {
        /// The shell to generate completions for.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Defines common command-line options shared across different subcommands.
#[derive(Args, Debug, Clone)]
pub(crate) struct CommonOptions {
    /// The search heuristic to run.
    /// One of: next-ascent, multistart, variable-depth, genetic, tabu, brute-force.
    #[arg(long, default_value_t = SearchKind::Multistart)]
    search: SearchKind,

    /// Number of independent runs to aggregate over. Must be at least 1.
    #[arg(
        long,
        default_value_t = 30,
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
    )]
    runs: usize,

    /// Seed of the first run; run i uses seed + i.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Fitness-evaluation budget per run. Defaults to the heuristic's
    /// conventional budget (100000, or 1000 for the genetic algorithm).
    #[arg(long)]
    max_evaluations: Option<usize>,

    /// Consecutive non-improving moves tolerated before stopping (tabu).
    #[arg(long, default_value_t = 100)]
    max_stagnation: usize,

    /// FIFO tenure of the tabu list.
    #[arg(long, default_value_t = 10)]
    tabu_tenure: usize,

    /// Population size of the genetic algorithm.
    #[arg(long, default_value_t = 10)]
    population_size: usize,

    /// Fraction of the population mutated each generation.
    #[arg(long, default_value_t = 0.1)]
    mutation_rate: f64,

    /// Suppress the per-run progress lines.
    #[arg(short, long, default_value_t = false)]
    quiet: bool,

    /// Enable printing of the aggregate statistics table.
    #[arg(short, long, default_value_t = true)]
    stats: bool,

    /// Print the best assignment found as a DIMACS-style value line.
    #[arg(short, long, default_value_t = false)]
    print_solution: bool,
}

impl CommonOptions {
    fn params(&self) -> SearchParams {
        SearchParams {
            max_evaluations: self
                .max_evaluations
                .unwrap_or_else(|| self.search.default_max_evaluations()),
            max_stagnation: self.max_stagnation,
            tabu_tenure: self.tabu_tenure,
            population_size: self.population_size,
            mutation_rate: self.mutation_rate,
            ..SearchParams::default()
        }
    }

    fn experiment_config(&self) -> ExperimentConfig {
        // The enumerator is deterministic, so repeated runs would be
        // identical; one run suffices.
        let runs = if self.search == SearchKind::BruteForce {
            1
        } else {
            self.runs
        };
        ExperimentConfig {
            kind: self.search,
            runs,
            base_seed: self.seed,
            params: self.params(),
            verbose: !self.quiet,
        }
    }
}

/// Parses the CLI and dispatches the selected command.
///
/// Returns an error for invalid input, unreadable or malformed instances;
/// the caller reports it and exits non-zero.
pub(crate) fn run() -> Result<(), CliError> {
    let cli = Cli::parse();

    if let Some(path) = cli.path.clone() {
        if cli.command.is_none() {
            return run_on_file(&path, &cli.common);
        }
    }

    match cli.command {
        Some(Commands::File { path, common }) => run_on_file(&path, &common),
        Some(Commands::Suite { dir, common }) => run_suite(&dir, &common),
        Some(Commands::Pick { common }) => {
            let path = pick_instance(&mut io::stdin().lock())?;
            run_on_file(Path::new(path), &common)
        }
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "maxsat_solver",
                &mut io::stdout(),
            );
            Ok(())
        }
        None => {
            // Reached only if neither a global path nor a subcommand was given.
            let _ = Cli::command().print_help();
            Ok(())
        }
    }
}

/// Prints the instance menu and resolves the user's numeric choice.
fn pick_instance<R: BufRead>(input: &mut R) -> Result<&'static str, CliError> {
    println!("Select a MAXSAT instance to run:");
    for (i, name) in BUNDLED_INSTANCES.iter().enumerate() {
        println!("{}) {name}", i + 1);
    }
    print!("Enter the number of the instance (1/2/3): ");
    io::stdout().flush()?;

    let mut choice = String::new();
    input.read_line(&mut choice)?;
    match choice.trim() {
        "1" => Ok(BUNDLED_INSTANCES[0]),
        "2" => Ok(BUNDLED_INSTANCES[1]),
        "3" => Ok(BUNDLED_INSTANCES[2]),
        other => Err(InputError::BadSelection(other.to_string()).into()),
    }
}

/// Loads one instance, runs the experiment, and reports.
fn run_on_file(path: &Path, common: &CommonOptions) -> Result<(), CliError> {
    let parse_start = std::time::Instant::now();
    let formula = parse_file(path)?;
    let parse_time = parse_start.elapsed();

    if common.search == SearchKind::BruteForce && formula.num_vars > BruteForce::MAX_VARS {
        return Err(InputError::BruteForceTooLarge {
            num_vars: formula.num_vars,
            max: BruteForce::MAX_VARS,
        }
        .into());
    }

    println!("Solving: {}", path.display());
    let config = common.experiment_config();
    if config.kind == SearchKind::BruteForce {
        report_exhaustive(parse_time, &formula, &config, common);
        return Ok(());
    }
    let summary = run_experiment(&formula, &config);

    if common.stats {
        print_summary(parse_time, &formula, &config, &summary);
    }
    if common.print_solution {
        print_assignment(&summary.best.best);
    }
    Ok(())
}

/// Brute force bypasses the run loop: a single enumeration yields the
/// maximum, every assignment attaining it, and the exact examined count.
fn exhaustive_summary(
    formula: &Formula,
    config: &ExperimentConfig,
) -> (Enumeration, ExperimentSummary) {
    let start = Instant::now();
    let enumeration = BruteForce::new(formula.clone(), config.params.clone()).enumerate();
    let time = start.elapsed();

    let best = SearchOutcome {
        best: enumeration.maximizers[0].clone(),
        best_fitness: enumeration.best_fitness,
        evaluations: enumeration.examined,
        fully_satisfied: enumeration.best_fitness == formula.max_fitness(),
    };
    let records = vec![RunRecord {
        fitness: enumeration.best_fitness,
        evaluations: enumeration.examined,
        time,
        fully_satisfied: best.fully_satisfied,
    }];
    (enumeration, ExperimentSummary { records, best })
}

/// Runs the exhaustive enumeration and reports the maximizer census.
fn report_exhaustive(
    parse_time: Duration,
    formula: &Formula,
    config: &ExperimentConfig,
    common: &CommonOptions,
) {
    let (enumeration, summary) = exhaustive_summary(formula, config);
    if config.verbose {
        println!(
            "Run 1: {}/{} clauses, {} evaluations, {:.4}s",
            enumeration.best_fitness,
            formula.max_fitness(),
            enumeration.examined,
            summary.records[0].time.as_secs_f64()
        );
    }
    println!(
        "Assignments attaining the maximum: {}",
        enumeration.count()
    );
    if common.stats {
        print_summary(parse_time, formula, config, &summary);
    }
    if common.print_solution {
        for maximizer in &enumeration.maximizers {
            print_assignment(maximizer);
        }
    }
}

/// Runs the experiment on every `.cnf` file under `dir`, one summary each.
fn run_suite(dir: &Path, common: &CommonOptions) -> Result<(), CliError> {
    let mut instances: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| {
            entry.file_type().is_file()
                && entry.path().extension().is_some_and(|ext| ext == "cnf")
        })
        .map(|entry| entry.into_path())
        .collect();
    instances.sort();

    if instances.is_empty() {
        return Err(InputError::EmptySuite(dir.to_path_buf()).into());
    }
    for path in instances {
        run_on_file(&path, common)?;
        println!();
    }
    Ok(())
}

/// Helper to print a single statistic line in a formatted table row.
fn stat_line(label: &str, value: impl std::fmt::Display) {
    println!("|  {label:<28} {value:>18}  |");
}

/// Prints the aggregate statistics table for one experiment.
fn print_summary(
    parse_time: Duration,
    formula: &Formula,
    config: &ExperimentConfig,
    summary: &ExperimentSummary,
) {
    // Advance the jemalloc epoch so the counters reflect the search phase.
    let (allocated_mib, resident_mib) = memory_mib();

    println!("\n======================[ Problem Statistics ]=======================");
    stat_line("Parse time (s)", format!("{:.3}", parse_time.as_secs_f64()));
    stat_line("Variables", formula.num_vars);
    stat_line("Clauses", formula.clauses.len());
    stat_line("Literals", formula.num_literals());

    println!("======================[ Search Statistics ]========================");
    stat_line("Heuristic", config.kind);
    stat_line("Runs", config.runs);
    stat_line("Avg time (s)", format!("{:.4}", summary.avg_time_secs()));
    stat_line("Avg fitness", format!("{:.2}", summary.avg_fitness()));
    stat_line(
        "Max fitness",
        format!("{}/{}", summary.max_fitness(), formula.max_fitness()),
    );
    stat_line("Avg evaluations", format!("{:.0}", summary.avg_evaluations()));
    stat_line(
        "Satisfied runs",
        format!("{}/{}", summary.satisfied_runs(), config.runs),
    );
    stat_line("Memory usage (MiB)", format!("{allocated_mib:.2}"));
    stat_line("Resident memory (MiB)", format!("{resident_mib:.2}"));
    println!("===================================================================");

    if summary.satisfied_runs() > 0 {
        println!("\nALL CLAUSES SATISFIED");
    } else {
        println!(
            "\nBEST FOUND: {}/{} clauses",
            summary.max_fitness(),
            formula.max_fitness()
        );
    }
}

/// Reads jemalloc's allocated/resident counters, in MiB.
fn memory_mib() -> (f64, f64) {
    let advanced = epoch::advance().is_ok();
    let read = |bytes: Option<usize>| bytes.map_or(0.0, |b| b as f64 / (1024.0 * 1024.0));
    if !advanced {
        return (0.0, 0.0);
    }
    (
        read(stats::allocated::mib().and_then(|m| m.read()).ok()),
        read(stats::resident::mib().and_then(|m| m.read()).ok()),
    )
}

/// Prints an assignment as a DIMACS-style value line.
fn print_assignment(assignment: &Assignment) {
    print!("v");
    for (i, value) in assignment.iter().enumerate() {
        let var = i as i64 + 1;
        print!(" {}", if value { var } else { -var });
    }
    println!(" 0");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_instance_accepts_valid_choice() {
        let mut input = io::Cursor::new("2\n");
        assert_eq!(pick_instance(&mut input).unwrap(), BUNDLED_INSTANCES[1]);
    }

    #[test]
    fn test_pick_instance_trims_whitespace() {
        let mut input = io::Cursor::new("  3 \n");
        assert_eq!(pick_instance(&mut input).unwrap(), BUNDLED_INSTANCES[2]);
    }

    #[test]
    fn test_pick_instance_rejects_invalid_choice() {
        let mut input = io::Cursor::new("4\n");
        let err = pick_instance(&mut input).unwrap_err();
        assert!(matches!(
            err,
            CliError::Input(InputError::BadSelection(choice)) if choice == "4"
        ));
    }

    #[test]
    fn test_default_budget_follows_heuristic() {
        let cli = Cli::parse_from(["maxsat_solver", "file", "--path", "x.cnf", "--search", "genetic"]);
        let Some(Commands::File { common, .. }) = cli.command else {
            panic!("expected file subcommand");
        };
        assert_eq!(common.params().max_evaluations, 1_000);
    }

    #[test]
    fn test_brute_force_collapses_to_one_run() {
        let cli = Cli::parse_from(["maxsat_solver", "file", "--path", "x.cnf", "--search", "brute-force"]);
        let Some(Commands::File { common, .. }) = cli.command else {
            panic!("expected file subcommand");
        };
        assert_eq!(common.experiment_config().runs, 1);
    }

    #[test]
    fn test_zero_runs_is_rejected_at_parse_time() {
        let result =
            Cli::try_parse_from(["maxsat_solver", "file", "--path", "x.cnf", "--runs", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_exhaustive_summary_carries_full_census() {
        let formula = maxsat_solver::maxsat::dimacs::parse_dimacs(
            "p cnf 3 1\n1 -2 3 0\n".as_bytes(),
        )
        .unwrap();
        let config = ExperimentConfig {
            kind: SearchKind::BruteForce,
            runs: 1,
            ..ExperimentConfig::default()
        };
        let (enumeration, summary) = exhaustive_summary(&formula, &config);
        assert_eq!(enumeration.count(), 7);
        assert_eq!(summary.records.len(), 1);
        assert_eq!(summary.best.evaluations, 8);
        assert_eq!(summary.max_fitness(), 1);
        assert!(summary.best.fully_satisfied);
    }

    #[test]
    fn test_cli_parses_heuristic_names() {
        for kind in SearchKind::ALL {
            let name = kind.to_string();
            let cli = Cli::parse_from(["maxsat_solver", "pick", "--search", &name]);
            let Some(Commands::Pick { common }) = cli.command else {
                panic!("expected pick subcommand");
            };
            assert_eq!(common.search, kind);
        }
    }
}
