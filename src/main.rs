use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use zebra_solver::puzzle::grid::render_solution;
use zebra_solver::puzzle::parser::parse_source;
use zebra_solver::solver::engine::SolverEngine;
use zebra_solver::solver::matrix::RowTable;
use zebra_solver::solver::stats::render_stats_table;

/// Solve a zebra-style logic puzzle written in the ZBC format.
#[derive(Debug, Parser)]
#[command(name = "zebra-solver", version)]
struct Args {
    /// Path to the puzzle file.
    path: PathBuf,
    /// Iteration budget per solve round.
    #[arg(default_value_t = 50)]
    iterations: u64,
    /// Print per-clue propagation statistics after each round.
    #[arg(long)]
    stats: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let source = std::fs::read_to_string(&args.path)?;
    let parsed = parse_source(&source)?;
    let table = Arc::new(RowTable::build(parsed.categories)?);
    let engine = SolverEngine::new(table, parsed.clues);

    let mut budget = args.iterations;
    let mut resume = None;
    let mut found = 0usize;

    loop {
        let report = engine.solve(budget, resume)?;
        for solution in &report.solutions {
            println!("--- Solution ---");
            println!("{}", render_solution(solution));
        }
        found += report.solutions.len();
        if args.stats {
            println!("{}", render_stats_table(&report.stats, engine.clues()));
        }
        if report.done {
            println!("Search exhausted: {found} solution(s).");
            return Ok(());
        }

        print!("Enter new iteration count to continue or 'q' to quit: ");
        io::stdout().flush()?;
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(());
        }
        let answer = line.trim();
        if answer.eq_ignore_ascii_case("q") {
            return Ok(());
        }
        match answer.parse() {
            Ok(next) => budget = next,
            Err(_) => eprintln!("not a number, keeping a budget of {budget}"),
        }
        resume = Some(report.stack);
    }
}
