//! Ready-made puzzles exercising the solver end to end, from ZBC source
//! through parsing, propagation and search.

pub mod ambiguous;
pub mod arithmetic;
pub mod classic;
pub mod great_category;

use std::sync::Arc;

use crate::error::Result;
use crate::puzzle::parser::parse_source;
use crate::solver::engine::{SolveReport, SolverEngine};
use crate::solver::matrix::RowTable;

/// Parses a ZBC source and runs the solver over it with the given
/// iteration budget.
pub fn solve_source(source: &str, budget: u64) -> Result<SolveReport> {
    let parsed = parse_source(source)?;
    let table = Arc::new(RowTable::build(parsed.categories)?);
    let engine = SolverEngine::new(table, parsed.clues);
    engine.solve(budget, None)
}
