//! Identifier resolution.
//!
//! Maps a user-written symbol to a matrix row under a dynamic binding
//! `d` (the position the `$` placeholder currently stands for). The
//! lookup order is fixed: dynamic placeholder, position literal, short
//! item name, fully-qualified `category.item`.

use crate::error::{Result, SolverError};
use crate::puzzle::ast::Span;
use crate::solver::matrix::{RowId, RowTable};

pub fn resolve_symbol(
    table: &RowTable,
    symbol: &str,
    span: Span,
    binding: usize,
) -> Result<RowId> {
    if symbol == "$" {
        if let Some(id) = table.position_row(binding) {
            return Ok(id);
        }
    } else if let Some(stripped) = symbol.strip_prefix('#') {
        let digits = stripped.strip_prefix('.').unwrap_or(stripped);
        if let Some(id) = digits.parse().ok().and_then(|d: usize| table.position_row(d)) {
            return Ok(id);
        }
    } else if let Some(id) = table.lookup_short_name(symbol) {
        return Ok(id);
    } else if let Some(id) = table.lookup_key(symbol) {
        return Ok(id);
    }
    Err(SolverError::UnknownIdentifier {
        symbol: symbol.to_string(),
        line: span.line,
        column: span.column,
    }
    .into())
}
