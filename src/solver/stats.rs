use std::collections::HashMap;

use prettytable::{Cell, Row, Table};

use crate::puzzle::ast::Expr;

/// Holds performance counters for a single clue.
#[derive(Debug, Default, Clone, Copy)]
pub struct PerClueStats {
    /// How many times the propagator visited this clue.
    pub revisions: u64,
    /// How many visits actually narrowed the matrix.
    pub prunings: u64,
    /// Total time spent propagating this clue, in microseconds.
    pub time_spent_micros: u64,
}

/// Counters for one `solve` call.
#[derive(Debug, Default)]
pub struct SearchStats {
    /// States consumed from the work stack.
    pub iterations: u64,
    /// Child states pushed by branching.
    pub options: u64,
    /// Branches rejected for structural reasons (empty row, bare column).
    pub dead_ends: u64,
    /// Branches rejected because a clue checked definitely false.
    pub refuted: u64,
    /// A map from clue index to the counters for that clue.
    pub clue_stats: HashMap<usize, PerClueStats>,
}

pub fn render_stats_table(stats: &SearchStats, clues: &[Expr]) -> String {
    let mut table = Table::new();
    table.add_row(Row::new(vec![
        Cell::new("Clue"),
        Cell::new("Revisions"),
        Cell::new("Prunings"),
        Cell::new("Time / Call (µs)"),
        Cell::new("Total Time (ms)"),
    ]));

    let mut sorted_stats: Vec<(&usize, &PerClueStats)> = stats.clue_stats.iter().collect();
    sorted_stats.sort_by_key(|(index, _)| **index);

    for (index, clue_stats) in sorted_stats {
        let avg_time = if clue_stats.revisions > 0 {
            clue_stats.time_spent_micros as f64 / clue_stats.revisions as f64
        } else {
            0.0
        };

        table.add_row(Row::new(vec![
            Cell::new(&clues[*index].to_string()),
            Cell::new(&clue_stats.revisions.to_string()),
            Cell::new(&clue_stats.prunings.to_string()),
            Cell::new(&format!("{:.2}", avg_time)),
            Cell::new(&format!(
                "{:.2}",
                clue_stats.time_spent_micros as f64 / 1000.0
            )),
        ]));
    }

    table.to_string()
}
