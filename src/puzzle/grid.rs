use prettytable::{Cell, Row, Table};

use crate::solver::matrix::Matrix;

/// Renders a solved matrix as a grid: one row per category, one column
/// per position. Cells of a still-ambiguous matrix show `-`.
pub fn render_solution(m: &Matrix) -> String {
    let shape = m.table();
    let mut table = Table::new();

    let mut header = vec![Cell::new("")];
    for p in 1..=shape.positions() {
        header.push(Cell::new(&p.to_string()));
    }
    table.add_row(Row::new(header));

    for (ci, cat) in shape.categories().iter().enumerate() {
        if ci == shape.position_category() {
            continue;
        }
        let mut cells = vec![Cell::new(&cat.name)];
        for p in 0..shape.positions() {
            let item = match m.candidate_count(ci, p) {
                1 => {
                    let row = m.candidates(ci, p).next().expect("one candidate");
                    shape.item_name(row)
                }
                _ => "-",
            };
            cells.push(Cell::new(item));
        }
        table.add_row(Row::new(cells));
    }

    table.to_string()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::puzzle::parser::parse_source;
    use crate::solver::engine::SolverEngine;
    use crate::solver::matrix::RowTable;

    #[test]
    fn solved_grids_name_every_cell() {
        let parsed = parse_source(
            "\
[categories]
name: ana, bo
color: red, blue

[clues]
ana = #1
ana = red
",
        )
        .unwrap();
        let table = Arc::new(RowTable::build(parsed.categories).unwrap());
        let engine = SolverEngine::new(table, parsed.clues);
        let report = engine.solve(50, None).unwrap();
        assert_eq!(report.solutions.len(), 1);

        let grid = render_solution(&report.solutions[0]);
        for item in ["ana", "bo", "red", "blue", "name", "color"] {
            assert!(grid.contains(item), "missing `{item}` in:\n{grid}");
        }
    }
}
