//! The subset elimination engine.
//!
//! The generalised naked-subset rule, run inside each category: for a set
//! S of k positions, if at most k rows of the category can enter S, those
//! rows are reserved for S: every position needs one item from every
//! category, so the scarce candidates must cover S and their cells outside
//! S are cleared. With k = 1 this is the familiar "only candidate" rule;
//! the complement view recovers the classic naked pair/triple.
//!
//! The candidate-scarcity threshold makes the rule sound for great
//! categories too: surplus items never enter the count of rows a position
//! set can draw from.

use crate::solver::combinations::Combinations;
use crate::solver::matrix::{Matrix, RowId};

/// One elimination sweep over every category. Returns whether anything
/// changed; run again after further propagation rather than in a loop here.
pub fn eliminate(m: &mut Matrix, combos: &Combinations) -> bool {
    let table = m.table().clone();
    let n = table.positions();
    let mut changed = false;
    let mut members: Vec<RowId> = Vec::with_capacity(n);

    for cat in 0..table.category_count() {
        if cat == table.position_category() {
            continue;
        }
        for k in 1..n {
            for &subset in combos.of_size(k) {
                members.clear();
                members.extend(
                    table
                        .rows_of(cat)
                        .filter(|&row| !m.row(row).intersect(subset).is_empty()),
                );
                if members.len() <= k {
                    for &row in &members {
                        changed |= m.restrict(row, subset);
                    }
                }
            }
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::puzzle::category::{Categories, Category};
    use crate::solver::matrix::{Matrix, PositionSet, RowTable};

    fn setup(cats: Categories) -> (Matrix, Combinations) {
        let table = Arc::new(RowTable::build(cats).unwrap());
        let combos = Combinations::for_positions(table.positions());
        (Matrix::new(table), combos)
    }

    fn strict_colors() -> Categories {
        let mut cats = Categories::new();
        cats.push(Category::strict(
            "color",
            vec!["red".into(), "green".into(), "blue".into()],
        ))
        .unwrap();
        cats
    }

    fn row(m: &Matrix, key: &str) -> PositionSet {
        m.row(m.table().lookup_key(key).unwrap())
    }

    #[test]
    fn sole_candidate_of_a_column_is_pinned_there() {
        let (mut m, combos) = setup(strict_colors());
        let table = m.table().clone();
        m.restrict(table.lookup_key("color.green").unwrap(), PositionSet::from_mask(0b110));
        m.restrict(table.lookup_key("color.blue").unwrap(), PositionSet::from_mask(0b110));

        assert!(eliminate(&mut m, &combos));
        assert_eq!(row(&m, "color.red"), PositionSet::singleton(0));
    }

    #[test]
    fn naked_pair_evicts_the_third_row() {
        let (mut m, combos) = setup(strict_colors());
        let table = m.table().clone();
        m.restrict(table.lookup_key("color.red").unwrap(), PositionSet::from_mask(0b011));
        m.restrict(table.lookup_key("color.green").unwrap(), PositionSet::from_mask(0b011));

        assert!(eliminate(&mut m, &combos));
        // Columns 0 and 1 are reserved for red and green, so blue is the
        // only row left that can enter column 2.
        assert_eq!(row(&m, "color.blue"), PositionSet::singleton(2));
    }

    #[test]
    fn quiescent_matrices_are_left_alone() {
        let (mut m, combos) = setup(strict_colors());
        assert!(!eliminate(&mut m, &combos));
    }

    #[test]
    fn surplus_great_rows_are_never_confined() {
        let mut cats = strict_colors();
        cats.push(Category::great(
            "pet",
            vec!["dog".into(), "cat".into(), "fish".into(), "bird".into()],
        ))
        .unwrap();
        let (mut m, combos) = setup(cats);
        let table = m.table().clone();
        // dog and cat avoid the last column; fish and bird can both still
        // cover it, so neither may be pinned; one of them can end up
        // unassigned.
        m.restrict(table.lookup_key("pet.dog").unwrap(), PositionSet::from_mask(0b011));
        m.restrict(table.lookup_key("pet.cat").unwrap(), PositionSet::from_mask(0b011));

        assert!(!eliminate(&mut m, &combos));
        assert_eq!(row(&m, "pet.fish"), PositionSet::full(3));
        assert_eq!(row(&m, "pet.bird"), PositionSet::full(3));
    }

    #[test]
    fn a_great_row_alone_on_a_column_is_pinned() {
        let mut cats = Categories::new();
        cats.push(Category::strict("color", vec!["red".into(), "green".into()]))
            .unwrap();
        cats.push(Category::great(
            "pet",
            vec!["dog".into(), "cat".into(), "fish".into()],
        ))
        .unwrap();
        let (mut m, combos) = setup(cats);
        let table = m.table().clone();
        m.restrict(table.lookup_key("pet.cat").unwrap(), PositionSet::singleton(0));
        m.restrict(table.lookup_key("pet.fish").unwrap(), PositionSet::singleton(0));

        assert!(eliminate(&mut m, &combos));
        // Only dog can still cover column 1.
        assert_eq!(row(&m, "pet.dog"), PositionSet::singleton(1));
    }
}
