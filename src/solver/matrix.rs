//! The boolean possibility matrix.
//!
//! Every `category.item` row (plus one pinned row per position for the
//! synthetic `#` category) holds one bit per position: bit `p` set means
//! "this item may still occupy position `p`". All mutation is monotone:
//! bits only ever flip from set to clear, so a branch can never resurrect
//! a possibility its parent ruled out.
//!
//! Rows are addressed by integer [`RowId`]s assigned once at table
//! construction; the textual `category.item` keys only matter at the
//! resolution boundary. Cloning a matrix copies one `Vec<PositionSet>`,
//! which keeps branch forks and disjunction case-splits cheap.

use std::collections::HashMap;
use std::ops::Range;
use std::sync::Arc;

use crate::error::Result;
use crate::puzzle::category::{Categories, Category, POSITION_CATEGORY};

/// A numeric identifier for a single row of the matrix.
pub type RowId = usize;

/// A set of positions, stored as the low N bits of a word.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PositionSet(u64);

impl PositionSet {
    pub const EMPTY: PositionSet = PositionSet(0);

    pub fn from_mask(mask: u64) -> Self {
        PositionSet(mask)
    }

    /// All positions `0..n`.
    pub fn full(n: usize) -> Self {
        debug_assert!(n <= 64);
        if n == 64 {
            PositionSet(u64::MAX)
        } else {
            PositionSet((1u64 << n) - 1)
        }
    }

    pub fn singleton(p: usize) -> Self {
        PositionSet(1u64 << p)
    }

    pub fn contains(self, p: usize) -> bool {
        p < 64 && self.0 & (1u64 << p) != 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The single remaining position, if exactly one bit is set.
    pub fn as_singleton(self) -> Option<usize> {
        if self.0.count_ones() == 1 {
            Some(self.0.trailing_zeros() as usize)
        } else {
            None
        }
    }

    pub fn first(self) -> Option<usize> {
        if self.0 == 0 {
            None
        } else {
            Some(self.0.trailing_zeros() as usize)
        }
    }

    pub fn last(self) -> Option<usize> {
        if self.0 == 0 {
            None
        } else {
            Some(63 - self.0.leading_zeros() as usize)
        }
    }

    pub fn remove(&mut self, p: usize) -> bool {
        let before = self.0;
        self.0 &= !(1u64 << p);
        self.0 != before
    }

    pub fn intersect(self, other: PositionSet) -> PositionSet {
        PositionSet(self.0 & other.0)
    }

    pub fn union(self, other: PositionSet) -> PositionSet {
        PositionSet(self.0 | other.0)
    }

    /// Positions strictly below `p`.
    pub fn below(p: usize) -> PositionSet {
        PositionSet::full(p)
    }

    /// Positions strictly above `p`, clipped to `0..n`.
    pub fn above(p: usize, n: usize) -> PositionSet {
        PositionSet(PositionSet::full(n).0 & !PositionSet::full(p + 1).0)
    }

    /// Each member shifted down by `k` (position `p + k` maps to `p`).
    pub fn shifted_down(self, k: usize) -> PositionSet {
        if k >= 64 {
            PositionSet::EMPTY
        } else {
            PositionSet(self.0 >> k)
        }
    }

    /// Each member shifted up by `k`, clipped to `0..n`.
    pub fn shifted_up(self, k: usize, n: usize) -> PositionSet {
        if k >= 64 {
            PositionSet::EMPTY
        } else {
            PositionSet((self.0 << k) & PositionSet::full(n).0)
        }
    }

    pub fn iter(self) -> impl Iterator<Item = usize> {
        let mut bits = self.0;
        std::iter::from_fn(move || {
            if bits == 0 {
                None
            } else {
                let p = bits.trailing_zeros() as usize;
                bits &= bits - 1;
                Some(p)
            }
        })
    }
}

impl std::fmt::Debug for PositionSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[derive(Debug)]
pub struct RowInfo {
    /// The fully-qualified `category.item` key.
    pub key: String,
    /// Index into the category table.
    pub category: usize,
    /// Index of the item within its category.
    pub item: usize,
    /// The item name parsed as an integer, when it is one.
    pub numeric: Option<i64>,
}

/// The immutable shape of one puzzle: categories, rows and name tables.
/// Shared read-only across every branch of the search.
#[derive(Debug)]
pub struct RowTable {
    categories: Vec<Category>,
    positions: usize,
    rows: Vec<RowInfo>,
    by_key: HashMap<String, RowId>,
    short_names: HashMap<String, RowId>,
    category_rows: Vec<Range<RowId>>,
    position_category: usize,
}

impl RowTable {
    /// Validates the category table and lays out the rows: user categories
    /// in declaration order, then the synthetic `#` position category.
    ///
    /// Item names that are unambiguous across user categories enter the
    /// short-name table; colliding names must be written `category.item`.
    pub fn build(categories: Categories) -> Result<RowTable> {
        let positions = categories.validate()?;

        let mut cats: Vec<Category> = categories.iter().cloned().collect();
        let position_category = cats.len();
        cats.push(Category::strict(
            POSITION_CATEGORY,
            (1..=positions).map(|i| i.to_string()).collect(),
        ));

        let mut rows = Vec::new();
        let mut by_key = HashMap::new();
        let mut category_rows = Vec::with_capacity(cats.len());
        let mut name_uses: HashMap<&str, usize> = HashMap::new();

        for (ci, cat) in cats.iter().enumerate() {
            let start = rows.len();
            for (ii, item) in cat.items.iter().enumerate() {
                let key = format!("{}.{}", cat.name, item);
                by_key.insert(key.clone(), rows.len());
                rows.push(RowInfo {
                    key,
                    category: ci,
                    item: ii,
                    numeric: item.parse().ok(),
                });
                if ci != position_category {
                    *name_uses.entry(item.as_str()).or_default() += 1;
                }
            }
            category_rows.push(start..rows.len());
        }

        let mut short_names = HashMap::new();
        for (id, row) in rows.iter().enumerate() {
            if row.category == position_category {
                continue;
            }
            let item = &cats[row.category].items[row.item];
            if name_uses.get(item.as_str()) == Some(&1) {
                short_names.insert(item.clone(), id);
            }
        }

        Ok(RowTable {
            categories: cats,
            positions,
            rows,
            by_key,
            short_names,
            category_rows,
            position_category,
        })
    }

    /// The position count N.
    pub fn positions(&self) -> usize {
        self.positions
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, id: RowId) -> &RowInfo {
        &self.rows[id]
    }

    /// Categories in iteration order; the `#` category comes last.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, index: usize) -> &Category {
        &self.categories[index]
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    /// Index of the synthetic `#` category.
    pub fn position_category(&self) -> usize {
        self.position_category
    }

    /// The rows belonging to one category, in item order.
    pub fn rows_of(&self, category: usize) -> Range<RowId> {
        self.category_rows[category].clone()
    }

    pub fn category_index(&self, name: &str) -> Option<usize> {
        self.categories.iter().position(|c| c.name == name)
    }

    pub fn lookup_key(&self, key: &str) -> Option<RowId> {
        self.by_key.get(key).copied()
    }

    pub fn lookup_short_name(&self, name: &str) -> Option<RowId> {
        self.short_names.get(name).copied()
    }

    /// The pinned row for 1-based position `d`.
    pub fn position_row(&self, d: usize) -> Option<RowId> {
        if d >= 1 && d <= self.positions {
            Some(self.category_rows[self.position_category].start + d - 1)
        } else {
            None
        }
    }

    /// The item name of a row.
    pub fn item_name(&self, id: RowId) -> &str {
        let info = &self.rows[id];
        &self.categories[info.category].items[info.item]
    }
}

/// One branch's possibility grid.
#[derive(Debug, Clone)]
pub struct Matrix {
    table: Arc<RowTable>,
    rows: Vec<PositionSet>,
}

impl Matrix {
    /// A fresh matrix: every user row may occupy every position, each `#`
    /// row is pinned to its own column.
    pub fn new(table: Arc<RowTable>) -> Matrix {
        let n = table.positions();
        let rows = (0..table.row_count())
            .map(|id| {
                let info = table.row(id);
                if info.category == table.position_category() {
                    PositionSet::singleton(info.item)
                } else {
                    PositionSet::full(n)
                }
            })
            .collect();
        Matrix { table, rows }
    }

    pub fn table(&self) -> &Arc<RowTable> {
        &self.table
    }

    pub fn positions(&self) -> usize {
        self.table.positions()
    }

    pub fn row(&self, id: RowId) -> PositionSet {
        self.rows[id]
    }

    pub fn possible(&self, id: RowId, p: usize) -> bool {
        self.rows[id].contains(p)
    }

    /// Intersects a row with `keep`. Returns whether anything changed.
    /// This is the only mutation primitive, so narrowing stays monotone.
    pub fn restrict(&mut self, id: RowId, keep: PositionSet) -> bool {
        let narrowed = self.rows[id].intersect(keep);
        let changed = narrowed != self.rows[id];
        self.rows[id] = narrowed;
        changed
    }

    pub fn clear(&mut self, id: RowId, p: usize) -> bool {
        self.rows[id].remove(p)
    }

    /// Rows of `category` that may still occupy position `p`.
    pub fn candidates(&self, category: usize, p: usize) -> impl Iterator<Item = RowId> + '_ {
        self.table
            .rows_of(category)
            .filter(move |&id| self.rows[id].contains(p))
    }

    pub fn candidate_count(&self, category: usize, p: usize) -> usize {
        self.candidates(category, p).count()
    }

    /// A copy of the raw rows, for change detection across a sweep.
    pub fn snapshot(&self) -> Vec<PositionSet> {
        self.rows.clone()
    }

    pub fn rows(&self) -> &[PositionSet] {
        &self.rows
    }
}

impl PartialEq for Matrix {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows
    }
}

impl Eq for Matrix {}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::puzzle::category::{Categories, Category};

    fn table() -> Arc<RowTable> {
        let mut cats = Categories::new();
        cats.push(Category::strict(
            "color",
            vec!["red".into(), "green".into(), "blue".into()],
        ))
        .unwrap();
        cats.push(Category::great(
            "age",
            vec!["10".into(), "20".into(), "30".into(), "40".into()],
        ))
        .unwrap();
        Arc::new(RowTable::build(cats).unwrap())
    }

    #[test]
    fn position_set_basics() {
        let full = PositionSet::full(3);
        assert_eq!(full.len(), 3);
        assert_eq!(full.iter().collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(full.as_singleton(), None);
        assert_eq!(PositionSet::singleton(2).as_singleton(), Some(2));
        assert_eq!(PositionSet::below(2).iter().collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(PositionSet::above(0, 3).iter().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(
            PositionSet::singleton(2).shifted_down(1),
            PositionSet::singleton(1)
        );
        assert_eq!(
            PositionSet::singleton(2).shifted_up(1, 3),
            PositionSet::EMPTY
        );
    }

    #[test]
    fn table_lays_out_rows_and_names() {
        let table = table();
        assert_eq!(table.positions(), 3);
        // 3 colors + 4 ages + 3 position rows.
        assert_eq!(table.row_count(), 10);
        assert_eq!(table.lookup_key("color.red"), Some(0));
        assert_eq!(table.lookup_short_name("red"), Some(0));
        assert_eq!(table.lookup_key("age.20"), Some(4));
        assert_eq!(table.position_row(1), Some(7));
        assert_eq!(table.position_row(4), None);
        assert_eq!(table.row(4).numeric, Some(20));
        assert_eq!(table.row(0).numeric, None);
    }

    #[test]
    fn fresh_matrix_pins_position_rows() {
        let table = table();
        let m = Matrix::new(table.clone());
        assert_eq!(m.row(0), PositionSet::full(3));
        let first = table.position_row(1).unwrap();
        assert_eq!(m.row(first), PositionSet::singleton(0));
    }

    #[test]
    fn restrict_is_monotone() {
        let table = table();
        let mut m = Matrix::new(table);
        assert!(m.restrict(0, PositionSet::singleton(1)));
        // Widening back is impossible: intersecting with a superset is a no-op.
        assert!(!m.restrict(0, PositionSet::full(3)));
        assert_eq!(m.row(0), PositionSet::singleton(1));
        assert!(m.possible(0, 1));
        assert!(!m.possible(0, 0));
        assert_eq!(m.candidate_count(0, 1), 3);
        assert_eq!(m.candidate_count(0, 0), 2);
    }
}
