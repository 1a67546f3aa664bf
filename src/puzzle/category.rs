//! Category definitions: the ordered item groups a puzzle assigns to
//! positions.
//!
//! A **strict** category has exactly as many items as there are positions
//! and covers them bijectively. A **great** category may carry surplus
//! items; each item occupies at most one position and some items stay
//! unassigned. At least one category must be strict; the strict length
//! defines the position count.

use crate::error::{Result, SolverError};

/// The name of the synthetic position category. Its items are `"1"..="N"`
/// and row `#.i` is pinned to column `i - 1`.
pub const POSITION_CATEGORY: &str = "#";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub items: Vec<String>,
    pub strict: bool,
}

impl Category {
    pub fn strict(name: impl Into<String>, items: Vec<String>) -> Self {
        Self {
            name: name.into(),
            items,
            strict: true,
        }
    }

    pub fn great(name: impl Into<String>, items: Vec<String>) -> Self {
        Self {
            name: name.into(),
            items,
            strict: false,
        }
    }
}

/// The ordered category table of one puzzle. Iteration order is the
/// declaration order and fixes every tie-break in the solver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Categories {
    cats: Vec<Category>,
}

impl Categories {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, category: Category) -> Result<()> {
        if self.cats.iter().any(|c| c.name == category.name)
            || category.name == POSITION_CATEGORY
        {
            return Err(SolverError::DuplicateCategory(category.name).into());
        }
        let mut seen = std::collections::HashSet::new();
        for item in &category.items {
            if !seen.insert(item.as_str()) {
                return Err(SolverError::DuplicateItem {
                    category: category.name,
                    item: item.clone(),
                }
                .into());
            }
        }
        self.cats.push(category);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.cats.iter()
    }

    pub fn len(&self) -> usize {
        self.cats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cats.is_empty()
    }

    /// Validates the table and returns the position count N.
    ///
    /// N is the length of any strict category; all strict categories must
    /// agree on it, great categories must reach it, and it must fit the
    /// dense 64-bit row representation.
    pub fn validate(&self) -> Result<usize> {
        if self.cats.is_empty() {
            return Err(SolverError::NoCategories.into());
        }
        let mut positions: Option<usize> = None;
        for cat in &self.cats {
            if !cat.strict {
                continue;
            }
            match positions {
                None => positions = Some(cat.items.len()),
                Some(n) if n != cat.items.len() => {
                    return Err(SolverError::MismatchedCategorySize(n, cat.items.len()).into());
                }
                Some(_) => {}
            }
        }
        let Some(positions) = positions else {
            return Err(SolverError::NoStrictCategories.into());
        };
        if positions > 64 {
            return Err(SolverError::TooManyPositions(positions).into());
        }
        for cat in &self.cats {
            if !cat.strict && cat.items.len() < positions {
                return Err(SolverError::GreatCategoryTooSmall {
                    name: cat.name.clone(),
                    found: cat.items.len(),
                    needed: positions,
                }
                .into());
            }
        }
        Ok(positions)
    }
}

impl From<Vec<Category>> for Categories {
    fn from(cats: Vec<Category>) -> Self {
        Self { cats }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::SolverError;

    fn items(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn validate_returns_strict_length() {
        let mut cats = Categories::new();
        cats.push(Category::strict("color", items(&["red", "green", "blue"])))
            .unwrap();
        cats.push(Category::great("pet", items(&["dog", "cat", "fish", "bird"])))
            .unwrap();
        assert_eq!(cats.validate().unwrap(), 3);
    }

    #[test]
    fn validate_rejects_empty_table() {
        let cats = Categories::new();
        assert!(matches!(
            cats.validate().unwrap_err().inner(),
            SolverError::NoCategories
        ));
    }

    #[test]
    fn validate_rejects_great_only_table() {
        let mut cats = Categories::new();
        cats.push(Category::great("pet", items(&["dog", "cat"]))).unwrap();
        assert!(matches!(
            cats.validate().unwrap_err().inner(),
            SolverError::NoStrictCategories
        ));
    }

    #[test]
    fn validate_rejects_mismatched_strict_sizes() {
        let mut cats = Categories::new();
        cats.push(Category::strict("color", items(&["red", "green"]))).unwrap();
        cats.push(Category::strict("name", items(&["ana", "bo", "cy"]))).unwrap();
        assert!(matches!(
            cats.validate().unwrap_err().inner(),
            SolverError::MismatchedCategorySize(2, 3)
        ));
    }

    #[test]
    fn validate_rejects_short_great_category() {
        let mut cats = Categories::new();
        cats.push(Category::strict("color", items(&["red", "green", "blue"])))
            .unwrap();
        cats.push(Category::great("pet", items(&["dog", "cat"]))).unwrap();
        assert!(matches!(
            cats.validate().unwrap_err().inner(),
            SolverError::GreatCategoryTooSmall { .. }
        ));
    }

    #[test]
    fn push_rejects_duplicates() {
        let mut cats = Categories::new();
        cats.push(Category::strict("color", items(&["red", "green"]))).unwrap();
        assert!(matches!(
            cats.push(Category::strict("color", items(&["a", "b"])))
                .unwrap_err()
                .inner(),
            SolverError::DuplicateCategory(_)
        ));
        assert!(matches!(
            cats.push(Category::strict("name", items(&["ana", "ana"])))
                .unwrap_err()
                .inner(),
            SolverError::DuplicateItem { .. }
        ));
    }
}
