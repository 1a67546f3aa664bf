//! A great category: five pets for three houses, so two pets stay
//! unhoused in every solution.

pub const SOURCE: &str = "\
[categories]
color: red, green, blue
*pet: dog, cat, fish, bird, snake

[clues]
red in (#1, #2)
";

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::examples::solve_source;

    #[test]
    fn surplus_pets_stay_unassigned() {
        let report = solve_source(SOURCE, 2000).unwrap();
        assert!(report.done);
        // Colors: red in house 1 or 2 and the other two permute, 2 * 2.
        // Pets: any ordered choice of three of the five, 5 * 4 * 3.
        assert_eq!(report.solutions.len(), 4 * 60);

        for m in &report.solutions {
            let table = m.table().clone();
            let red = m.row(table.lookup_key("color.red").unwrap());
            let red_position = red.as_singleton().unwrap();
            assert!(red_position <= 1);

            // Exactly three pets are housed, each in its own column; the
            // other two rows are empty.
            let pets = table.category_index("pet").unwrap();
            let housed: Vec<_> = table
                .rows_of(pets)
                .filter(|&row| !m.row(row).is_empty())
                .collect();
            assert_eq!(housed.len(), 3);
            for &row in &housed {
                assert_eq!(m.row(row).len(), 1);
            }
        }
    }

    #[test]
    fn the_zbc_fixture_houses_dog_left_of_cat() {
        let source = std::fs::read_to_string(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/puzzles/unhoused_pets.zbc"
        ))
        .unwrap();
        let report = solve_source(&source, 2000).unwrap();
        assert!(report.done);
        assert!(!report.solutions.is_empty());

        for m in &report.solutions {
            let table = m.table().clone();
            let red = m
                .row(table.lookup_key("color.red").unwrap())
                .as_singleton()
                .unwrap();
            assert!(red <= 1);

            // The ordering clue binds only when both pets are housed; an
            // unhoused dog or cat satisfies it vacuously.
            let dog = m.row(table.lookup_key("pet.dog").unwrap()).as_singleton();
            let cat = m.row(table.lookup_key("pet.cat").unwrap()).as_singleton();
            if let (Some(dog), Some(cat)) = (dog, cat) {
                assert!(dog < cat);
            }
        }
    }
}
