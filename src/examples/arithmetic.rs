//! Arithmetic clues: a sum over two numeric identifiers, and the
//! `truths` operator counting how many of its member clues hold.

pub const SUM: &str = "\
[categories]
name: alice, bob, carol
age: 10, 20, 30

[clues]
alice:age + bob:age == 40
";

pub const ONE_TRUTH: &str = "\
[categories]
letter: a, b, c

[clues]
truths(a = #1, b = #2, c = #3) == 1
";

pub const TWO_TRUTHS: &str = "\
[categories]
letter: a, b, c, d

[clues]
truths(a = #1, b = #2, c = #3, d = #4) == 2
";

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::examples::solve_source;

    #[test]
    fn ages_of_alice_and_bob_sum_to_forty() {
        let report = solve_source(SUM, 500).unwrap();
        assert!(report.done);
        // Carol takes age 20: 3 positions for her, 2 arrangements of the
        // other names, 2 of the other ages.
        assert_eq!(report.solutions.len(), 12);

        for m in &report.solutions {
            let table = m.table().clone();
            let age_of = |name: &str| {
                let p = m
                    .row(table.lookup_key(name).unwrap())
                    .as_singleton()
                    .unwrap();
                let ages = table.category_index("age").unwrap();
                let row = m.candidates(ages, p).next().unwrap();
                table.row(row).numeric.unwrap()
            };
            assert_eq!(age_of("name.alice") + age_of("name.bob"), 40);
        }
    }

    #[test]
    fn exactly_one_letter_sits_on_its_own_number() {
        let report = solve_source(ONE_TRUTH, 500).unwrap();
        assert!(report.done);
        // Permutations of three elements with exactly one fixed point.
        assert_eq!(report.solutions.len(), 3);
    }

    #[test]
    fn exactly_two_letters_sit_on_their_own_numbers() {
        let report = solve_source(TWO_TRUTHS, 1000).unwrap();
        assert!(report.done);
        // Choose the two fixed points (6 ways); the remaining two letters
        // must swap.
        assert_eq!(report.solutions.len(), 6);
    }
}
