//! Under- and over-constrained puzzles: one clue that leaves many
//! arrangements open, and one pair of clues that admits none.

pub const UNDER_CONSTRAINED: &str = "\
[categories]
suspect: adams, baker, clark
weapon: rope, knife, pistol

[clues]
adams = rope
";

pub const CONTRADICTION: &str = "\
[categories]
suspect: adams, baker, clark
weapon: rope, knife, pistol

[clues]
adams = #1 & baker = #1
";
