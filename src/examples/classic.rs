//! The classic five-house riddle: five strict categories, fifteen clues,
//! one famous solution.

/// The riddle in ZBC form. `green - white` reads the original "the green
/// house is on the left of the white house" as immediately-left, the
/// reading under which the puzzle has a unique solution.
pub const SOURCE: &str = "\
[categories]
nationality: brit, swede, dane, norwegian, german
color: red, green, white, yellow, blue
drink: tea, coffee, milk, beer, water
smoke: pallmall, dunhill, blend, bluemaster, prince
pet: dogs, birds, cats, horses, fish

[clues]
brit = red
swede = dogs
dane = tea
green - white
green = coffee
pallmall = birds
yellow = dunhill
milk = #3
norwegian = #1
blend _ cats
horses _ dunhill
bluemaster = beer
german = prince
norwegian _ blue
blend _ water
";
