//! Campus cafeterias and their identifiers on the KAIST website.

use std::fmt;

/// A campus dining hall whose menu can be looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cafeteria {
    /// East campus cafeteria, first floor
    East,
    /// East campus cafeteria, second floor
    East2,
    /// Hwaam dormitory cafeteria
    Hwaam,
    /// Munji campus cafeteria
    Munji,
    /// North campus (faculty) cafeteria
    North,
    /// N6 employee cafeteria, the primary one
    #[default]
    N6,
    /// West campus cafeteria
    West,
}

impl Cafeteria {
    /// Returns a slice containing all cafeteria variants.
    pub fn all() -> &'static [Cafeteria] {
        &[
            Cafeteria::East,
            Cafeteria::East2,
            Cafeteria::Hwaam,
            Cafeteria::Munji,
            Cafeteria::North,
            Cafeteria::N6,
            Cafeteria::West,
        ]
    }

    /// The short name users type, also used as the cache key.
    pub fn code(&self) -> &'static str {
        match self {
            Cafeteria::East => "east",
            Cafeteria::East2 => "east2",
            Cafeteria::Hwaam => "hwaam",
            Cafeteria::Munji => "munji",
            Cafeteria::North => "north",
            Cafeteria::N6 => "n6",
            Cafeteria::West => "west",
        }
    }

    /// The `dvs_cd` value the campus website expects.
    pub fn remote_code(&self) -> &'static str {
        match self {
            Cafeteria::East => "east1",
            Cafeteria::East2 => "east2",
            Cafeteria::Hwaam => "hawam",
            Cafeteria::Munji => "icc",
            Cafeteria::North => "fclt",
            Cafeteria::N6 => "emp",
            Cafeteria::West => "west",
        }
    }

    /// Parses user input into a Cafeteria.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    /// Returns `None` if the input doesn't name a known cafeteria.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Cafeteria> {
        let s = s.trim().to_lowercase();
        Cafeteria::all().iter().copied().find(|c| c.code() == s)
    }

    /// Comma-separated list of every code, for help and error messages.
    pub fn valid_codes() -> String {
        Cafeteria::all()
            .iter()
            .map(|c| c.code())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Cafeteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
