//! Categorical → numeric encoders used by feature extraction.
//!
//! Each dimension has a fixed code table (declaration order of the category
//! enum). Encoders are total: an unrecognized category encodes to
//! [`UNKNOWN_CODE`] and never fails.
//!
//! ```
//! use spellweave_core::{School, encoder};
//!
//! assert_eq!(encoder::encode_school(School::Evocation), 4);
//! let unknown = School::parse_lenient("chronomancy");
//! assert_eq!(encoder::encode_school(unknown), encoder::UNKNOWN_CODE);
//! ```

use crate::{CharacterClass, Difficulty, School, Terrain};

/// Code produced for values outside the fixed tables.
pub const UNKNOWN_CODE: i32 = -1;

#[must_use]
pub const fn encode_school(school: School) -> i32 {
    school.code()
}

#[must_use]
pub const fn encode_class(class: CharacterClass) -> i32 {
    class.code()
}

#[must_use]
pub const fn encode_terrain(terrain: Terrain) -> i32 {
    terrain.code()
}

#[must_use]
pub const fn encode_difficulty(difficulty: Difficulty) -> i32 {
    difficulty.code()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_categories() {
        assert_eq!(encode_school(School::Abjuration), 0);
        assert_eq!(encode_class(CharacterClass::Wizard), 12);
        assert_eq!(encode_terrain(Terrain::Dungeon), 3);
        assert_eq!(encode_difficulty(Difficulty::Extreme), 3);
    }

    #[test]
    fn test_unknown_names_map_to_sentinel() {
        assert_eq!(encode_school(School::parse_lenient("psionics")), UNKNOWN_CODE);
        assert_eq!(encode_class(CharacterClass::parse_lenient("")), UNKNOWN_CODE);
        assert_eq!(encode_terrain(Terrain::parse_lenient("moon")), UNKNOWN_CODE);
        assert_eq!(
            encode_difficulty(Difficulty::parse_lenient("nightmare")),
            UNKNOWN_CODE
        );
        assert_eq!(encode_school(School::Unknown), UNKNOWN_CODE);
    }
}
