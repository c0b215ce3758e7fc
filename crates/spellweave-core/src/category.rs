//! Fixed categorical dimensions of the interaction model.
//!
//! Every dimension (school, class, terrain, difficulty, ability) is a closed
//! enumeration plus an `Unknown` variant. Values arriving from outside the
//! pipeline are parsed leniently: anything unrecognized becomes `Unknown`
//! instead of failing, and `Unknown` encodes to the sentinel `-1` (see
//! [`encoder`](crate::encoder)).
//!
//! Strict parsing through [`FromStr`] is available for command-line input,
//! where rejecting a typo is more useful than silently degrading it.
//!
//! # Serialization
//!
//! Categories serialize as their lowercase name. Deserialization is lenient,
//! so a corpus written by a newer version with additional schools still loads:
//!
//! ```
//! use spellweave_core::School;
//!
//! let school: School = serde_json::from_str("\"evocation\"").unwrap();
//! assert_eq!(school, School::Evocation);
//!
//! let unknown: School = serde_json::from_str("\"chronomancy\"").unwrap();
//! assert_eq!(unknown, School::Unknown);
//! ```

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::ParseCategoryError;

macro_rules! categories {
    (
        $(#[$meta:meta])*
        pub enum $name:ident ($kind:literal) {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $text:literal = $code:literal,
            )+
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
            derive_more::IsVariant,
        )]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
            /// Any value outside the fixed enumeration.
            Unknown,
        }

        impl $name {
            /// All known values, in encoding order.
            pub const ALL: &[Self] = &[$(Self::$variant),+];

            /// Returns the canonical lowercase name.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                    Self::Unknown => "unknown",
                }
            }

            /// Returns the numeric code of this category, or `-1` for `Unknown`.
            #[must_use]
            pub const fn code(self) -> i32 {
                match self {
                    $(Self::$variant => $code,)+
                    Self::Unknown => -1,
                }
            }

            /// Parses a name, mapping anything unrecognized to `Unknown`.
            #[must_use]
            pub fn parse_lenient(s: &str) -> Self {
                s.parse().unwrap_or(Self::Unknown)
            }
        }

        impl FromStr for $name {
            type Err = ParseCategoryError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let normalized = s.trim().to_ascii_lowercase();
                match normalized.as_str() {
                    $($text => Ok(Self::$variant),)+
                    _ => Err(ParseCategoryError {
                        kind: $kind,
                        value: s.to_owned(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(self.as_str())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::parse_lenient(&s)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.as_str().to_owned()
            }
        }
    };
}

categories! {
    /// School of magic a spell belongs to.
    pub enum School ("school") {
        Abjuration => "abjuration" = 0,
        Conjuration => "conjuration" = 1,
        Divination => "divination" = 2,
        Enchantment => "enchantment" = 3,
        Evocation => "evocation" = 4,
        Illusion => "illusion" = 5,
        Necromancy => "necromancy" = 6,
        Transmutation => "transmutation" = 7,
    }
}

categories! {
    /// Character class of the casting actor.
    pub enum CharacterClass ("class") {
        Artificer => "artificer" = 0,
        Barbarian => "barbarian" = 1,
        Bard => "bard" = 2,
        Cleric => "cleric" = 3,
        Druid => "druid" = 4,
        Fighter => "fighter" = 5,
        Monk => "monk" = 6,
        Paladin => "paladin" = 7,
        Ranger => "ranger" = 8,
        Rogue => "rogue" = 9,
        Sorcerer => "sorcerer" = 10,
        Warlock => "warlock" = 11,
        Wizard => "wizard" = 12,
    }
}

categories! {
    /// Terrain the interaction takes place in.
    pub enum Terrain ("terrain") {
        Arctic => "arctic" = 0,
        Coastal => "coastal" = 1,
        Desert => "desert" = 2,
        Dungeon => "dungeon" = 3,
        Forest => "forest" = 4,
        Grassland => "grassland" = 5,
        Mountain => "mountain" = 6,
        Swamp => "swamp" = 7,
        Underdark => "underdark" = 8,
        Urban => "urban" = 9,
    }
}

categories! {
    /// Combat difficulty of the encounter.
    pub enum Difficulty ("difficulty") {
        Easy => "easy" = 0,
        Moderate => "moderate" = 1,
        Challenging => "challenging" = 2,
        Extreme => "extreme" = 3,
    }
}

categories! {
    /// Ability score kinds.
    pub enum Ability ("ability") {
        Strength => "strength" = 0,
        Dexterity => "dexterity" = 1,
        Constitution => "constitution" = 2,
        Intelligence => "intelligence" = 3,
        Wisdom => "wisdom" = 4,
        Charisma => "charisma" = 5,
    }
}

impl CharacterClass {
    /// Ability the class casts spells with.
    ///
    /// Classes without a spellcasting tradition fall back to intelligence.
    #[must_use]
    pub const fn spellcasting_ability(self) -> Ability {
        match self {
            Self::Cleric | Self::Druid | Self::Ranger | Self::Monk => Ability::Wisdom,
            Self::Sorcerer | Self::Warlock | Self::Bard | Self::Paladin => Ability::Charisma,
            Self::Wizard
            | Self::Artificer
            | Self::Barbarian
            | Self::Fighter
            | Self::Rogue
            | Self::Unknown => Ability::Intelligence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_parse_is_case_insensitive() {
        assert_eq!("Evocation".parse::<School>().unwrap(), School::Evocation);
        assert_eq!(" WIZARD ".parse::<CharacterClass>().unwrap(), CharacterClass::Wizard);
        assert_eq!("dungeon".parse::<Terrain>().unwrap(), Terrain::Dungeon);
    }

    #[test]
    fn test_strict_parse_rejects_unknown() {
        let err = "chronomancy".parse::<School>().unwrap_err();
        assert_eq!(err.kind, "school");
        assert_eq!(err.value, "chronomancy");
        assert!("unknown".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_lenient_parse_degrades_to_unknown() {
        assert_eq!(School::parse_lenient("chronomancy"), School::Unknown);
        assert_eq!(Terrain::parse_lenient(""), Terrain::Unknown);
        assert!(Difficulty::parse_lenient("impossible").is_unknown());
    }

    #[test]
    fn test_codes_follow_declaration_order() {
        for (i, school) in School::ALL.iter().enumerate() {
            assert_eq!(school.code(), i32::try_from(i).unwrap());
        }
        for (i, class) in CharacterClass::ALL.iter().enumerate() {
            assert_eq!(class.code(), i32::try_from(i).unwrap());
        }
        assert_eq!(Terrain::Unknown.code(), -1);
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        let json = serde_json::to_string(&Difficulty::Challenging).unwrap();
        assert_eq!(json, "\"challenging\"");
        let parsed: Terrain = serde_json::from_str("\"Underdark\"").unwrap();
        assert_eq!(parsed, Terrain::Underdark);
    }

    #[test]
    fn test_spellcasting_ability() {
        assert_eq!(
            CharacterClass::Wizard.spellcasting_ability(),
            Ability::Intelligence
        );
        assert_eq!(CharacterClass::Cleric.spellcasting_ability(), Ability::Wisdom);
        assert_eq!(
            CharacterClass::Warlock.spellcasting_ability(),
            Ability::Charisma
        );
    }
}
