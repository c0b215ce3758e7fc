//! Fixed lookup tables used by the base analyzer.
//!
//! All lookups are total: a missing entry (including any `Unknown` category)
//! yields a neutral default instead of an error.

use spellweave_core::{Difficulty, School, Terrain};

/// Terrain effectiveness before school bonuses are applied.
pub const BASE_TERRAIN_SCORE: f32 = 0.5;

/// Difficulty score used for values outside the fixed table.
pub const DEFAULT_DIFFICULTY_SCORE: f32 = 0.5;

/// Directed school compatibility `T[primary][secondary]`.
///
/// Returns `None` when the table has no entry for the pair; the analyzer
/// treats that as a zero contribution.
#[must_use]
pub fn school_compatibility(primary: School, secondary: School) -> Option<f32> {
    use School::{
        Abjuration, Conjuration, Divination, Enchantment, Evocation, Illusion, Necromancy,
        Transmutation,
    };

    let value = match (primary, secondary) {
        (Abjuration, Abjuration) => 0.6,
        (Abjuration, Conjuration) => 0.5,
        (Abjuration, Divination) => 0.6,
        (Abjuration, Evocation) => 0.4,
        (Abjuration, Transmutation) => 0.5,

        (Conjuration, Abjuration) => 0.5,
        (Conjuration, Conjuration) => 0.4,
        (Conjuration, Evocation) => 0.6,
        (Conjuration, Transmutation) => 0.7,

        (Divination, Abjuration) => 0.7,
        (Divination, Divination) => 0.3,
        (Divination, Enchantment) => 0.5,
        (Divination, Evocation) => 0.5,
        (Divination, Illusion) => 0.6,

        (Enchantment, Divination) => 0.5,
        (Enchantment, Enchantment) => 0.4,
        (Enchantment, Illusion) => 0.8,

        (Evocation, Abjuration) => 0.7,
        (Evocation, Conjuration) => 0.5,
        (Evocation, Evocation) => 0.6,
        (Evocation, Transmutation) => 0.6,

        (Illusion, Divination) => 0.5,
        (Illusion, Enchantment) => 0.8,
        (Illusion, Illusion) => 0.5,
        (Illusion, Transmutation) => 0.4,

        (Necromancy, Conjuration) => 0.5,
        (Necromancy, Necromancy) => 0.6,
        (Necromancy, Transmutation) => 0.4,

        (Transmutation, Abjuration) => 0.5,
        (Transmutation, Conjuration) => 0.7,
        (Transmutation, Evocation) => 0.6,
        (Transmutation, Transmutation) => 0.5,

        _ => return None,
    };
    Some(value)
}

/// School pairs that interfere with each other, in either order.
pub const CONFLICTING_SCHOOLS: &[(School, School)] = &[
    (School::Abjuration, School::Necromancy),
    (School::Evocation, School::Illusion),
    (School::Enchantment, School::Necromancy),
];

#[must_use]
pub fn is_conflicting(a: School, b: School) -> bool {
    CONFLICTING_SCHOOLS
        .iter()
        .any(|&(x, y)| (x, y) == (a, b) || (x, y) == (b, a))
}

/// Bonus a school receives in a terrain, if any.
#[must_use]
pub fn terrain_bonus(terrain: Terrain, school: School) -> Option<f32> {
    use School::{
        Abjuration, Conjuration, Divination, Enchantment, Evocation, Illusion, Necromancy,
        Transmutation,
    };

    let bonus = match (terrain, school) {
        (Terrain::Arctic, Abjuration) => 0.2,
        (Terrain::Arctic, Evocation) => 0.1,
        (Terrain::Coastal, Conjuration | Transmutation) => 0.15,
        (Terrain::Desert, Evocation) => 0.15,
        (Terrain::Desert, Conjuration) => 0.1,
        (Terrain::Dungeon, Evocation) => 0.1,
        (Terrain::Dungeon, Divination) => 0.2,
        (Terrain::Dungeon, Illusion) => 0.15,
        (Terrain::Forest, Conjuration | Transmutation) => 0.2,
        (Terrain::Forest, Enchantment) => 0.1,
        (Terrain::Grassland, Conjuration | Evocation) => 0.1,
        (Terrain::Mountain, Evocation) => 0.2,
        (Terrain::Mountain, Abjuration) => 0.1,
        (Terrain::Swamp, Necromancy) => 0.2,
        (Terrain::Swamp, Transmutation) => 0.1,
        (Terrain::Underdark, Necromancy) => 0.2,
        (Terrain::Underdark, Divination) => 0.15,
        (Terrain::Underdark, Illusion) => 0.1,
        (Terrain::Urban, Enchantment | Illusion) => 0.2,
        (Terrain::Urban, Divination) => 0.1,
        _ => return None,
    };
    Some(bonus)
}

#[must_use]
pub const fn difficulty_score(difficulty: Difficulty) -> f32 {
    match difficulty {
        Difficulty::Easy => 0.4,
        Difficulty::Moderate => 0.6,
        Difficulty::Challenging => 0.8,
        Difficulty::Extreme => 1.0,
        Difficulty::Unknown => DEFAULT_DIFFICULTY_SCORE,
    }
}

/// A tag-pair rule: fires when the combined tags of both spells contain both tags.
#[derive(Debug, Clone, Copy)]
pub struct OutcomeRule {
    pub tags: (&'static str, &'static str),
    pub outcome: &'static str,
}

/// Outcome rules, evaluated in order.
pub const OUTCOME_RULES: &[OutcomeRule] = &[
    OutcomeRule {
        tags: ("defense", "protection"),
        outcome: "Enhanced defensive barrier",
    },
    OutcomeRule {
        tags: ("damage", "offensive"),
        outcome: "Amplified magical damage",
    },
    OutcomeRule {
        tags: ("utility", "information"),
        outcome: "Advanced tactical intelligence",
    },
    OutcomeRule {
        tags: ("movement", "teleportation"),
        outcome: "Superior battlefield repositioning",
    },
    OutcomeRule {
        tags: ("healing", "support"),
        outcome: "Sustained party recovery",
    },
    OutcomeRule {
        tags: ("control", "debuff"),
        outcome: "Compounded battlefield control",
    },
];

/// Outcome emitted when no rule matches.
pub const GENERIC_OUTCOME: &str = "Standard magical interaction";

/// Level gap above which the combination is flagged as unstable.
pub const MAX_STABLE_LEVEL_DISPARITY: u32 = 2;
/// Combined level above which the caster's ability is checked.
pub const ABILITY_CHECK_COMBINED_LEVEL: u32 = 4;
/// Minimum spellcasting score for combinations above the ability-check level.
pub const MIN_ABILITY_SCORE: u8 = 12;
/// Combined level above which resource consumption is flagged.
pub const HIGH_RESOURCE_COMBINED_LEVEL: u32 = 6;
