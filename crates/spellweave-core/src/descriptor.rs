//! Per-query inputs supplied by the character/encounter layer.
//!
//! Descriptors are plain values: the pipeline borrows them and never mutates
//! them.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{Ability, CharacterClass, Difficulty, School, Terrain};

/// Ability score assumed when an actor has no entry for an ability.
pub const DEFAULT_ABILITY_SCORE: u8 = 10;

/// A combinable spell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellDescriptor {
    /// Spell name, also used as its identity.
    pub name: String,
    pub school: School,
    pub level: u32,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_cost: Option<u32>,
}

impl SpellDescriptor {
    #[must_use]
    pub fn new<I, S>(name: impl Into<String>, school: School, level: u32, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            school,
            level,
            tags: tags.into_iter().map(Into::into).collect(),
            resource_cost: None,
        }
    }

    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

/// The actor casting the spell combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorDescriptor {
    pub id: String,
    pub class: CharacterClass,
    pub level: u32,
    #[serde(default)]
    pub ability_scores: BTreeMap<Ability, u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
}

impl ActorDescriptor {
    #[must_use]
    pub fn new(id: impl Into<String>, class: CharacterClass, level: u32) -> Self {
        Self {
            id: id.into(),
            class,
            level,
            ability_scores: BTreeMap::new(),
            specialization: None,
        }
    }

    #[must_use]
    pub fn with_ability(mut self, ability: Ability, score: u8) -> Self {
        self.ability_scores.insert(ability, score);
        self
    }

    #[must_use]
    pub fn with_specialization(mut self, specialization: impl Into<String>) -> Self {
        self.specialization = Some(specialization.into());
        self
    }

    /// Returns the score for `ability`, or [`DEFAULT_ABILITY_SCORE`] when absent.
    #[must_use]
    pub fn ability_score(&self, ability: Ability) -> u8 {
        self.ability_scores
            .get(&ability)
            .copied()
            .unwrap_or(DEFAULT_ABILITY_SCORE)
    }

    /// Returns the score of the class's spellcasting ability.
    #[must_use]
    pub fn spellcasting_score(&self) -> u8 {
        self.ability_score(self.class.spellcasting_ability())
    }
}

/// Situation the spells are combined in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentalContext {
    pub terrain: Terrain,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub party_composition: Vec<CharacterClass>,
}

impl EnvironmentalContext {
    #[must_use]
    pub fn new(terrain: Terrain, difficulty: Difficulty) -> Self {
        Self {
            terrain,
            difficulty,
            party_composition: vec![],
        }
    }
}

/// Borrowed pair of spells being combined, primary first.
#[derive(Debug, Clone, Copy)]
pub struct SpellPair<'a> {
    pub primary: &'a SpellDescriptor,
    pub secondary: &'a SpellDescriptor,
}

impl<'a> SpellPair<'a> {
    #[must_use]
    pub fn new(primary: &'a SpellDescriptor, secondary: &'a SpellDescriptor) -> Self {
        Self { primary, secondary }
    }

    /// Tags present on both spells.
    pub fn shared_tags(&self) -> impl Iterator<Item = &'a str> + use<'a> {
        let Self { primary, secondary } = *self;
        primary.tags.intersection(&secondary.tags).map(String::as_str)
    }

    /// Returns `true` if either spell carries `tag`.
    #[must_use]
    pub fn any_has_tag(&self, tag: &str) -> bool {
        self.primary.has_tag(tag) || self.secondary.has_tag(tag)
    }

    #[must_use]
    pub fn level_difference(&self) -> u32 {
        self.primary.level.abs_diff(self.secondary.level)
    }

    /// Sum of both spell levels, saturating at `u32::MAX`.
    #[must_use]
    pub fn combined_level(&self) -> u32 {
        self.primary.level.saturating_add(self.secondary.level)
    }
}
