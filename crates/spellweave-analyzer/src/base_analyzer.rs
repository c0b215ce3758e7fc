//! Rule-based compatibility scoring.
//!
//! [`BaseAnalyzer`] scores a spell combination from the fixed tables in
//! [`rules`](crate::rules):
//!
//! ```text
//! score = T[primary.school][secondary.school]          (0 if absent)
//!       + 0.5 × |shared tags|
//!       + max(1 − 0.2 × |primary.level − secondary.level|, 0)
//! score = clamp(score, 0, 10)
//! ```
//!
//! Contextual effectiveness, potential outcomes and risk factors are derived
//! alongside the score. The analyzer is a pure function of its inputs: it holds
//! no state and never fails.

use std::fmt;

use spellweave_core::{
    ActorDescriptor, ContextualEffectiveness, EnvironmentalContext, InteractionAnalysis,
    SpellDescriptor, SpellPair,
};

use crate::rules;

const SHARED_TAG_WEIGHT: f32 = 0.5;
const LEVEL_GAP_PENALTY: f32 = 0.2;

/// Produces the initial analysis of a spell combination.
///
/// [`BaseAnalyzer`] is the production implementation; the trait exists so the
/// interaction cache can be driven by other analyzers (e.g. instrumented ones).
pub trait InteractionAnalyzer: fmt::Debug + Send + Sync {
    fn analyze(
        &self,
        primary: &SpellDescriptor,
        secondary: &SpellDescriptor,
        actor: &ActorDescriptor,
        context: &EnvironmentalContext,
    ) -> InteractionAnalysis;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BaseAnalyzer;

impl BaseAnalyzer {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Raw (unclamped) compatibility score.
    #[must_use]
    pub fn raw_score(pair: SpellPair<'_>) -> f32 {
        let school = rules::school_compatibility(pair.primary.school, pair.secondary.school)
            .unwrap_or(0.0);
        #[expect(clippy::cast_precision_loss)]
        let shared = pair.shared_tags().count() as f32 * SHARED_TAG_WEIGHT;
        #[expect(clippy::cast_precision_loss)]
        let level = (1.0 - LEVEL_GAP_PENALTY * pair.level_difference() as f32).max(0.0);
        school + shared + level
    }

    #[must_use]
    pub fn contextual_effectiveness(
        pair: SpellPair<'_>,
        context: &EnvironmentalContext,
    ) -> ContextualEffectiveness {
        let terrain = [pair.primary.school, pair.secondary.school]
            .into_iter()
            .filter_map(|school| rules::terrain_bonus(context.terrain, school))
            .fold(rules::BASE_TERRAIN_SCORE, |acc, bonus| acc + bonus)
            .min(1.0);
        ContextualEffectiveness {
            terrain,
            difficulty: rules::difficulty_score(context.difficulty),
        }
    }

    #[must_use]
    pub fn potential_outcomes(pair: SpellPair<'_>) -> Vec<String> {
        let mut outcomes = rules::OUTCOME_RULES
            .iter()
            .filter(|rule| pair.any_has_tag(rule.tags.0) && pair.any_has_tag(rule.tags.1))
            .map(|rule| rule.outcome.to_owned())
            .collect::<Vec<_>>();
        if outcomes.is_empty() {
            outcomes.push(rules::GENERIC_OUTCOME.to_owned());
        }
        outcomes
    }

    /// Risk flags for the combination; empty when no rule fires.
    #[must_use]
    pub fn risk_flags(pair: SpellPair<'_>, actor: &ActorDescriptor) -> Vec<String> {
        let mut risks = vec![];

        let disparity = pair.level_difference();
        if disparity > rules::MAX_STABLE_LEVEL_DISPARITY {
            risks.push(format!(
                "Level disparity of {disparity} may destabilize the combination"
            ));
        }

        let (a, b) = (pair.primary.school, pair.secondary.school);
        if rules::is_conflicting(a, b) {
            risks.push(format!("Conflicting schools of magic: {a} and {b}"));
        }

        let combined = pair.combined_level();
        let ability = actor.class.spellcasting_ability();
        let score = actor.ability_score(ability);
        if combined > rules::ABILITY_CHECK_COMBINED_LEVEL && score < rules::MIN_ABILITY_SCORE {
            risks.push(format!(
                "Caster {ability} ({score}) may be insufficient for combined spell level {combined}"
            ));
        }

        if combined > rules::HIGH_RESOURCE_COMBINED_LEVEL {
            risks.push(format!(
                "High resource consumption (combined spell level {combined})"
            ));
        }

        risks
    }
}

impl InteractionAnalyzer for BaseAnalyzer {
    fn analyze(
        &self,
        primary: &SpellDescriptor,
        secondary: &SpellDescriptor,
        actor: &ActorDescriptor,
        context: &EnvironmentalContext,
    ) -> InteractionAnalysis {
        let pair = SpellPair::new(primary, secondary);
        InteractionAnalysis::new(
            Self::raw_score(pair),
            Self::contextual_effectiveness(pair, context),
            Self::potential_outcomes(pair),
            Self::risk_flags(pair, actor),
        )
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use spellweave_core::{
        Ability, CharacterClass, Difficulty, InteractionType, LOW_INHERENT_RISK, MAX_SCORE,
        MIN_SCORE, School, Terrain,
    };

    use super::*;

    fn scenario() -> (
        SpellDescriptor,
        SpellDescriptor,
        ActorDescriptor,
        EnvironmentalContext,
    ) {
        let primary =
            SpellDescriptor::new("Fireball", School::Evocation, 3, ["damage", "offensive"]);
        let secondary =
            SpellDescriptor::new("Shield", School::Abjuration, 1, ["defense", "protection"]);
        let actor = ActorDescriptor::new("wizard-1", CharacterClass::Wizard, 10)
            .with_ability(Ability::Intelligence, 18);
        let context = EnvironmentalContext::new(Terrain::Dungeon, Difficulty::Moderate);
        (primary, secondary, actor, context)
    }

    #[test]
    fn test_reference_scenario() {
        let (primary, secondary, actor, context) = scenario();
        let analysis = BaseAnalyzer.analyze(&primary, &secondary, &actor, &context);

        // 0.7 (evocation → abjuration) + 0 shared tags + max(1 − 0.2 × 2, 0)
        assert!((analysis.compatibility_score - 1.3).abs() < 1e-5);
        assert_eq!(analysis.interaction_type, InteractionType::Conflict);
        assert_eq!(analysis.risk_factors, vec![LOW_INHERENT_RISK.to_owned()]);
        assert_eq!(
            analysis.potential_outcomes,
            vec![
                "Enhanced defensive barrier".to_owned(),
                "Amplified magical damage".to_owned()
            ]
        );
        // dungeon: evocation +0.1, abjuration has no bonus
        assert!((analysis.contextual_effectiveness.terrain - 0.6).abs() < 1e-5);
        assert!((analysis.contextual_effectiveness.difficulty - 0.6).abs() < 1e-5);
    }

    #[test]
    fn test_shared_tags_add_half_point_each() {
        let a = SpellDescriptor::new("A", School::Unknown, 2, ["fire", "area", "damage"]);
        let b = SpellDescriptor::new("B", School::Unknown, 2, ["fire", "area"]);
        let score = BaseAnalyzer::raw_score(SpellPair::new(&a, &b));
        assert!((score - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_level_term_floors_at_zero() {
        let a = SpellDescriptor::new("A", School::Unknown, 9, Vec::<String>::new());
        let b = SpellDescriptor::new("B", School::Unknown, 0, Vec::<String>::new());
        assert_eq!(BaseAnalyzer::raw_score(SpellPair::new(&a, &b)), 0.0);
    }

    #[test]
    fn test_generic_outcome_fallback() {
        let a = SpellDescriptor::new("A", School::Illusion, 1, ["stealth"]);
        let b = SpellDescriptor::new("B", School::Illusion, 1, ["sound"]);
        assert_eq!(
            BaseAnalyzer::potential_outcomes(SpellPair::new(&a, &b)),
            vec![rules::GENERIC_OUTCOME.to_owned()]
        );
    }

    #[test]
    fn test_all_risk_flags() {
        let a = SpellDescriptor::new("Finger of Death", School::Necromancy, 7, ["damage"]);
        let b = SpellDescriptor::new("Sanctuary", School::Abjuration, 1, ["protection"]);
        let actor = ActorDescriptor::new("cleric", CharacterClass::Cleric, 13)
            .with_ability(Ability::Wisdom, 11);
        let risks = BaseAnalyzer::risk_flags(SpellPair::new(&a, &b), &actor);
        assert_eq!(risks.len(), 4);
        assert!(risks[0].contains("Level disparity of 6"));
        assert!(risks[1].contains("necromancy and abjuration"));
        assert!(risks[2].contains("wisdom (11)"));
        assert!(risks[3].contains("High resource consumption"));
    }

    #[test]
    fn test_huge_levels_saturate() {
        let a = SpellDescriptor::new("Wish", School::Conjuration, u32::MAX, ["utility"]);
        let b = SpellDescriptor::new("Light", School::Evocation, 1, ["utility"]);
        let (_, _, actor, context) = scenario();
        let analysis = BaseAnalyzer.analyze(&a, &b, &actor, &context);
        assert!(
            analysis
                .risk_factors
                .iter()
                .any(|r| r.contains(&format!("combined spell level {}", u32::MAX)))
        );
        assert!((MIN_SCORE..=MAX_SCORE).contains(&analysis.compatibility_score));
    }

    #[test]
    fn test_ability_check_uses_casting_ability() {
        let a = SpellDescriptor::new("A", School::Evocation, 3, ["damage"]);
        let b = SpellDescriptor::new("B", School::Evocation, 2, ["damage"]);
        let strong = ActorDescriptor::new("w", CharacterClass::Wizard, 9)
            .with_ability(Ability::Intelligence, 16);
        let weak = ActorDescriptor::new("w", CharacterClass::Wizard, 9);
        assert!(BaseAnalyzer::risk_flags(SpellPair::new(&a, &b), &strong).is_empty());
        assert_eq!(
            BaseAnalyzer::risk_flags(SpellPair::new(&a, &b), &weak).len(),
            1
        );
    }

    #[test]
    fn test_terrain_score_is_capped() {
        let a = SpellDescriptor::new("A", School::Necromancy, 1, ["x"]);
        let context = EnvironmentalContext::new(Terrain::Swamp, Difficulty::Unknown);
        let eff = BaseAnalyzer::contextual_effectiveness(SpellPair::new(&a, &a), &context);
        assert!((eff.terrain - 0.9).abs() < 1e-5);
        assert_eq!(eff.difficulty, rules::DEFAULT_DIFFICULTY_SCORE);
    }

    fn arb_school() -> impl Strategy<Value = School> {
        prop::sample::select(
            School::ALL
                .iter()
                .copied()
                .chain([School::Unknown])
                .collect::<Vec<_>>(),
        )
    }

    fn arb_spell() -> impl Strategy<Value = SpellDescriptor> {
        let tags = prop::collection::btree_set(
            prop::sample::select(vec![
                "damage", "offensive", "defense", "protection", "fire", "cold", "utility",
                "movement", "control", "healing",
            ]),
            0..6,
        );
        ("[a-z]{1,8}", arb_school(), 0u32..20, tags).prop_map(|(name, school, level, tags)| {
            SpellDescriptor::new(name, school, level, tags)
        })
    }

    proptest! {
        #[test]
        fn score_is_always_in_range(a in arb_spell(), b in arb_spell(), level in 0u32..30) {
            let actor = ActorDescriptor::new("p", CharacterClass::Sorcerer, level);
            let context = EnvironmentalContext::new(Terrain::Forest, Difficulty::Extreme);
            let analysis = BaseAnalyzer.analyze(&a, &b, &actor, &context);
            prop_assert!(analysis.compatibility_score >= MIN_SCORE);
            prop_assert!(analysis.compatibility_score <= MAX_SCORE);
            prop_assert!(!analysis.risk_factors.is_empty());
            prop_assert!(!analysis.potential_outcomes.is_empty());
            prop_assert_eq!(
                analysis.interaction_type,
                InteractionType::from_score(analysis.compatibility_score)
            );
        }
    }
}
