//! Plugins shipped with the pipeline.
//!
//! They are not registered implicitly; use
//! [`PluginRegistry::with_builtin_plugins`](super::PluginRegistry::with_builtin_plugins)
//! or register them one by one.

use spellweave_core::{ActorDescriptor, EnvironmentalContext, InteractionAnalysis, SpellPair};

use super::{BoxedPlugin, InteractionPlugin, PluginError, PluginResult};

#[must_use]
pub fn all_builtin_plugins() -> Vec<BoxedPlugin> {
    vec![Box::new(ElementalResonancePlugin), Box::new(SpecializationPlugin)]
}

/// Elemental damage tags recognized by [`ElementalResonancePlugin`].
pub const ELEMENT_TAGS: &[&str] = &[
    "acid",
    "cold",
    "fire",
    "force",
    "lightning",
    "necrotic",
    "poison",
    "psychic",
    "radiant",
    "thunder",
];

/// Element pairs that cancel each other out.
pub const OPPOSED_ELEMENTS: &[(&str, &str)] = &[("fire", "cold"), ("radiant", "necrotic")];

const RESONANCE_BONUS: f32 = 0.5;
const MAX_RESONANCE_BONUS: f32 = 1.5;
const OPPOSITION_PENALTY: f32 = 1.0;

/// Rewards spells sharing an element and penalizes opposed elements.
#[derive(Debug, Clone, Copy, Default)]
pub struct ElementalResonancePlugin;

impl InteractionPlugin for ElementalResonancePlugin {
    fn name(&self) -> &str {
        "elemental-resonance"
    }

    fn version(&self) -> &str {
        "1.0.0"
    }

    fn priority(&self) -> i32 {
        10
    }

    fn process(
        &self,
        pair: SpellPair<'_>,
        _actor: &ActorDescriptor,
        _context: &EnvironmentalContext,
        _analysis: &InteractionAnalysis,
    ) -> Result<PluginResult, PluginError> {
        let mut result = PluginResult::unmodified();

        let shared = pair
            .shared_tags()
            .filter(|tag| ELEMENT_TAGS.contains(tag))
            .collect::<Vec<_>>();
        if !shared.is_empty() {
            #[expect(clippy::cast_precision_loss)]
            let bonus = (shared.len() as f32 * RESONANCE_BONUS).min(MAX_RESONANCE_BONUS);
            result = result.with_adjustment(bonus);
            for element in shared {
                result = result
                    .with_insight(format!("Resonant {element} energies reinforce each other"));
            }
        }

        for &(a, b) in OPPOSED_ELEMENTS {
            let opposed = (pair.primary.has_tag(a) && pair.secondary.has_tag(b))
                || (pair.primary.has_tag(b) && pair.secondary.has_tag(a));
            if opposed {
                result = result
                    .with_adjustment(-OPPOSITION_PENALTY)
                    .with_warning(format!("Opposed {a} and {b} energies may cancel out"));
            }
        }

        Ok(result)
    }
}

const SPECIALIZATION_BONUS: f32 = 0.75;

/// Rewards actors specialized in the school of either spell.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpecializationPlugin;

impl InteractionPlugin for SpecializationPlugin {
    fn name(&self) -> &str {
        "school-specialization"
    }

    fn version(&self) -> &str {
        "1.0.0"
    }

    fn priority(&self) -> i32 {
        5
    }

    fn process(
        &self,
        pair: SpellPair<'_>,
        actor: &ActorDescriptor,
        _context: &EnvironmentalContext,
        _analysis: &InteractionAnalysis,
    ) -> Result<PluginResult, PluginError> {
        let Some(specialization) = actor.specialization.as_deref() else {
            return Ok(PluginResult::unmodified());
        };
        let specialization = specialization.trim();
        let matched = [pair.primary.school, pair.secondary.school]
            .into_iter()
            .find(|school| {
                !school.is_unknown() && school.as_str().eq_ignore_ascii_case(specialization)
            });
        Ok(match matched {
            Some(school) => PluginResult::unmodified()
                .with_adjustment(SPECIALIZATION_BONUS)
                .with_insight(format!(
                    "{school} specialist channels the combination efficiently"
                )),
            None => PluginResult::unmodified(),
        })
    }
}

#[cfg(test)]
mod tests {
    use spellweave_core::{
        CharacterClass, ContextualEffectiveness, Difficulty, School, SpellDescriptor, Terrain,
    };

    use super::*;

    fn analysis() -> InteractionAnalysis {
        InteractionAnalysis::new(
            4.0,
            ContextualEffectiveness {
                terrain: 0.5,
                difficulty: 0.6,
            },
            vec![],
            vec![],
        )
    }

    fn run<P: InteractionPlugin>(
        plugin: &P,
        a: &SpellDescriptor,
        b: &SpellDescriptor,
        actor: &ActorDescriptor,
    ) -> PluginResult {
        let context = EnvironmentalContext::new(Terrain::Mountain, Difficulty::Moderate);
        plugin
            .process(SpellPair::new(a, b), actor, &context, &analysis())
            .unwrap()
    }

    #[test]
    fn test_shared_element_resonates() {
        let a = SpellDescriptor::new("Fireball", School::Evocation, 3, ["fire", "damage"]);
        let b = SpellDescriptor::new("Flame Blade", School::Evocation, 2, ["fire"]);
        let actor = ActorDescriptor::new("a", CharacterClass::Druid, 5);
        let result = run(&ElementalResonancePlugin, &a, &b, &actor);
        assert!(result.modified);
        assert_eq!(result.score_adjustment, Some(0.5));
        assert_eq!(result.insights.len(), 1);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_opposed_elements_penalize() {
        let a = SpellDescriptor::new("Fireball", School::Evocation, 3, ["fire"]);
        let b = SpellDescriptor::new("Cone of Cold", School::Evocation, 5, ["cold"]);
        let actor = ActorDescriptor::new("a", CharacterClass::Wizard, 9);
        let result = run(&ElementalResonancePlugin, &a, &b, &actor);
        assert_eq!(result.score_adjustment, Some(-1.0));
        assert_eq!(result.warnings, ["Opposed fire and cold energies may cancel out"]);
    }

    #[test]
    fn test_no_elements_is_unmodified() {
        let a = SpellDescriptor::new("Shield", School::Abjuration, 1, ["defense"]);
        let b = SpellDescriptor::new("Mage Armor", School::Abjuration, 1, ["defense"]);
        let actor = ActorDescriptor::new("a", CharacterClass::Wizard, 1);
        assert!(!run(&ElementalResonancePlugin, &a, &b, &actor).modified);
    }

    #[test]
    fn test_specialization_matches_school() {
        let a = SpellDescriptor::new("Shield", School::Abjuration, 1, ["defense"]);
        let b = SpellDescriptor::new("Fireball", School::Evocation, 3, ["fire"]);
        let specialist =
            ActorDescriptor::new("a", CharacterClass::Wizard, 5).with_specialization("Evocation");
        let result = run(&SpecializationPlugin, &a, &b, &specialist);
        assert_eq!(result.score_adjustment, Some(SPECIALIZATION_BONUS));

        let generalist = ActorDescriptor::new("b", CharacterClass::Wizard, 5);
        assert!(!run(&SpecializationPlugin, &a, &b, &generalist).modified);

        let other =
            ActorDescriptor::new("c", CharacterClass::Wizard, 5).with_specialization("illusion");
        assert!(!run(&SpecializationPlugin, &a, &b, &other).modified);
    }
}
