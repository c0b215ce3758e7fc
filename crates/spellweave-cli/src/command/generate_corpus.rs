use std::path::PathBuf;

use chrono::{Duration, Utc};
use rand::{Rng, SeedableRng as _, seq::IndexedRandom as _};
use rand_distr::{Distribution as _, Normal};
use rand_pcg::Pcg64Mcg;
use spellweave_core::{
    Ability, ActorDescriptor, CharacterClass, Difficulty, EnvironmentalContext,
    InteractionAnalysis, MAX_SCORE, School, SpellDescriptor, Terrain,
};
use spellweave_corpus::{
    corpus::TrainingCorpus,
    data_point::{PerformanceMetrics, TrainingDataPoint},
};

use crate::{config::Config, util};

const SPELL_CATALOG: &[(&str, School, u32, &[&str])] = &[
    ("Fire Bolt", School::Evocation, 0, &["damage", "fire", "offensive"]),
    ("Ray of Frost", School::Evocation, 0, &["damage", "cold", "offensive"]),
    ("Magic Missile", School::Evocation, 1, &["damage", "force", "offensive"]),
    ("Fireball", School::Evocation, 3, &["damage", "fire", "offensive", "area"]),
    ("Cone of Cold", School::Evocation, 5, &["damage", "cold", "area"]),
    ("Shield", School::Abjuration, 1, &["defense", "protection"]),
    ("Protection from Energy", School::Abjuration, 3, &["defense", "protection", "cold"]),
    ("Counterspell", School::Abjuration, 3, &["defense", "control"]),
    ("Globe of Invulnerability", School::Abjuration, 6, &["defense", "protection"]),
    ("Misty Step", School::Conjuration, 2, &["movement", "teleportation"]),
    ("Dimension Door", School::Conjuration, 4, &["movement", "teleportation"]),
    ("Cloudkill", School::Conjuration, 5, &["damage", "poison", "area"]),
    ("Detect Magic", School::Divination, 1, &["utility", "information"]),
    ("Clairvoyance", School::Divination, 3, &["utility", "information"]),
    ("Hold Person", School::Enchantment, 2, &["control"]),
    ("Confusion", School::Enchantment, 4, &["control", "area"]),
    ("Mirror Image", School::Illusion, 2, &["defense"]),
    ("Greater Invisibility", School::Illusion, 4, &["defense", "utility"]),
    ("Inflict Wounds", School::Necromancy, 1, &["damage", "necrotic", "offensive"]),
    ("Blight", School::Necromancy, 4, &["damage", "necrotic"]),
    ("Sacred Flame", School::Evocation, 0, &["damage", "radiant"]),
    ("Haste", School::Transmutation, 3, &["buff", "movement"]),
    ("Fly", School::Transmutation, 3, &["movement", "utility"]),
    ("Polymorph", School::Transmutation, 4, &["control", "utility"]),
];

const MAX_ACTOR_LEVEL: u32 = 20;
const SPECIALIZATION_PROBABILITY: f64 = 0.3;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct GenerateCorpusArg {
    /// Number of analyses to record
    #[arg(long, default_value_t = 2000)]
    num_points: usize,
    /// Number of distinct actors
    #[arg(long, default_value_t = 16)]
    num_actors: usize,
    /// Restrict contexts to these terrains (repeatable)
    #[arg(long = "terrain")]
    terrains: Vec<Terrain>,
    /// Seed for reproducible corpora
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Skip the built-in plugins
    #[arg(long)]
    no_plugins: bool,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

fn spell_catalog() -> Vec<SpellDescriptor> {
    SPELL_CATALOG
        .iter()
        .map(|&(name, school, level, tags)| {
            SpellDescriptor::new(name, school, level, tags.iter().copied())
        })
        .collect()
}

fn random_actor<R>(rng: &mut R, index: usize) -> ActorDescriptor
where
    R: Rng + ?Sized,
{
    let class = CharacterClass::ALL
        .choose(rng)
        .copied()
        .unwrap_or(CharacterClass::Wizard);
    let mut actor = ActorDescriptor::new(
        format!("actor-{index}"),
        class,
        rng.random_range(1..=MAX_ACTOR_LEVEL),
    )
    .with_ability(class.spellcasting_ability(), rng.random_range(8..=20));
    for &ability in Ability::ALL {
        if !actor.ability_scores.contains_key(&ability) {
            actor.ability_scores.insert(ability, rng.random_range(8..=16));
        }
    }
    let specialization = School::ALL
        .choose(rng)
        .filter(|_| rng.random_bool(SPECIALIZATION_PROBABILITY));
    if let Some(school) = specialization {
        actor = actor.with_specialization(school.as_str());
    }
    actor
}

/// Observed metrics follow the analysis with Gaussian noise.
fn observe<R>(
    analysis: &InteractionAnalysis,
    noise: Normal<f32>,
    rng: &mut R,
) -> PerformanceMetrics
where
    R: Rng + ?Sized,
{
    let normalized = analysis.compatibility_score / MAX_SCORE;
    let effectiveness = analysis.contextual_effectiveness;
    PerformanceMetrics {
        damage: (analysis.compatibility_score * 10.0 + noise.sample(rng) * 10.0).max(0.0),
        efficiency: (effectiveness.terrain + noise.sample(rng)).clamp(0.0, 1.0),
        tactical_advantage: (normalized * effectiveness.difficulty + noise.sample(rng))
            .clamp(0.0, 1.0),
    }
}

pub(crate) fn run(arg: &GenerateCorpusArg, config: &Config) -> anyhow::Result<()> {
    let GenerateCorpusArg {
        num_points,
        num_actors,
        terrains,
        seed,
        no_plugins,
        output,
    } = arg;
    let terrains = if terrains.is_empty() {
        Terrain::ALL
    } else {
        terrains.as_slice()
    };

    let mut rng = Pcg64Mcg::seed_from_u64(*seed);
    let noise = Normal::new(0.0, 0.1)?;
    let spells = spell_catalog();
    let actors = (0..(*num_actors).max(1))
        .map(|i| random_actor(&mut rng, i))
        .collect::<Vec<_>>();
    let cache = super::build_cache(*no_plugins);
    let corpus = TrainingCorpus::new(config.corpus);
    let mut timestamp = Utc::now() - Duration::seconds(i64::try_from(*num_points)?);

    for i in 0..*num_points {
        let (Some(primary), Some(secondary), Some(actor), Some(&terrain), Some(&difficulty)) = (
            spells.choose(&mut rng),
            spells.choose(&mut rng),
            actors.choose(&mut rng),
            terrains.choose(&mut rng),
            Difficulty::ALL.choose(&mut rng),
        ) else {
            break;
        };
        let mut context = EnvironmentalContext::new(terrain, difficulty);
        context.party_composition = actors
            .choose_multiple(&mut rng, 3)
            .map(|a| a.class)
            .collect();

        let analysis = cache.get_or_compute(primary, secondary, actor, &context);
        let metrics = observe(&analysis, noise, &mut rng);
        corpus.record(TrainingDataPoint::from_analysis(
            primary.clone(),
            secondary.clone(),
            actor.clone(),
            context,
            &analysis,
            metrics,
            timestamp,
        ));
        timestamp += Duration::seconds(1);
        if (i + 1) % 1000 == 0 {
            tracing::debug!(recorded = i + 1, corpus = corpus.len(), "generating corpus");
        }
    }

    let stats = cache.stats();
    tracing::info!(
        points = corpus.len(),
        cache_entries = stats.entries,
        cache_hits = stats.hits,
        "corpus generated"
    );
    util::save_json(&corpus.snapshot(), output.clone())
}

#[cfg(test)]
mod tests {
    use spellweave_analyzer::cache::InteractionCache;

    use super::*;

    #[test]
    fn test_catalog_is_well_formed() {
        let spells = spell_catalog();
        assert_eq!(spells.len(), SPELL_CATALOG.len());
        assert!(spells.iter().all(|s| !s.tags.is_empty()));
        assert!(spells.iter().all(|s| s.school != School::Unknown));
    }

    #[test]
    fn test_actors_are_seeded() {
        let a = random_actor(&mut Pcg64Mcg::seed_from_u64(3), 0);
        let b = random_actor(&mut Pcg64Mcg::seed_from_u64(3), 0);
        assert_eq!(a, b);
        assert_eq!(a.id, "actor-0");
        assert!((1..=MAX_ACTOR_LEVEL).contains(&a.level));
        assert_eq!(a.ability_scores.len(), Ability::ALL.len());
    }

    #[test]
    fn test_observed_metrics_are_bounded() {
        let cache = InteractionCache::default();
        let spells = spell_catalog();
        let actor = ActorDescriptor::new("a", CharacterClass::Wizard, 5);
        let context = EnvironmentalContext::new(Terrain::Forest, Difficulty::Extreme);
        let analysis = cache.get_or_compute(&spells[0], &spells[3], &actor, &context);
        let noise = Normal::new(0.0, 0.1).unwrap();
        let mut rng = Pcg64Mcg::seed_from_u64(0);
        for _ in 0..100 {
            let metrics = observe(&analysis, noise, &mut rng);
            assert!(metrics.damage >= 0.0);
            assert!((0.0..=1.0).contains(&metrics.efficiency));
            assert!((0.0..=1.0).contains(&metrics.tactical_advantage));
        }
    }
}
