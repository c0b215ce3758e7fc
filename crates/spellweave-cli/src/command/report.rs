use std::path::PathBuf;

use serde::Serialize;
use spellweave_corpus::{
    corpus::CorpusStatistics,
    optimizer::{self, QualityReport},
};

use crate::{config::Config, util};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ReportArg {
    /// Corpus snapshot JSON file
    corpus: PathBuf,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CorpusReport {
    statistics: CorpusStatistics,
    quality: QualityReport,
}

pub(crate) fn run(arg: &ReportArg, config: &Config) -> anyhow::Result<()> {
    let ReportArg { corpus, output } = arg;
    let corpus = util::read_corpus_file(corpus, config.corpus)?;
    let statistics = corpus.statistics();
    let quality = optimizer::quality_report(&corpus.snapshot());

    eprintln!("Corpus: {} points", statistics.total);
    eprintln!("  Outcomes:");
    for (outcome, count) in statistics.outcome_distribution.iter() {
        eprintln!("    {:<8} {count:6}", outcome.to_string());
    }
    eprintln!("  Interaction types:");
    for (interaction_type, count) in quality.interaction_types.iter() {
        let share = quality.interaction_types.share(interaction_type) * 100.0;
        eprintln!(
            "    {:<8} {count:6} ({share:5.1}%)",
            interaction_type.to_string()
        );
    }
    eprintln!("  Unique spell pairs: {}", quality.unique_spell_pairs);
    eprintln!("  Unique actor classes: {}", quality.unique_actor_classes);
    if let Some(damage) = &statistics.damage {
        eprintln!(
            "  Damage: min {:.2} / mean {:.2} / max {:.2}",
            damage.min, damage.mean, damage.max
        );
    }
    let engineered = [
        ("Level difference", &quality.level_difference),
        ("Actor level factor", &quality.actor_level_factor),
        ("School compatibility", &quality.school_compatibility),
        ("Normalized score", &quality.normalized_score),
    ];
    for (label, stats) in engineered {
        if let Some(stats) = stats {
            eprintln!("  {label}: mean {:.3} / std {:.3}", stats.mean, stats.std_dev);
        }
    }

    util::save_json(&CorpusReport { statistics, quality }, output.clone())
}
