use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use rand::SeedableRng as _;
use rand_pcg::Pcg64Mcg;
use spellweave_analyzer::cache::InteractionCache;
use spellweave_corpus::{corpus::TrainingCorpus, optimizer};
use spellweave_training::{
    backend,
    control::TrainingControl,
    ensemble::{PredictionEnsemble, TrainingReport},
};

use crate::{config::Config, util};

#[derive(Default, Debug, Clone, clap::Args)]
struct CorpusSourceArg {
    /// Corpus snapshot JSON file
    #[arg(long)]
    corpus: PathBuf,
    /// Remove context duplicates and balance interaction types before training
    #[arg(long)]
    optimize: bool,
    /// Seed for dataset balancing
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    #[clap(flatten)]
    source: CorpusSourceArg,
    /// Output file path for the trained model
    #[arg(long)]
    output: Option<PathBuf>,
}

fn load_training_corpus(
    source: &CorpusSourceArg,
    config: &Config,
) -> anyhow::Result<TrainingCorpus> {
    let corpus = util::read_corpus_file(&source.corpus, config.corpus)?;
    if !source.optimize {
        return Ok(corpus);
    }
    let mut rng = Pcg64Mcg::seed_from_u64(source.seed);
    let deduped = optimizer::remove_duplicates(corpus.snapshot());
    let balanced = optimizer::balance_dataset(&deduped, &mut rng);
    tracing::info!(
        before = corpus.len(),
        deduplicated = deduped.len(),
        balanced = balanced.len(),
        "optimized corpus"
    );
    Ok(TrainingCorpus::from_points(config.corpus, balanced))
}

fn train_ensemble(
    cache: Arc<InteractionCache>,
    corpus: &TrainingCorpus,
    config: &Config,
) -> anyhow::Result<(PredictionEnsemble, TrainingReport)> {
    let ensemble = PredictionEnsemble::new(
        cache,
        backend::all_backends(config.linear, config.genetic),
        config.confidence,
    );
    let report = ensemble.train_from(corpus, &TrainingControl::new())?;
    Ok((ensemble, report))
}

pub(crate) fn run(arg: &TrainArg, config: &Config) -> anyhow::Result<()> {
    let TrainArg { source, output } = arg;
    let corpus = load_training_corpus(source, config)?;
    let (ensemble, report) = train_ensemble(super::build_cache(false), &corpus, config)?;
    let model = ensemble.save().context("trained ensemble has no saved form")?;

    eprintln!("Training completed");
    eprintln!("  Samples: {}", report.sample_count);
    eprintln!("  Models: {}", report.models.join(", "));
    if !report.skipped_backends.is_empty() {
        eprintln!("  Skipped: {}", report.skipped_backends.join(", "));
    }
    eprintln!("  Overall confidence: {:.3}", report.confidence.overall);
    for (school, confidence) in &report.confidence.per_school {
        eprintln!("    {school:<14} {confidence:.3}");
    }

    util::save_json(&model, output.clone())?;
    if let Some(path) = output {
        eprintln!("Model saved to {}", path.display());
    }
    Ok(())
}
