use std::path::PathBuf;

use serde::Serialize;
use spellweave_core::InteractionAnalysis;
use spellweave_training::ensemble::{OutcomeEstimate, PredictionEnsemble};

use crate::{config::Config, util};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PredictArg {
    /// Query JSON file with primary, secondary, actor and context
    query: PathBuf,
    /// Trained model JSON file written by `train`
    #[arg(long)]
    model: PathBuf,
    /// Skip the built-in plugins
    #[arg(long)]
    no_plugins: bool,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    rule_based: InteractionAnalysis,
    predicted: InteractionAnalysis,
    estimate: Option<OutcomeEstimate>,
}

pub(crate) fn run(arg: &PredictArg, config: &Config) -> anyhow::Result<()> {
    let PredictArg {
        query,
        model,
        no_plugins,
        output,
    } = arg;
    let query = util::read_query_file(query)?;
    let ensemble =
        PredictionEnsemble::new(super::build_cache(*no_plugins), vec![], config.confidence);
    ensemble.load(util::read_model_file(model)?)?;

    let (primary, secondary, actor, context) =
        (&query.primary, &query.secondary, &query.actor, &query.context);
    let rule_based = ensemble.cache().get_or_compute(primary, secondary, actor, context);
    let predicted = ensemble.predict(primary, secondary, actor, context);
    let estimate = ensemble.estimate(primary, secondary, actor, context);
    tracing::info!(
        rule_based = rule_based.compatibility_score,
        predicted = predicted.compatibility_score,
        adjusted = predicted != rule_based,
        "prediction complete"
    );

    util::save_json(
        &Prediction {
            rule_based,
            predicted,
            estimate,
        },
        output.clone(),
    )
}
