use std::path::PathBuf;

use crate::util;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct AnalyzeArg {
    /// Query JSON file with primary, secondary, actor and context
    query: PathBuf,
    /// Skip the built-in plugins
    #[arg(long)]
    no_plugins: bool,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &AnalyzeArg) -> anyhow::Result<()> {
    let AnalyzeArg {
        query,
        no_plugins,
        output,
    } = arg;
    let query = util::read_query_file(query)?;
    let cache = super::build_cache(*no_plugins);
    let analysis = cache.get_or_compute(
        &query.primary,
        &query.secondary,
        &query.actor,
        &query.context,
    );
    tracing::info!(
        score = analysis.compatibility_score,
        interaction_type = %analysis.interaction_type,
        plugins = cache.registry().len(),
        "analysis complete"
    );
    util::save_json(&analysis, output.clone())
}
