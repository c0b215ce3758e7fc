use std::{path::PathBuf, sync::Arc};

use clap::{Parser, Subcommand};
use spellweave_analyzer::{cache::InteractionCache, plugin::PluginRegistry};

use crate::{config::Config, util};

use self::{
    analyze::AnalyzeArg, export::ExportArg, generate_corpus::GenerateCorpusArg,
    predict::PredictArg, report::ReportArg, train::TrainArg,
};

mod analyze;
mod export;
mod generate_corpus;
mod predict;
mod report;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Log at debug level unless RUST_LOG is set
    #[arg(long, short, global = true)]
    verbose: bool,
    /// TOML file overriding the default tunables
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Analyze a spell combination with the rule-based analyzer and plugins
    Analyze(#[clap(flatten)] AnalyzeArg),
    /// Predict a spell combination with a trained model
    Predict(#[clap(flatten)] PredictArg),
    /// Generate a synthetic training corpus
    GenerateCorpus(#[clap(flatten)] GenerateCorpusArg),
    /// Train the regressor ensemble and save the model
    Train(#[clap(flatten)] TrainArg),
    /// Convert a corpus snapshot to JSON or CSV
    Export(#[clap(flatten)] ExportArg),
    /// Print corpus statistics and a dataset quality report
    Report(#[clap(flatten)] ReportArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    util::init_tracing(args.verbose);
    let config = Config::load(args.config.as_deref())?;
    match &args.mode {
        Mode::Analyze(arg) => analyze::run(arg)?,
        Mode::Predict(arg) => predict::run(arg, &config)?,
        Mode::GenerateCorpus(arg) => generate_corpus::run(arg, &config)?,
        Mode::Train(arg) => train::run(arg, &config)?,
        Mode::Export(arg) => export::run(arg, &config)?,
        Mode::Report(arg) => report::run(arg, &config)?,
    }
    Ok(())
}

fn build_cache(no_plugins: bool) -> Arc<InteractionCache> {
    let registry = if no_plugins {
        PluginRegistry::new()
    } else {
        PluginRegistry::with_builtin_plugins()
    };
    Arc::new(InteractionCache::with_registry(registry))
}
