use std::path::PathBuf;

use anyhow::Context as _;
use spellweave_corpus::corpus::ExportFormat;

use crate::{config::Config, util::{self, Output}};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub(crate) enum Format {
    Json,
    #[default]
    Csv,
}

impl From<Format> for ExportFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Json => ExportFormat::Json,
            Format::Csv => ExportFormat::Csv,
        }
    }
}

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ExportArg {
    /// Corpus snapshot JSON file
    corpus: PathBuf,
    /// Output format (json or csv)
    #[arg(long, default_value = "csv")]
    format: Format,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &ExportArg, config: &Config) -> anyhow::Result<()> {
    let ExportArg {
        corpus,
        format,
        output,
    } = arg;
    let corpus = util::read_corpus_file(corpus, config.corpus)?;
    let text = corpus
        .export((*format).into())
        .with_context(|| format!("Failed to export corpus as {format:?}"))?;

    let output = Output::create(output.clone())?;
    let destination = output.target();
    output.write_text(&text)?;
    tracing::info!(
        points = corpus.len(),
        format = ?format,
        destination,
        "corpus exported"
    );
    Ok(())
}
