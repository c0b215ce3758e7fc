use std::{
    fs::File,
    io::{self, BufWriter, StdoutLock},
    path::{Path, PathBuf},
};

use anyhow::Context;
use spellweave_corpus::{
    corpus::{CorpusConfig, TrainingCorpus},
    data_point::TrainingDataPoint,
};
use spellweave_training::ensemble::SavedEnsemble;
use tracing_subscriber::EnvFilter;

use crate::model::query::InteractionQuery;

/// Installs the stderr log subscriber.
///
/// `RUST_LOG` takes precedence; otherwise the level is `info`, or `debug`
/// with `--verbose`.
pub(crate) fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Destination of a command result: stdout, or a file when `--output` is given.
#[derive(Debug)]
pub(crate) enum Output {
    Stdout(StdoutLock<'static>),
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    pub(crate) fn create(path: Option<PathBuf>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::Stdout(io::stdout().lock()));
        };
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Self::File {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub(crate) fn target(&self) -> String {
        match self {
            Self::Stdout(_) => "stdout".to_owned(),
            Self::File { path, .. } => path.display().to_string(),
        }
    }

    fn writer(&mut self) -> &mut dyn io::Write {
        match self {
            Self::Stdout(writer) => writer,
            Self::File { writer, .. } => writer,
        }
    }

    /// Writes `value` as pretty JSON followed by a newline.
    pub(crate) fn write_json<T>(mut self, value: &T) -> anyhow::Result<()>
    where
        T: serde::Serialize + ?Sized,
    {
        serde_json::to_writer_pretty(self.writer(), value)
            .with_context(|| format!("Failed to write JSON to {}", self.target()))?;
        self.finish("\n")
    }

    pub(crate) fn write_text(mut self, text: &str) -> anyhow::Result<()> {
        self.finish(text)
    }

    fn finish(&mut self, tail: &str) -> anyhow::Result<()> {
        let target = self.target();
        let writer = self.writer();
        writer
            .write_all(tail.as_bytes())
            .and_then(|()| writer.flush())
            .with_context(|| format!("Failed to write to {target}"))
    }
}

pub(crate) fn save_json<T>(value: &T, path: Option<PathBuf>) -> anyhow::Result<()>
where
    T: serde::Serialize + ?Sized,
{
    Output::create(path)?.write_json(value)
}

pub(crate) fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}

/// Reads a corpus snapshot written by `generate-corpus` or `export --format json`.
///
/// Points are recorded in file order, so deduplication and eviction apply as
/// if they had been observed live.
pub(crate) fn read_corpus_file<P>(path: P, config: CorpusConfig) -> anyhow::Result<TrainingCorpus>
where
    P: AsRef<Path>,
{
    let points: Vec<TrainingDataPoint> = read_json_file("corpus", path)?;
    let read = points.len();
    let corpus = TrainingCorpus::from_points(config, points);
    tracing::info!(read, retained = corpus.len(), "loaded corpus");
    Ok(corpus)
}

pub(crate) fn read_query_file<P>(path: P) -> anyhow::Result<InteractionQuery>
where
    P: AsRef<Path>,
{
    read_json_file("query", path)
}

pub(crate) fn read_model_file<P>(path: P) -> anyhow::Result<SavedEnsemble>
where
    P: AsRef<Path>,
{
    read_json_file("model", path)
}
