use std::{
    fs::File,
    io::{self, BufReader, BufWriter, StdoutLock, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::Args;
use cohortlens_analysis::{
    report::ReportConfig,
    store::{RawRow, ResponseStore},
};
use serde::{Serialize, de::DeserializeOwned};

/// Where JSON results go: stdout unless `--output` names a file
#[derive(Debug)]
pub enum Output {
    Stdout(StdoutLock<'static>),
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    /// Pretty-print `value` followed by a newline to `path`, or stdout
    pub fn save_json<T>(value: &T, path: Option<&Path>) -> anyhow::Result<()>
    where
        T: Serialize + ?Sized,
    {
        let mut output = match path {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("Failed to create output file: {}", path.display()))?;
                Output::File {
                    writer: BufWriter::new(file),
                    path: path.to_owned(),
                }
            }
            None => Output::Stdout(io::stdout().lock()),
        };
        output.write_json(value)
    }

    fn target(&self) -> String {
        match self {
            Output::Stdout(_) => "stdout".to_owned(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Output::Stdout(writer) => writer,
            Output::File { writer, .. } => writer,
        }
    }

    fn write_json<T>(&mut self, value: &T) -> anyhow::Result<()>
    where
        T: Serialize + ?Sized,
    {
        let target = self.target();
        let writer = self.writer();
        serde_json::to_writer_pretty(&mut *writer, value)
            .with_context(|| format!("Failed to write JSON to {target}"))?;
        writeln!(writer)
            .and_then(|()| writer.flush())
            .with_context(|| format!("Failed to flush output to {target}"))?;
        if let Output::File { path, .. } = self {
            tracing::debug!(path = %path.display(), "wrote JSON output");
        }
        Ok(())
    }
}

/// Deserialize a JSON file, naming `file_kind` and the path in errors
pub fn read_json_file<T>(file_kind: &str, path: &Path) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let file = File::open(path)
        .with_context(|| format!("Failed to open {file_kind} file: {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {file_kind} JSON file: {}", path.display()))
}

/// Read survey rows from a JSON file
///
/// The file holds an array of objects mapping column names to string or
/// `null` values.
pub fn read_rows_file(path: &Path) -> anyhow::Result<Vec<RawRow>> {
    read_json_file("rows", path)
}

/// Read report configuration from a JSON file
///
/// Omitted fields take their defaults.
pub fn read_config_file(path: &Path) -> anyhow::Result<ReportConfig> {
    read_json_file("config", path)
}

/// Input options shared by every analysis command
#[derive(Debug, Clone, Args)]
pub(crate) struct InputArg {
    /// Path to the survey rows JSON file
    pub rows: PathBuf,

    /// Path to a report configuration JSON file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Skip malformed rows instead of aborting
    #[arg(long)]
    pub lenient: bool,
}

impl InputArg {
    pub fn load_config(&self) -> anyhow::Result<ReportConfig> {
        match &self.config {
            Some(path) => read_config_file(path),
            None => Ok(ReportConfig::default()),
        }
    }

    /// Load the configuration and the response store it describes
    pub fn load(&self) -> anyhow::Result<(ReportConfig, ResponseStore)> {
        let config = self.load_config()?;
        let rows = read_rows_file(&self.rows)?;
        let store = load_store(rows, &config, self.lenient)
            .with_context(|| format!("Failed to load responses from {}", self.rows.display()))?;
        Ok((config, store))
    }
}

fn load_store(
    rows: Vec<RawRow>,
    config: &ReportConfig,
    lenient: bool,
) -> anyhow::Result<ResponseStore> {
    if !lenient {
        return Ok(ResponseStore::load(rows, &config.columns)?);
    }

    let (store, rejected) = ResponseStore::load_lenient(rows, &config.columns);
    for err in &rejected {
        tracing::warn!("skipped {err}");
    }
    if !rejected.is_empty() {
        tracing::warn!(
            skipped = rejected.len(),
            loaded = store.len(),
            "some rows were malformed"
        );
    }
    Ok(store)
}
