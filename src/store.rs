use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::formats::{HistoryRow, Observation};

const HISTORY_FILE: &str = "price_history.csv";

/// Writes the per-run JSON snapshot and appends the CSV history row.
/// Recorder failures are logged and never abort the run.
pub fn record(data_dir: &Path, observation: &Observation) {
    if let Err(err) = write_snapshot(data_dir, observation) {
        tracing::error!(?err, "failed to save price data");
    }
    if let Err(err) = append_history(data_dir, observation) {
        tracing::error!(?err, "failed to append price history");
    }
}

/// One JSON file per run, named by timestamp.
pub fn write_snapshot(data_dir: &Path, observation: &Observation) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("create data dir: {}", data_dir.display()))?;

    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let path = data_dir.join(format!("price_data_{stamp}.json"));
    let json = serde_json::to_string_pretty(observation).context("serialize observation")?;
    std::fs::write(&path, json)
        .with_context(|| format!("write price data: {}", path.display()))?;

    tracing::info!(path = %path.display(), "price data saved");
    Ok(path)
}

/// Appends one row to `price_history.csv`; the header is written exactly
/// once, when the file is first created.
pub fn append_history(data_dir: &Path, observation: &Observation) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("create data dir: {}", data_dir.display()))?;

    let path = data_dir.join(HISTORY_FILE);
    let is_new = !path.exists();

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open price history: {}", path.display()))?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);

    if is_new {
        writer
            .write_record(HistoryRow::HEADER)
            .context("write price history header")?;
    }
    writer
        .serialize(HistoryRow::from(observation))
        .context("write price history row")?;
    writer.flush().context("flush price history")?;

    tracing::info!(path = %path.display(), "price history appended");
    Ok(path)
}
