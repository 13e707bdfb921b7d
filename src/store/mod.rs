// src/store/mod.rs
use crate::config::Config;
use crate::fetch::SeasonTable;
use crate::merge;
use anyhow::{Context, Result};
use glob::glob;
use reqwest::Client;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info, warn};

/// Raised when the data directory holds no season files at analysis time.
#[derive(Debug, Error)]
#[error("no season files found in {}", dir.display())]
pub struct EmptyCorpus {
    pub dir: PathBuf,
}

pub fn season_path(data_dir: &Path, season: i32) -> PathBuf {
    data_dir.join(format!("nba_{season}_player_stats.csv"))
}

/// Build the season corpus for the configured range. Idempotent: a season
/// whose file already exists is skipped without any network traffic. A
/// season whose merge fails is logged and skipped, so one bad year cannot
/// abort a long scrape; the merge runs to completion before anything is
/// written, so there are no partial files.
pub async fn build_corpus(client: &Client, cfg: &Config) -> Result<()> {
    fs::create_dir_all(&cfg.data_dir)
        .with_context(|| format!("creating data directory {}", cfg.data_dir.display()))?;

    for season in cfg.start_year..=cfg.end_year {
        let path = season_path(&cfg.data_dir, season);
        if path.exists() {
            info!(season, path = %path.display(), "season file exists; skipping");
            continue;
        }
        match merge::merge_season(client, cfg, season).await {
            Ok(table) => {
                write_season(&path, &table)
                    .with_context(|| format!("writing {}", path.display()))?;
                info!(season, rows = table.rows.len(), path = %path.display(), "season written");
            }
            Err(err) => {
                error!(season, error = %err, "season failed; continuing");
            }
        }
    }
    Ok(())
}

pub fn write_season(path: &Path, table: &SeasonTable) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(&table.headers)?;
    for row in &table.rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn read_season(path: &Path) -> Result<SeasonTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)?;
    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for (idx, record) in rdr.records().enumerate() {
        let record =
            record.with_context(|| format!("CSV parse error in {} at row {idx}", path.display()))?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(SeasonTable { headers, rows })
}

/// Concatenate every persisted season, in sorted filename order, into one
/// master dataset. Files are taken as-is: if the same season was persisted
/// twice both contribute rows (the differencing engine de-duplicates).
pub fn load_corpus(data_dir: &Path) -> Result<SeasonTable> {
    let pattern = format!("{}/nba_*_player_stats.csv", data_dir.display());
    let mut paths: Vec<PathBuf> = glob(&pattern)
        .context("invalid corpus glob pattern")?
        .filter_map(std::result::Result::ok)
        .collect();
    paths.sort();

    if paths.is_empty() {
        return Err(EmptyCorpus {
            dir: data_dir.to_path_buf(),
        }
        .into());
    }

    let mut master = read_season(&paths[0])
        .with_context(|| format!("reading {}", paths[0].display()))?;
    for path in &paths[1..] {
        let table = read_season(path).with_context(|| format!("reading {}", path.display()))?;
        if table.headers != master.headers {
            warn!(path = %path.display(), "season file headers differ from corpus");
        }
        master.rows.extend(table.rows);
    }
    info!(files = paths.len(), rows = master.rows.len(), "corpus loaded");
    Ok(master)
}
