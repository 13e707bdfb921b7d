// src/config.rs
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Static configuration for the scrape and analysis runs. Every knob lives
/// here rather than in module-level state so tests can run with their own
/// values.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// First season to scrape, inclusive.
    pub start_year: i32,
    /// Last season to scrape, inclusive.
    pub end_year: i32,
    /// Minimum games played for a season to count in delta/history output.
    pub min_games: u32,
    /// Column holding the metric being differenced.
    pub metric_col: String,
    /// Base sleep between the two fetches of a season, in seconds.
    /// Jitter in [0.5, 1.5) is added on top.
    pub pacing_secs: f64,
    /// Total attempts per fetch before a 429 is treated as fatal.
    pub max_attempts: u32,
    /// Rows shown in the console reports.
    pub report_size: usize,
    /// Directory holding one CSV per merged season.
    pub data_dir: PathBuf,
    /// Output path for the full delta export.
    pub delta_out: PathBuf,
    /// Scheme + host of the stats site.
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            start_year: 2010,
            end_year: 2024,
            min_games: 65,
            metric_col: "PER".to_string(),
            pacing_secs: 0.7,
            max_attempts: 6,
            report_size: 15,
            data_dir: PathBuf::from("data"),
            delta_out: PathBuf::from("per_changes.csv"),
            base_url: "https://www.basketball-reference.com".to_string(),
            user_agent: concat!("perscrape/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 30,
        }
    }
}

impl Config {
    /// Read `path` as a YAML overlay on the defaults. A missing file is not
    /// an error; a malformed one is.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let cfg = if path.exists() {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_yaml::from_str(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        } else {
            Config::default()
        };
        if cfg.start_year > cfg.end_year {
            bail!(
                "start_year {} is after end_year {}",
                cfg.start_year,
                cfg.end_year
            );
        }
        Ok(cfg)
    }
}
