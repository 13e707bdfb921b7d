// src/fetch/mod.rs
pub mod tables;
pub mod urls;

use crate::config::Config;
use rand::Rng;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

pub use tables::SeasonTable;

/// The two statistical views published per season. Each resolves to its own
/// page; anything else is unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    PerGame,
    Advanced,
}

impl TableKind {
    pub fn slug(self) -> &'static str {
        match self {
            TableKind::PerGame => "per_game",
            TableKind::Advanced => "advanced",
        }
    }

    /// Columns a parsed table must carry before it is trusted. Guards
    /// against upstream layout changes handing us the wrong table.
    pub fn required_columns(self, metric_col: &str) -> [&str; 2] {
        match self {
            TableKind::PerGame => ["Player", "G"],
            TableKind::Advanced => ["Player", metric_col],
        }
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("source unavailable: {url} returned {status}")]
    SourceUnavailable { url: String, status: StatusCode },

    #[error("rate limited after {attempts} attempts: {url}")]
    RateLimitExhausted { url: String, attempts: u32 },

    #[error("no stats table found at {url}")]
    NoDataFound { url: String },

    #[error("table at {url} is missing expected columns: {missing:?}")]
    SchemaDrift { url: String, missing: Vec<String> },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Build the shared HTTP client: identifying user agent, bounded timeout.
pub fn build_client(cfg: &Config) -> anyhow::Result<Client> {
    let client = Client::builder()
        .user_agent(&cfg.user_agent)
        .timeout(Duration::from_secs(cfg.timeout_secs))
        .build()?;
    Ok(client)
}

/// Backoff before retry number `attempt` (zero-based): 2^attempt seconds
/// plus uniform jitter in [0, 1.5).
pub fn backoff_delay(attempt: u32) -> Duration {
    let jitter: f64 = rand::thread_rng().gen_range(0.0..1.5);
    Duration::from_secs_f64(2f64.powi(attempt as i32) + jitter)
}

/// Pacing between independent fetches (not retries): base interval plus
/// uniform jitter in [0.5, 1.5) seconds.
pub async fn polite_sleep(cfg: &Config) {
    let jitter: f64 = rand::thread_rng().gen_range(0.5..1.5);
    tokio::time::sleep(Duration::from_secs_f64(cfg.pacing_secs + jitter)).await;
}

/// Fetch one season table. 429 responses are retried with exponential
/// backoff up to `cfg.max_attempts` total attempts; any other failure is
/// immediate.
pub async fn fetch_table(
    client: &Client,
    cfg: &Config,
    season: i32,
    kind: TableKind,
) -> Result<SeasonTable, FetchError> {
    let url = urls::season_url(&cfg.base_url, season, kind);
    let max_attempts = cfg.max_attempts.max(1);

    for attempt in 0..max_attempts {
        let resp = client.get(&url).send().await?;
        let status = resp.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            if attempt + 1 == max_attempts {
                break;
            }
            let delay = backoff_delay(attempt);
            warn!(
                %url,
                attempt,
                delay_secs = delay.as_secs_f64(),
                "rate limited; backing off"
            );
            tokio::time::sleep(delay).await;
            continue;
        }

        if !status.is_success() {
            return Err(FetchError::SourceUnavailable { url, status });
        }

        let body = resp.text().await?;
        return tables::parse_season_table(&body, kind, &cfg.metric_col, &url);
    }

    Err(FetchError::RateLimitExhausted {
        url,
        attempts: max_attempts,
    })
}
