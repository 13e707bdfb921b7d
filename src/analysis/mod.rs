// src/analysis/mod.rs
use crate::config::Config;
use crate::fetch::SeasonTable;
use anyhow::{Context, Result};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::path::Path;

/// One player's change across two strictly consecutive seasons.
#[derive(Debug, Clone, PartialEq)]
pub struct DeltaRecord {
    pub player: String,
    pub prev_season: i32,
    pub season: i32,
    pub prev_metric: f64,
    pub metric: f64,
    pub delta: f64,
    pub prev_games: f64,
    pub games: f64,
}

/// A player's current season plus their three prior recorded seasons.
/// `prev_metric[0]` / `prev_games[0]` is the most recent prior season.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryWindow {
    pub player: String,
    pub season: i32,
    pub metric: f64,
    pub games: f64,
    pub prev_metric: [f64; 3],
    pub prev_games: [f64; 3],
}

struct MetricRow {
    player: String,
    season: f64,
    metric: f64,
    games: f64,
}

fn parse_num(s: &str) -> Option<f64> {
    let t = s.trim();
    if t.is_empty() {
        return None;
    }
    t.parse().ok()
}

/// Project the master dataset down to (Player, Season, metric, G), numeric,
/// stable-sorted by (Player, Season). Rows that fail coercion are dropped,
/// never imputed; within-season duplicates keep their file order.
fn project_rows(master: &SeasonTable, metric_col: &str) -> Result<Vec<MetricRow>> {
    let player = master
        .column("Player")
        .context("master dataset has no Player column")?;
    let season = master
        .column("Season")
        .context("master dataset has no Season column")?;
    let metric = master
        .column(metric_col)
        .with_context(|| format!("master dataset has no {metric_col} column"))?;
    let games = master
        .column("G")
        .context("master dataset has no G column")?;

    let mut rows: Vec<MetricRow> = Vec::with_capacity(master.rows.len());
    for row in &master.rows {
        let name = row.get(player).map(|s| s.trim()).unwrap_or_default();
        if name.is_empty() {
            continue;
        }
        let (Some(season), Some(metric), Some(games)) = (
            row.get(season).and_then(|s| parse_num(s)),
            row.get(metric).and_then(|s| parse_num(s)),
            row.get(games).and_then(|s| parse_num(s)),
        ) else {
            continue;
        };
        rows.push(MetricRow {
            player: name.to_string(),
            season,
            metric,
            games,
        });
    }

    rows.sort_by(|a, b| {
        a.player.cmp(&b.player).then(
            a.season
                .partial_cmp(&b.season)
                .unwrap_or(Ordering::Equal),
        )
    });
    Ok(rows)
}

/// Season-over-season deltas of the configured metric.
///
/// Only strictly consecutive season pairs count — a player who sat out a
/// year does not get credited with a two-year jump — and both seasons must
/// meet the games threshold. Repeated (Player, PrevSeason, Season) pairs,
/// which appear if the loader ingested a season twice, keep the first
/// occurrence. Result is ordered by delta descending, stable.
pub fn compute_deltas(master: &SeasonTable, cfg: &Config) -> Result<Vec<DeltaRecord>> {
    let rows = project_rows(master, &cfg.metric_col)?;
    let min_games = f64::from(cfg.min_games);

    let mut out: Vec<DeltaRecord> = Vec::new();
    let mut seen: HashSet<(String, i64, i64)> = HashSet::new();
    for (i, cur) in rows.iter().enumerate().skip(1) {
        let prev = &rows[i - 1];
        if prev.player != cur.player {
            continue;
        }
        if cur.season - prev.season != 1.0 {
            continue;
        }
        if cur.games < min_games || prev.games < min_games {
            continue;
        }
        if !seen.insert((cur.player.clone(), prev.season as i64, cur.season as i64)) {
            continue;
        }
        out.push(DeltaRecord {
            player: cur.player.clone(),
            prev_season: prev.season as i32,
            season: cur.season as i32,
            prev_metric: prev.metric,
            metric: cur.metric,
            delta: cur.metric - prev.metric,
            prev_games: prev.games,
            games: cur.games,
        });
    }

    out.sort_by(|a, b| b.delta.partial_cmp(&a.delta).unwrap_or(Ordering::Equal));
    Ok(out)
}

/// Fixed-width history windows: each player's season with the metric and
/// games of the three prior recorded seasons.
///
/// Unlike `compute_deltas` this does not require the prior rows to be
/// season-adjacent; the lags are "the prior three recorded rows, however
/// spaced". All four games values must meet the threshold.
pub fn compute_history_windows(master: &SeasonTable, cfg: &Config) -> Result<Vec<HistoryWindow>> {
    let rows = project_rows(master, &cfg.metric_col)?;
    let min_games = f64::from(cfg.min_games);

    let mut out: Vec<HistoryWindow> = Vec::new();
    for (i, cur) in rows.iter().enumerate().skip(3) {
        let lags = [&rows[i - 1], &rows[i - 2], &rows[i - 3]];
        if lags.iter().any(|l| l.player != cur.player) {
            continue;
        }
        if cur.games < min_games || lags.iter().any(|l| l.games < min_games) {
            continue;
        }
        out.push(HistoryWindow {
            player: cur.player.clone(),
            season: cur.season as i32,
            metric: cur.metric,
            games: cur.games,
            prev_metric: [lags[0].metric, lags[1].metric, lags[2].metric],
            prev_games: [lags[0].games, lags[1].games, lags[2].games],
        });
    }
    Ok(out)
}

/// Export the full (untruncated) delta set.
pub fn write_deltas_csv(path: &Path, metric_col: &str, deltas: &[DeltaRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let prev_col = format!("Prev_{metric_col}");
    let change_col = format!("{metric_col}_change");
    wtr.write_record([
        "Player",
        "Prev_Season",
        "Season",
        prev_col.as_str(),
        metric_col,
        change_col.as_str(),
        "Prev_G",
        "G",
    ])?;
    for d in deltas {
        wtr.write_record(&[
            d.player.clone(),
            d.prev_season.to_string(),
            d.season.to_string(),
            d.prev_metric.to_string(),
            d.metric.to_string(),
            d.delta.to_string(),
            d.prev_games.to_string(),
            d.games.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
