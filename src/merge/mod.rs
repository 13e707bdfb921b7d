// src/merge/mod.rs
use crate::config::Config;
use crate::fetch::{self, SeasonTable, TableKind};
use anyhow::{Context, Result};
use reqwest::Client;
use std::collections::{HashMap, HashSet};
use tracing::{info, warn};

/// Advanced-table columns that duplicate per-game columns. Dropped before
/// the join; only the ones actually present matter.
const DUPLICATE_ADVANCED_COLS: &[&str] = &["Rk", "Pos", "Age", "Team", "Tm", "G", "GS", "MP"];

/// Fetch both views of one season and join them into a single
/// row-per-player table. The two fetches are sequential with polite pacing
/// in between. An empty join result is valid — zero overlap is not a fetch
/// failure.
pub async fn merge_season(client: &Client, cfg: &Config, season: i32) -> Result<SeasonTable> {
    let basic = fetch::fetch_table(client, cfg, season, TableKind::PerGame)
        .await
        .with_context(|| format!("fetching per-game table for {season}"))?;
    fetch::polite_sleep(cfg).await;
    let advanced = fetch::fetch_table(client, cfg, season, TableKind::Advanced)
        .await
        .with_context(|| format!("fetching advanced table for {season}"))?;

    let merged = merge_tables(
        &tag_season(basic, season),
        &tag_season(advanced, season),
    )?;
    info!(season, rows = merged.rows.len(), "merged season");
    Ok(merged)
}

/// Stamp every row with its season so the join key and all downstream
/// grouping carry (Player, Season).
pub fn tag_season(mut table: SeasonTable, season: i32) -> SeasonTable {
    table.headers.push("Season".to_string());
    for row in &mut table.rows {
        row.push(season.to_string());
    }
    table
}

/// Inner-join two tagged tables on (Player, Season).
///
/// The basic side contributes all of its columns (first occurrence wins if
/// a label repeats); the advanced side contributes whatever is left after
/// dropping the known-duplicate set and anything that still collides. The
/// first row per key wins on both sides, so no (Player, Season) pair is
/// emitted twice.
pub fn merge_tables(basic: &SeasonTable, advanced: &SeasonTable) -> Result<SeasonTable> {
    let b_player = basic
        .column("Player")
        .context("per-game table has no Player column")?;
    let b_season = basic
        .column("Season")
        .context("per-game table has no Season column")?;
    let a_player = advanced
        .column("Player")
        .context("advanced table has no Player column")?;
    let a_season = advanced
        .column("Season")
        .context("advanced table has no Season column")?;

    // basic columns, de-duplicated keep-first
    let mut headers: Vec<String> = Vec::new();
    let mut keep_basic: Vec<usize> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    for (i, h) in basic.headers.iter().enumerate() {
        if !seen.insert(h.as_str()) {
            warn!(column = %h, "duplicate per-game column; keeping first occurrence");
            continue;
        }
        keep_basic.push(i);
        headers.push(h.clone());
    }

    // surviving advanced columns
    let drop: HashSet<&str> = DUPLICATE_ADVANCED_COLS.iter().copied().collect();
    let mut keep_adv: Vec<usize> = Vec::new();
    for (i, h) in advanced.headers.iter().enumerate() {
        if i == a_player || i == a_season || drop.contains(h.as_str()) {
            continue;
        }
        if !seen.insert(h.as_str()) {
            warn!(column = %h, "advanced column collides with per-game column; dropping");
            continue;
        }
        keep_adv.push(i);
        headers.push(h.clone());
    }

    // first advanced row per key wins
    let mut adv_by_key: HashMap<(&str, &str), &Vec<String>> = HashMap::new();
    for row in &advanced.rows {
        let key = (cell(row, a_player), cell(row, a_season));
        adv_by_key.entry(key).or_insert(row);
    }

    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut emitted: HashSet<(String, String)> = HashSet::new();
    for row in &basic.rows {
        let key = (cell(row, b_player), cell(row, b_season));
        let Some(adv_row) = adv_by_key.get(&key) else {
            continue;
        };
        if !emitted.insert((key.0.to_string(), key.1.to_string())) {
            continue;
        }
        let mut out: Vec<String> = keep_basic
            .iter()
            .map(|&i| cell(row, i).to_string())
            .collect();
        out.extend(keep_adv.iter().map(|&i| cell(adv_row, i).to_string()));
        rows.push(out);
    }

    Ok(SeasonTable { headers, rows })
}

fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map(String::as_str).unwrap_or_default()
}
