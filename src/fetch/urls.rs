// src/fetch/urls.rs
use crate::fetch::TableKind;

/// Resolve the page for one (season, kind) pair, e.g.
/// `https://www.basketball-reference.com/leagues/NBA_2024_per_game.html`.
pub fn season_url(base: &str, season: i32, kind: TableKind) -> String {
    format!(
        "{}/leagues/NBA_{}_{}.html",
        base.trim_end_matches('/'),
        season,
        kind.slug()
    )
}
