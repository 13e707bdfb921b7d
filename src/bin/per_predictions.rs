// Three-season history windows for prediction use, ranked by current metric.
use anyhow::Result;
use perscrape::{analysis, config::Config, store};
use std::cmp::Ordering;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let cfg = Config::load_or_default("perscrape.yaml")?;
    let master = store::load_corpus(&cfg.data_dir)?;
    let mut windows = analysis::compute_history_windows(&master, &cfg)?;
    windows.sort_by(|a, b| b.metric.partial_cmp(&a.metric).unwrap_or(Ordering::Equal));

    println!(
        "\nTop {} seasons with three eligible prior seasons (min {} games each):",
        cfg.metric_col, cfg.min_games
    );
    println!(
        "{:<24} {:>7} {:>7} {:>5} {:>8} {:>6} {:>8} {:>6} {:>8} {:>6}",
        "Player", "Season", cfg.metric_col, "G", "Lag1", "G1", "Lag2", "G2", "Lag3", "G3",
    );
    for w in windows.iter().take(cfg.report_size) {
        println!(
            "{:<24} {:>7} {:>7.1} {:>5} {:>8.1} {:>6} {:>8.1} {:>6} {:>8.1} {:>6}",
            w.player,
            w.season,
            w.metric,
            w.games,
            w.prev_metric[0],
            w.prev_games[0],
            w.prev_metric[1],
            w.prev_games[1],
            w.prev_metric[2],
            w.prev_games[2],
        );
    }
    Ok(())
}
