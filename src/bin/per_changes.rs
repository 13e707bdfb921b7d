// Season-over-season metric changes: top-N report plus full CSV export.
use anyhow::Result;
use perscrape::{analysis, config::Config, store};
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let cfg = Config::load_or_default("perscrape.yaml")?;
    let master = store::load_corpus(&cfg.data_dir)?;
    let deltas = analysis::compute_deltas(&master, &cfg)?;

    println!(
        "\nTop single-season {} improvements (min {} games in both seasons):",
        cfg.metric_col, cfg.min_games
    );
    println!(
        "{:<24} {:>11} {:>7} {:>9} {:>9} {:>11}",
        "Player",
        "Prev_Season",
        "Season",
        format!("Prev_{}", cfg.metric_col),
        cfg.metric_col,
        format!("{}_change", cfg.metric_col),
    );
    for d in deltas.iter().take(cfg.report_size) {
        println!(
            "{:<24} {:>11} {:>7} {:>9.1} {:>9.1} {:>+11.1}",
            d.player, d.prev_season, d.season, d.prev_metric, d.metric, d.delta
        );
    }

    analysis::write_deltas_csv(&cfg.delta_out, &cfg.metric_col, &deltas)?;
    println!(
        "\nSaved {} changes to: {}",
        cfg.metric_col,
        cfg.delta_out.display()
    );
    Ok(())
}
