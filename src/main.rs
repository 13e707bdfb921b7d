use anyhow::Result;
use perscrape::{config::Config, fetch, store};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();
    info!("startup");

    // ─── 2) load configuration ───────────────────────────────────────
    let cfg = Config::load_or_default("perscrape.yaml")?;
    info!(
        start = cfg.start_year,
        end = cfg.end_year,
        data_dir = %cfg.data_dir.display(),
        "building season corpus"
    );

    // ─── 3) scrape, merge and persist each season ────────────────────
    let client = fetch::build_client(&cfg)?;
    store::build_corpus(&client, &cfg).await?;

    info!("all done");
    Ok(())
}
