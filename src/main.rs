//! Taxon Harvester — Binary Entrypoint
//! Reads a taxon list, harvests descriptions from every routed source and
//! writes one flat CSV table.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use taxon_harvester::batch;
use taxon_harvester::{AppConfig, Harvester, Rank};

#[derive(Parser)]
#[command(
    name = "taxon-harvester",
    about = "Harvest taxon descriptions from scraping targets, Wikipedia and the Artfakta API",
    version
)]
struct Cli {
    /// Taxonomic rank applied to every name in the list.
    #[arg(long)]
    rank: Rank,

    /// Text file with one scientific name per line.
    input: PathBuf,

    /// Destination CSV table.
    #[arg(long, short, default_value = "descriptions.csv")]
    output: PathBuf,

    /// Dyntaxa reference table (tab-separated Taxon.csv export).
    #[arg(long, default_value = "dyntaxa/Taxon.csv")]
    taxon_table: PathBuf,

    /// JSON secrets file holding the Artfakta subscription key.
    #[arg(long, default_value = "secrets.json")]
    secrets: PathBuf,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("taxon_harvester=info,warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op elsewhere.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();
    let cfg = AppConfig {
        reference_table: cli.taxon_table,
        secrets: cli.secrets,
        ..AppConfig::default()
    };

    let harvester = Harvester::from_config(&cfg)?;
    batch::run(&harvester, cli.rank, &cli.input, &cli.output).await
}
