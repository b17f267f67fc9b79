//! `foodprice`: incremental loader for the food-price warehouse.
//!
//! # Usage
//!
//! ```text
//! foodprice load --extract wfp_food_prices_ken.csv
//! foodprice --config ~/.config/foodprice.toml stats --json
//! ```
//!
//! Exit status is 0 for a clean run, 2 for a run that completed degraded (a
//! dimension was not updated, or facts were inserted without the
//! existing-key check) and 1 for a fatal stage failure.

mod extract;
mod settings;

use std::{path::PathBuf, process::ExitCode};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use foodprice_core::store::WarehouseStore;
use foodprice_loader::Loader;
use foodprice_store_sqlite::SqliteStore;
use settings::{AppConfig, expand_tilde};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Incremental food-price warehouse loader")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "foodprice.toml", global = true)]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Load a CSV extract into the warehouse.
  Load {
    /// CSV extract to load; overrides `extract` from the config file.
    #[arg(short, long)]
    extract: Option<PathBuf>,

    /// Print the run summary as JSON.
    #[arg(long)]
    json: bool,
  },
  /// Print row counts of every warehouse table.
  Stats {
    #[arg(long)]
    json: bool,
  },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  let cfg = AppConfig::load(&cli.config)?;

  let store = SqliteStore::open(&cfg.store)
    .await
    .with_context(|| {
      format!("open-store stage failed: cannot open {}", cfg.store.path.display())
    })?;

  match cli.command {
    Command::Load { extract, json } => {
      let path = extract
        .map(|p| expand_tilde(&p))
        .or(cfg.extract)
        .context("read-extract stage failed: no extract given; pass --extract or set `extract`")?;

      let batch = extract::read_extract(&path)?;
      let loader = Loader::new(store, cfg.load);
      let summary = loader.run(&batch).await?;

      if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
      } else {
        println!("{summary}");
      }

      if summary.is_degraded() {
        tracing::warn!("run completed degraded; re-run once the store is healthy");
        return Ok(ExitCode::from(2));
      }
    }
    Command::Stats { json } => {
      let counts = store
        .table_counts()
        .await
        .context("stats stage failed: cannot count rows")?;
      if json {
        println!("{}", serde_json::to_string_pretty(&counts)?);
      } else {
        println!("dates         {}", counts.dates);
        println!("locations     {}", counts.locations);
        println!("commodities   {}", counts.commodities);
        println!("market types  {}", counts.market_types);
        println!("facts         {}", counts.facts);
      }
    }
  }

  Ok(ExitCode::SUCCESS)
}
