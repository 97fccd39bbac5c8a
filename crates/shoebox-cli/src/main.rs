//! `shoebox` — command-line front end for the Shoebox photo library.
//!
//! Every invocation loads the catalog, runs one command, and saves the
//! catalog again if the command changed it.
//!
//! # Usage
//!
//! ```text
//! shoebox users add alice
//! shoebox albums alice create Paris
//! shoebox photos alice Paris add ~/Pictures/eiffel.jpg
//! shoebox tags alice Paris ~/Pictures/eiffel.jpg add location=paris
//! shoebox search alice tags --tag person=alice --tag location=paris --combine or
//! ```

mod args;
mod commands;
mod output;
mod settings;

use anyhow::Context as _;
use clap::Parser;
use shoebox_core::catalog::Catalog;
use shoebox_store_sqlite::SqliteStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use args::Cli;

fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let layout = settings::load_layout(&cli.config, cli.data_dir.clone())?;
  let store = SqliteStore::for_layout(&layout);
  let mut catalog = Catalog::load(&store, &layout);

  let outcome = commands::run(&mut catalog, cli.command)?;

  if outcome.changed {
    catalog
      .save(&store)
      .with_context(|| format!("failed to save catalog to {}", store.path().display()))?;
  }

  output::print(&outcome.output, cli.json)
}
