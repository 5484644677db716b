//! # Press Release Board
//!
//! Renders per-brand press release feeds into a single static HTML page.
//! Each brand publishes a small JSON document (written by a separate
//! ingestion job); this tool loads every document, turns each into a card
//! showing the latest release and the 20 most recent ones, and stamps the
//! page with the newest feed generation time.
//!
//! ## Usage
//!
//! ```sh
//! press_release_board --base ./docs -o ./docs/index.html
//! ```
//!
//! ## Architecture
//!
//! 1. **Registry**: The ordered list of brand feeds (built-in or YAML)
//! 2. **Loading**: Fetch each feed over HTTP(S) or from disk, caching disabled
//! 3. **Rendering**: One card per brand; a failed load becomes an error card
//! 4. **Output**: Mount the cards on a board and write it as `index.html`

use chrono::{Local, Utc};
use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod dates;
mod error;
mod loader;
mod models;
mod orchestrator;
mod outputs;
mod registry;
mod render;

use cli::Cli;
use loader::{HttpLoader, base_url};
use orchestrator::{FetchStrategy, refresh};
use outputs::page::{Board, ensure_writable_parent, write_board};
use registry::BrandRegistry;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("press_release_board starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // Fail before fetching anything if the page cannot be written.
    if let Err(e) = ensure_writable_parent(&args.output).await {
        error!(path = %args.output, error = %e, "Output directory is not writable");
        return Err(e);
    }

    let registry = match &args.registry {
        Some(path) => BrandRegistry::load(path).await?,
        None => {
            info!("Using built-in brand registry");
            BrandRegistry::default()
        }
    };

    let base = base_url(&args.base)?;
    let loader = HttpLoader::new(base, args.timeout_secs.map(Duration::from_secs))?;
    info!(base = %loader.base(), brands = registry.len(), "Loading feeds");

    let strategy = if args.concurrent {
        FetchStrategy::Concurrent
    } else {
        FetchStrategy::Sequential
    };

    let mut board = Board::new();
    let report = if args.utc {
        refresh(&registry, &loader, &mut board, strategy, &Utc).await
    } else {
        refresh(&registry, &loader, &mut board, strategy, &Local).await
    };

    write_board(&board, &args.output).await?;

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        loaded = report.loaded,
        failed = report.failed,
        last_updated = %board.last_updated(),
        path = %args.output,
        "Execution complete"
    );

    Ok(())
}
