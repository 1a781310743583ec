//! SSQ draw history sync
//!
//! Fetches new draws from the China Welfare Lottery draw notice endpoint and
//! merges them into a local xlsx workbook.

mod cli;
mod config;
mod error;
mod pipeline;
mod report;
mod scraper;
mod storage;
mod types;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the progress lines
    let default_filter = if cli.verbose {
        "ssq_sync=debug"
    } else {
        "ssq_sync=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // anyhow reports the error chain on exit
    cli::run_sync(cli).await
}
