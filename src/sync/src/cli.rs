//! CLI for ssq-sync.
//!
//! Runs with no arguments; flags only override configuration.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

use crate::config::AppConfig;
use crate::pipeline;
use crate::report::{print_report, Palette};
use crate::scraper::HttpDrawSource;

#[derive(Parser, Debug)]
#[command(name = "ssq-sync")]
#[command(version, about = "Fetch new SSQ draws and merge them into the local workbook", long_about = None)]
pub struct Cli {
    /// Workbook path (default: ssq_history.xlsx next to the executable)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Draws requested per page
    #[arg(short, long)]
    pub page_size: Option<u32>,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Apply flag overrides on top of loaded configuration
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(ref path) = self.output {
            config.output.path = Some(path.to_string_lossy().to_string());
        }
        if let Some(page_size) = self.page_size {
            config.source.page_size = page_size;
        }
    }
}

/// Fetch, merge and persist once.
pub async fn run_sync(cli: Cli) -> anyhow::Result<()> {
    let mut config = AppConfig::load().context("Failed to load configuration")?;
    cli.apply(&mut config);

    let path = config.output.resolve_path()?;
    println!("Workbook: {}", path.display());

    let source = HttpDrawSource::connect(config.source.clone())
        .await
        .context("Failed to open session with the draw endpoint")?;

    let report = pipeline::run(&source, &config).await.context("Sync failed")?;
    print_report(Palette::detect(), &report);

    Ok(())
}
