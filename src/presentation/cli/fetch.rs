use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Args;

use super::{DatabaseArgs, print_json};
use crate::application::FetchConfig;
use crate::application::services::{DedupeStore, Fetcher, IngestionReport};
use crate::infrastructure::database::Database;
use crate::infrastructure::image_archive::{DEFAULT_UPSTREAM_URL, ImageArchiveClient};
use crate::infrastructure::repositories::SqlWallpaperRepository;

#[derive(Debug, Args)]
pub struct FetchCommand {
    #[command(flatten)]
    pub database: DatabaseArgs,

    #[arg(long, env = "DAILYWALL_UPSTREAM_URL", default_value = DEFAULT_UPSTREAM_URL)]
    pub upstream_url: String,

    /// Market to fetch; repeat for several. Defaults to every known market.
    #[arg(long = "market")]
    pub markets: Vec<String>,
}

/// Run one ingestion pass and print the per-market report.
///
/// Per-market failures are part of the report, not an error exit.
pub async fn run(command: FetchCommand) -> Result<()> {
    let config = FetchConfig::new(
        command.database.url(),
        &command.upstream_url,
        &command.markets,
    )?;
    let report = fetch(&config, Local::now().date_naive()).await?;
    print_json(&report)
}

pub async fn fetch(config: &FetchConfig, today: NaiveDate) -> Result<IngestionReport> {
    let database = Database::connect(&config.database_url)
        .await
        .context("failed to connect to database")?;
    let archive = ImageArchiveClient::new(&config.upstream_url)?;
    let store = DedupeStore::new(Arc::new(SqlWallpaperRepository::new(database.clone_pool())));

    Ok(Fetcher::new(archive, store).run(&config.markets, today).await)
}
