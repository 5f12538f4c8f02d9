use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;

use super::{DatabaseArgs, print_json};
use crate::application::config::require_database_url;
use crate::application::services::{DedupeStore, import_directory};
use crate::infrastructure::database::Database;
use crate::infrastructure::repositories::SqlWallpaperRepository;

#[derive(Debug, Args)]
pub struct ImportCommand {
    #[command(flatten)]
    pub database: DatabaseArgs,

    /// Directory holding the `<market>_all.json` files
    #[arg(long, default_value = "data")]
    pub dir: PathBuf,
}

pub async fn run(command: ImportCommand) -> Result<()> {
    let database_url = require_database_url(command.database.url())?;
    let database = Database::connect(&database_url)
        .await
        .context("failed to connect to database")?;
    let store = DedupeStore::new(Arc::new(SqlWallpaperRepository::new(database.clone_pool())));

    let report = import_directory(&store, &command.dir).await?;
    print_json(&report)
}
