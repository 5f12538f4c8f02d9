pub mod fetch;
pub mod import;

use std::net::SocketAddr;

use clap::{Args, Parser, Subcommand};

use fetch::FetchCommand;
use import::ImportCommand;

#[derive(Debug, Parser)]
#[command(author, version, about = "Archive and serve the daily wallpaper", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the HTTP server
    Serve(ServeCommand),

    /// Fetch today's wallpaper for each market and store new ones
    Fetch(FetchCommand),

    /// Load `<market>_all.json` archive files into the database
    Import(ImportCommand),
}

/// Database location shared by every command.
#[derive(Debug, Args)]
pub struct DatabaseArgs {
    #[arg(long, env = "DAILYWALL_DATABASE_URL")]
    pub database_url: Option<String>,
}

impl DatabaseArgs {
    pub fn url(&self) -> &str {
        self.database_url.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Args)]
pub struct ServeCommand {
    #[command(flatten)]
    pub database: DatabaseArgs,

    #[arg(long, env = "DAILYWALL_BIND_ADDRESS", default_value = "127.0.0.1:3000")]
    pub bind_address: SocketAddr,

    /// Token required by the private endpoints
    #[arg(long, env = "DAILYWALL_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Market served by `/today` when the request names none
    #[arg(long, env = "DAILYWALL_DEFAULT_MARKET", default_value = "zh-CN")]
    pub default_market: String,
}

pub(crate) fn print_json<T>(value: &T) -> anyhow::Result<()>
where
    T: serde::Serialize,
{
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
