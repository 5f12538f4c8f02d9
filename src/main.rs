use anyhow::Result;
use clap::Parser;
use dailywall::application::{ServerConfig, serve};
use dailywall::presentation::cli::{Cli, Commands, ServeCommand, fetch, import};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (before clap parses env vars)
    let _ = dotenvy::dotenv();

    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(cmd) => run_server(cmd).await,
        Commands::Fetch(cmd) => fetch::run(cmd).await,
        Commands::Import(cmd) => import::run(cmd).await,
    }
}

async fn run_server(command: ServeCommand) -> Result<()> {
    let config = ServerConfig::new(
        command.bind_address,
        command.database.url(),
        command.api_token.as_deref().unwrap_or_default(),
        &command.default_market,
    )?;

    serve(config).await
}

#[allow(clippy::expect_used)] // Startup: panicking is appropriate if logging cannot be initialized
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var("RUST_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(env_filter);

    if use_json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().compact())
            .init();
    }
}
