use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::application::services::ingest::DEFAULT_MARKETS;
use crate::domain::wallpapers::Market;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("a database URL is required (set DAILYWALL_DATABASE_URL)")]
    MissingDatabaseUrl,
    #[error("an API token is required (set DAILYWALL_API_TOKEN)")]
    MissingApiToken,
    #[error("invalid default market {0:?}")]
    InvalidMarket(String),
    #[error("invalid upstream URL {0:?}")]
    InvalidUpstreamUrl(String),
}

/// Everything `serve` needs, validated once at startup and passed down
/// explicitly.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub api_token: String,
    pub default_market: Market,
}

impl ServerConfig {
    pub fn new(
        bind_address: SocketAddr,
        database_url: &str,
        api_token: &str,
        default_market: &str,
    ) -> Result<Self, ConfigError> {
        let database_url = require_database_url(database_url)?;
        let api_token = api_token.trim();
        if api_token.is_empty() {
            return Err(ConfigError::MissingApiToken);
        }
        let default_market = Market::parse(default_market)
            .ok_or_else(|| ConfigError::InvalidMarket(default_market.to_string()))?;

        Ok(Self {
            bind_address,
            database_url,
            api_token: api_token.to_string(),
            default_market,
        })
    }
}

/// Settings for one ingestion run. An empty market list means every
/// default market.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub database_url: String,
    pub upstream_url: String,
    pub markets: Vec<Market>,
}

impl FetchConfig {
    pub fn new(
        database_url: &str,
        upstream_url: &str,
        markets: &[String],
    ) -> Result<Self, ConfigError> {
        let database_url = require_database_url(database_url)?;
        Url::parse(upstream_url)
            .map_err(|_| ConfigError::InvalidUpstreamUrl(upstream_url.to_string()))?;
        let markets = if markets.is_empty() {
            DEFAULT_MARKETS.iter().filter_map(|code| Market::parse(code)).collect()
        } else {
            markets
                .iter()
                .map(|code| {
                    Market::parse(code).ok_or_else(|| ConfigError::InvalidMarket(code.clone()))
                })
                .collect::<Result<Vec<_>, _>>()?
        };

        Ok(Self {
            database_url,
            upstream_url: upstream_url.to_string(),
            markets,
        })
    }
}

pub fn require_database_url(value: &str) -> Result<String, ConfigError> {
    let value = value.trim();
    if value.is_empty() {
        Err(ConfigError::MissingDatabaseUrl)
    } else {
        Ok(value.to_string())
    }
}
