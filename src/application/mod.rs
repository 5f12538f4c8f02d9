pub mod auth;
pub mod config;
pub mod errors;
pub mod routes;
pub mod server;
pub mod services;
pub mod state;

pub use config::{ConfigError, FetchConfig, ServerConfig};
pub use server::serve;
