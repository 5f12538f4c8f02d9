use std::sync::Arc;

use crate::domain::repositories::WallpaperRepository;
use crate::domain::wallpapers::Market;
use crate::infrastructure::auth::hash_token;
use crate::infrastructure::database::Database;
use crate::infrastructure::repositories::SqlWallpaperRepository;

/// Settings that vary between production and tests. Repositories are
/// created from the database pool.
pub struct AppStateConfig {
    pub api_token: String,
    pub default_market: Market,
}

#[derive(Clone)]
pub struct AppState {
    pub wallpaper_repo: Arc<dyn WallpaperRepository>,
    pub api_token_hash: Arc<str>,
    pub default_market: Market,
}

impl AppState {
    pub fn from_database(database: &Database, config: AppStateConfig) -> Self {
        let wallpaper_repo: Arc<dyn WallpaperRepository> =
            Arc::new(SqlWallpaperRepository::new(database.clone_pool()));

        Self {
            wallpaper_repo,
            api_token_hash: Arc::from(hash_token(&config.api_token)),
            default_market: config.default_market,
        }
    }
}
