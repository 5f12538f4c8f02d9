use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::listing::{ListRequest, Page};
use crate::domain::wallpapers::{Wallpaper, WallpaperFilter, WallpaperSort};

/// Accessor over the wallpaper collection.
///
/// The ingestion path uses `find_one` and `insert`; the read endpoints use
/// the rest. Implementations hold no business rules.
#[async_trait]
pub trait WallpaperRepository: Send + Sync {
    async fn find(
        &self,
        filter: &WallpaperFilter,
        sort: WallpaperSort,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Wallpaper>, RepositoryError>;

    async fn count(&self, filter: &WallpaperFilter) -> Result<u64, RepositoryError>;

    /// Returns `RepositoryError::NotFound` when nothing matches.
    async fn find_one(
        &self,
        filter: &WallpaperFilter,
        sort: WallpaperSort,
        skip: u64,
    ) -> Result<Wallpaper, RepositoryError>;

    /// Returns `RepositoryError::Conflict` when the id or `(date, market)` is taken.
    async fn insert(&self, wallpaper: &Wallpaper) -> Result<(), RepositoryError>;

    async fn ping(&self) -> Result<(), RepositoryError>;

    async fn list(
        &self,
        filter: &WallpaperFilter,
        request: &ListRequest,
    ) -> Result<Page<Wallpaper>, RepositoryError> {
        let total = self.count(filter).await?;
        let items = self
            .find(
                filter,
                WallpaperSort::DateDesc,
                request.offset(),
                u64::from(request.page_size()),
            )
            .await?;
        Ok(Page::new(items, request.page(), request.page_size(), total))
    }
}
