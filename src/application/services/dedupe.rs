use std::sync::Arc;

use tracing::{debug, info};

use crate::application::errors::IngestError;
use crate::domain::RepositoryError;
use crate::domain::ids::WallpaperId;
use crate::domain::repositories::WallpaperRepository;
use crate::domain::wallpapers::{IngestOutcome, NewWallpaper, WallpaperFilter, WallpaperSort};

/// Enforces at most one record per `(date, market)` and assigns the next
/// sequential id.
///
/// The existence check, the id lookup and the insert are separate
/// statements. Two writers racing on the same key can both pass the check;
/// the unique indexes reject the loser, which is reported as
/// `IngestError::ConstraintViolation`.
#[derive(Clone)]
pub struct DedupeStore {
    wallpapers: Arc<dyn WallpaperRepository>,
}

impl DedupeStore {
    pub fn new(wallpapers: Arc<dyn WallpaperRepository>) -> Self {
        Self { wallpapers }
    }

    pub async fn save(&self, candidate: NewWallpaper) -> Result<IngestOutcome, IngestError> {
        let key = WallpaperFilter::by_key(candidate.date, &candidate.market);
        match self
            .wallpapers
            .find_one(&key, WallpaperSort::IdAsc, 0)
            .await
        {
            Ok(existing) => {
                debug!(
                    id = %existing.id,
                    date = %candidate.date,
                    market = %candidate.market,
                    "wallpaper already stored, skipping"
                );
                return Ok(IngestOutcome::Skipped {
                    existing: existing.id,
                });
            }
            Err(RepositoryError::NotFound) => {}
            Err(err) => return Err(err.into()),
        }

        let id = self.next_id().await?;
        let date = candidate.date;
        let market = candidate.market.clone();
        let wallpaper = candidate.with_id(id);

        self.wallpapers
            .insert(&wallpaper)
            .await
            .map_err(|err| match err {
                RepositoryError::Conflict(_) => IngestError::ConstraintViolation {
                    date: date.to_string(),
                    market: market.to_string(),
                },
                other => IngestError::Repository(other),
            })?;

        info!(
            id = %wallpaper.id,
            title = %wallpaper.title,
            date = %wallpaper.date,
            market = %wallpaper.market,
            "inserted new wallpaper"
        );
        Ok(IngestOutcome::Inserted(wallpaper))
    }

    /// `max(id) + 1` over the whole collection, or 1 when it is empty.
    async fn next_id(&self) -> Result<WallpaperId, IngestError> {
        match self
            .wallpapers
            .find_one(&WallpaperFilter::all(), WallpaperSort::IdDesc, 0)
            .await
        {
            Ok(last) => Ok(last.id.next()),
            Err(RepositoryError::NotFound) => Ok(WallpaperId::FIRST),
            Err(err) => Err(err.into()),
        }
    }
}
