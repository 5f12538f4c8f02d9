use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};

use crate::application::errors::IngestError;
use crate::application::services::DedupeStore;
use crate::domain::ids::WallpaperId;
use crate::domain::wallpapers::{IngestOutcome, Market, NewWallpaper};
use crate::infrastructure::image_archive::{ArchiveImage, ImageArchiveClient};

/// Markets fetched when the caller does not name any.
pub const DEFAULT_MARKETS: [&str; 9] = [
    "zh-CN", "de-DE", "en-CA", "en-GB", "en-IN", "en-US", "fr-FR", "it-IT", "ja-JP",
];

/// Fetches the newest upstream wallpaper for a market and hands it to the
/// dedupe store.
#[derive(Clone)]
pub struct Fetcher {
    archive: ImageArchiveClient,
    store: DedupeStore,
}

impl Fetcher {
    pub fn new(archive: ImageArchiveClient, store: DedupeStore) -> Self {
        Self { archive, store }
    }

    /// Ingest today's wallpaper for one market.
    ///
    /// `today` comes from the caller's clock and stamps both `date` and
    /// `created_at`.
    #[tracing::instrument(skip(self, market), fields(market = %market))]
    pub async fn fetch_market(
        &self,
        market: &Market,
        today: NaiveDate,
    ) -> Result<IngestOutcome, IngestError> {
        let image = self.archive.fetch_latest(market).await?;
        let candidate = self.candidate(image, market, today);
        candidate.validate().map_err(IngestError::InvalidEntry)?;

        self.store.save(candidate).await
    }

    /// Ingest every market in order. A failing market is logged and
    /// recorded; the loop always moves on to the next one.
    pub async fn run(&self, markets: &[Market], today: NaiveDate) -> IngestionReport {
        let mut report = IngestionReport::default();

        for market in markets {
            info!(%market, "fetching wallpaper");
            match self.fetch_market(market, today).await {
                Ok(IngestOutcome::Inserted(wallpaper)) => {
                    info!(%market, id = %wallpaper.id, "stored new wallpaper");
                    report.inserted.push(InsertedMarket {
                        market: market.clone(),
                        id: wallpaper.id,
                    });
                }
                Ok(IngestOutcome::Skipped { existing }) => {
                    info!(%market, id = %existing, "wallpaper already stored for today");
                    report.skipped.push(market.clone());
                }
                Err(err) => {
                    warn!(%market, error = %err, "failed to fetch wallpaper");
                    report.failed.push(FailedMarket {
                        market: market.clone(),
                        error: err.to_string(),
                    });
                }
            }
        }

        info!(
            inserted = report.inserted.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "ingestion run finished"
        );
        report
    }

    fn candidate(&self, image: ArchiveImage, market: &Market, today: NaiveDate) -> NewWallpaper {
        let image_url = if image.url.trim().is_empty() {
            String::new()
        } else {
            self.archive.absolute_image_url(&image.url)
        };

        NewWallpaper {
            title: image.title,
            image_url,
            date: today,
            copyright: image.copyright,
            copyright_link: image.copyright_link,
            image_hash: image.hsh,
            created_at: today,
            market: market.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InsertedMarket {
    pub market: Market,
    pub id: WallpaperId,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailedMarket {
    pub market: Market,
    pub error: String,
}

/// Outcome of one ingestion run, one entry per requested market.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestionReport {
    pub inserted: Vec<InsertedMarket>,
    pub skipped: Vec<Market>,
    pub failed: Vec<FailedMarket>,
}

impl IngestionReport {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}
