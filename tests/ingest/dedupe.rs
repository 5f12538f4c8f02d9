use std::sync::Arc;

use async_trait::async_trait;
use dailywall::application::errors::IngestError;
use dailywall::application::services::DedupeStore;
use dailywall::domain::RepositoryError;
use dailywall::domain::ids::WallpaperId;
use dailywall::domain::repositories::WallpaperRepository;
use dailywall::domain::wallpapers::{
    IngestOutcome, Wallpaper, WallpaperFilter, WallpaperSort,
};
use dailywall::infrastructure::repositories::SqlWallpaperRepository;

use crate::helpers::{candidate, day, market, sql_repo};

/// Repository whose key lookups never see existing rows, as if another
/// writer inserted between the check and the insert.
struct StaleReads {
    inner: SqlWallpaperRepository,
}

#[async_trait]
impl WallpaperRepository for StaleReads {
    async fn find(
        &self,
        filter: &WallpaperFilter,
        sort: WallpaperSort,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Wallpaper>, RepositoryError> {
        self.inner.find(filter, sort, skip, limit).await
    }

    async fn count(&self, filter: &WallpaperFilter) -> Result<u64, RepositoryError> {
        self.inner.count(filter).await
    }

    async fn find_one(
        &self,
        filter: &WallpaperFilter,
        sort: WallpaperSort,
        skip: u64,
    ) -> Result<Wallpaper, RepositoryError> {
        if filter.date.is_some() {
            return Err(RepositoryError::NotFound);
        }
        self.inner.find_one(filter, sort, skip).await
    }

    async fn insert(&self, wallpaper: &Wallpaper) -> Result<(), RepositoryError> {
        self.inner.insert(wallpaper).await
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        self.inner.ping().await
    }
}

#[tokio::test]
async fn first_insert_gets_id_one() {
    let store = DedupeStore::new(Arc::new(sql_repo().await));

    let outcome = store
        .save(candidate("2024-01-01", "en-US", "First"))
        .await
        .unwrap();

    let IngestOutcome::Inserted(wallpaper) = outcome else {
        panic!("expected an insert");
    };
    assert_eq!(wallpaper.id, WallpaperId::FIRST);
}

#[tokio::test]
async fn ids_continue_from_the_highest_stored_id() {
    let repo = Arc::new(sql_repo().await);
    repo.insert(&candidate("2023-12-31", "fr-FR", "Gap").with_id(WallpaperId::new(7)))
        .await
        .unwrap();
    let store = DedupeStore::new(repo.clone());

    let outcome = store
        .save(candidate("2024-01-01", "en-US", "After"))
        .await
        .unwrap();

    let IngestOutcome::Inserted(wallpaper) = outcome else {
        panic!("expected an insert");
    };
    assert_eq!(wallpaper.id, WallpaperId::new(8));
}

#[tokio::test]
async fn existing_key_is_skipped_and_left_unchanged() {
    let repo = Arc::new(sql_repo().await);
    let store = DedupeStore::new(repo.clone());
    store
        .save(candidate("2024-01-01", "en-US", "Original"))
        .await
        .unwrap();

    let outcome = store
        .save(candidate("2024-01-01", "en-US", "Replacement"))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        IngestOutcome::Skipped {
            existing: WallpaperId::FIRST
        }
    );
    let stored = repo
        .find_one(
            &WallpaperFilter::by_key(day("2024-01-01"), &market("en-US")),
            WallpaperSort::IdAsc,
            0,
        )
        .await
        .unwrap();
    assert_eq!(stored.title, "Original");
    assert_eq!(repo.count(&WallpaperFilter::all()).await.unwrap(), 1);
}

#[tokio::test]
async fn same_date_in_another_market_is_a_new_record() {
    let store = DedupeStore::new(Arc::new(sql_repo().await));
    store
        .save(candidate("2024-01-01", "en-US", "America"))
        .await
        .unwrap();

    let outcome = store
        .save(candidate("2024-01-01", "de-DE", "Germany"))
        .await
        .unwrap();

    assert!(outcome.is_inserted());
}

#[tokio::test]
async fn lost_race_surfaces_as_constraint_violation() {
    let inner = sql_repo().await;
    inner
        .insert(&candidate("2024-01-01", "en-US", "Winner").with_id(WallpaperId::FIRST))
        .await
        .unwrap();
    let store = DedupeStore::new(Arc::new(StaleReads { inner }));

    let err = store
        .save(candidate("2024-01-01", "en-US", "Loser"))
        .await
        .unwrap_err();

    match err {
        IngestError::ConstraintViolation { date, market } => {
            assert_eq!(date, "2024-01-01");
            assert_eq!(market, "en-US");
        }
        other => panic!("expected a constraint violation, got {other:?}"),
    }
}
