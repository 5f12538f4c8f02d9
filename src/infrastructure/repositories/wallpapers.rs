use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{QueryBuilder, Sqlite, query, query_scalar};

use crate::domain::RepositoryError;
use crate::domain::ids::WallpaperId;
use crate::domain::repositories::WallpaperRepository;
use crate::domain::wallpapers::{Market, Wallpaper, WallpaperFilter, WallpaperSort};
use crate::infrastructure::database::DatabasePool;

const SELECT_COLUMNS: &str = "SELECT id, title, image_url, date, copyright, copyright_link, \
                              image_hash, created_at, market FROM wallpapers";

#[derive(Clone)]
pub struct SqlWallpaperRepository {
    pool: DatabasePool,
}

impl SqlWallpaperRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    fn push_filter(builder: &mut QueryBuilder<'_, Sqlite>, filter: &WallpaperFilter) {
        let mut sep = " WHERE ";
        if let Some(date) = filter.date {
            builder.push(sep).push("date = ").push_bind(date);
            sep = " AND ";
        }
        if let Some(market) = &filter.market {
            builder
                .push(sep)
                .push("market = ")
                .push_bind(market.as_str().to_string());
        }
    }

    fn order_clause(sort: WallpaperSort) -> &'static str {
        match sort {
            WallpaperSort::DateDesc => " ORDER BY date DESC, id DESC",
            WallpaperSort::IdDesc => " ORDER BY id DESC",
            WallpaperSort::IdAsc => " ORDER BY id ASC",
        }
    }

    fn select(
        filter: &WallpaperFilter,
        sort: WallpaperSort,
        skip: u64,
        limit: u64,
    ) -> QueryBuilder<'static, Sqlite> {
        let mut builder = QueryBuilder::new(SELECT_COLUMNS);
        Self::push_filter(&mut builder, filter);
        builder.push(Self::order_clause(sort));
        builder.push(" LIMIT ").push_bind(to_sql_int(limit));
        builder.push(" OFFSET ").push_bind(to_sql_int(skip));
        builder
    }

    fn into_domain(record: WallpaperRecord) -> Result<Wallpaper, RepositoryError> {
        let market = Market::parse(&record.market).ok_or_else(|| {
            RepositoryError::unexpected(format!("wallpaper {} has an empty market", record.id))
        })?;

        Ok(Wallpaper {
            id: WallpaperId::from(record.id),
            title: record.title,
            image_url: record.image_url,
            date: record.date,
            copyright: record.copyright,
            copyright_link: record.copyright_link,
            image_hash: record.image_hash,
            created_at: record.created_at,
            market,
        })
    }
}

fn to_sql_int(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[async_trait]
impl WallpaperRepository for SqlWallpaperRepository {
    async fn find(
        &self,
        filter: &WallpaperFilter,
        sort: WallpaperSort,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Wallpaper>, RepositoryError> {
        let records = Self::select(filter, sort, skip, limit)
            .build_query_as::<WallpaperRecord>()
            .fetch_all(&self.pool)
            .await?;

        records.into_iter().map(Self::into_domain).collect()
    }

    async fn count(&self, filter: &WallpaperFilter) -> Result<u64, RepositoryError> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM wallpapers");
        Self::push_filter(&mut builder, filter);

        let total = builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        Ok(u64::try_from(total).unwrap_or_default())
    }

    async fn find_one(
        &self,
        filter: &WallpaperFilter,
        sort: WallpaperSort,
        skip: u64,
    ) -> Result<Wallpaper, RepositoryError> {
        let record = Self::select(filter, sort, skip, 1)
            .build_query_as::<WallpaperRecord>()
            .fetch_optional(&self.pool)
            .await?;

        match record {
            Some(record) => Self::into_domain(record),
            None => Err(RepositoryError::NotFound),
        }
    }

    async fn insert(&self, wallpaper: &Wallpaper) -> Result<(), RepositoryError> {
        query(
            "INSERT INTO wallpapers \
             (id, title, image_url, date, copyright, copyright_link, image_hash, created_at, market) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(i64::from(wallpaper.id))
        .bind(&wallpaper.title)
        .bind(&wallpaper.image_url)
        .bind(wallpaper.date)
        .bind(&wallpaper.copyright)
        .bind(&wallpaper.copyright_link)
        .bind(&wallpaper.image_hash)
        .bind(wallpaper.created_at)
        .bind(wallpaper.market.as_str())
        .execute(&self.pool)
        .await
        .map_err(|err| {
            if let sqlx::Error::Database(db_err) = &err
                && db_err.is_unique_violation()
            {
                return RepositoryError::conflict(format!(
                    "a wallpaper already exists for id {} or {} / {}",
                    wallpaper.id, wallpaper.date, wallpaper.market
                ));
            }
            RepositoryError::from(err)
        })?;

        Ok(())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct WallpaperRecord {
    id: i64,
    title: String,
    image_url: String,
    date: NaiveDate,
    copyright: String,
    copyright_link: String,
    image_hash: String,
    created_at: NaiveDate,
    market: String,
}
