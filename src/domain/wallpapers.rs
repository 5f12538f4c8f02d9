use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::ids::WallpaperId;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Region/locale code partitioning the wallpaper feeds, e.g. `en-US`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Market(String);

impl Market {
    pub fn parse(code: &str) -> Option<Self> {
        let code = code.trim();
        if code.is_empty() {
            None
        } else {
            Some(Self(code.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Market {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value).ok_or_else(|| "market code must not be empty".to_string())
    }
}

/// A stored wallpaper. JSON field names follow the public API and the
/// archive export format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallpaper {
    pub id: WallpaperId,
    pub title: String,
    #[serde(rename = "url")]
    pub image_url: String,
    #[serde(rename = "datetime")]
    pub date: NaiveDate,
    pub copyright: String,
    #[serde(rename = "copyrightlink")]
    pub copyright_link: String,
    #[serde(rename = "hsh")]
    pub image_hash: String,
    #[serde(rename = "created_time")]
    pub created_at: NaiveDate,
    #[serde(rename = "mkt")]
    pub market: Market,
}

impl Wallpaper {
    /// Rewrite the trailing size segment of the image URL.
    ///
    /// `https://host/th?id=OHR.Foo_1920x1080.jpg` becomes
    /// `https://host/th?id=OHR.Foo_{width}x{height}.jpg`. URLs without an
    /// underscore have no size segment and are returned as stored.
    pub fn sized_image_url(&self, width: u32, height: u32) -> String {
        match self.image_url.rfind('_') {
            Some(index) => format!("{}{width}x{height}.jpg", &self.image_url[..=index]),
            None => self.image_url.clone(),
        }
    }
}

/// A wallpaper that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWallpaper {
    pub title: String,
    pub image_url: String,
    pub date: NaiveDate,
    pub copyright: String,
    pub copyright_link: String,
    pub image_hash: String,
    pub created_at: NaiveDate,
    pub market: Market,
}

impl NewWallpaper {
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title is required".to_string());
        }
        if self.image_url.trim().is_empty() {
            return Err("url is required".to_string());
        }
        if self.market.as_str().is_empty() {
            return Err("mkt is required".to_string());
        }
        Ok(())
    }

    pub fn with_id(self, id: WallpaperId) -> Wallpaper {
        Wallpaper {
            id,
            title: self.title,
            image_url: self.image_url,
            date: self.date,
            copyright: self.copyright,
            copyright_link: self.copyright_link,
            image_hash: self.image_hash,
            created_at: self.created_at,
            market: self.market,
        }
    }
}

/// Result of handing a candidate to the dedupe store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// A new record was persisted.
    Inserted(Wallpaper),
    /// A record for the same `(date, market)` already existed; nothing was written.
    Skipped { existing: WallpaperId },
}

impl IngestOutcome {
    pub const fn is_inserted(&self) -> bool {
        matches!(self, IngestOutcome::Inserted(_))
    }
}

/// Query filter over the wallpaper collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WallpaperFilter {
    pub date: Option<NaiveDate>,
    pub market: Option<Market>,
}

impl WallpaperFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_key(date: NaiveDate, market: &Market) -> Self {
        Self {
            date: Some(date),
            market: Some(market.clone()),
        }
    }

    pub fn by_market(market: Option<Market>) -> Self {
        Self { date: None, market }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallpaperSort {
    /// Newest date first, ties broken by newest id.
    DateDesc,
    IdDesc,
    IdAsc,
}
