use std::fmt;

use serde::{Deserialize, Serialize};

/// Application-assigned wallpaper identifier.
///
/// Ids are computed as `max(id) + 1` at insert time and are never generated
/// by the database, so ordering by id matches insertion order across markets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WallpaperId(i64);

impl WallpaperId {
    pub const FIRST: WallpaperId = WallpaperId(1);

    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn into_inner(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl From<i64> for WallpaperId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<WallpaperId> for i64 {
    fn from(id: WallpaperId) -> Self {
        id.0
    }
}

impl fmt::Display for WallpaperId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
