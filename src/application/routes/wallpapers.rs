use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::Response;
use chrono::NaiveDate;
use rand::Rng;
use serde::Deserialize;
use tracing::debug;

use crate::application::auth::ApiToken;
use crate::application::errors::{ApiError, AppError};
use crate::application::routes::support::{ImageQuery, ListQuery, ListResponse, image_response};
use crate::application::state::AppState;
use crate::domain::wallpapers::{DATE_FORMAT, Wallpaper, WallpaperFilter, WallpaperSort};

/// Newest wallpaper for `mkt`, falling back to the configured default market.
#[tracing::instrument(skip(state))]
pub(crate) async fn today(
    State(state): State<AppState>,
    Query(query): Query<ImageQuery>,
) -> Result<Response, ApiError> {
    let options = query.options()?;
    let market = query
        .market()
        .unwrap_or_else(|| state.default_market.clone());

    let wallpaper = state
        .wallpaper_repo
        .find_one(
            &WallpaperFilter::by_market(Some(market)),
            WallpaperSort::DateDesc,
            0,
        )
        .await?;

    Ok(image_response(&wallpaper, options))
}

#[tracing::instrument(skip(state))]
pub(crate) async fn random(
    State(state): State<AppState>,
    Query(query): Query<ImageQuery>,
) -> Result<Response, ApiError> {
    let options = query.options()?;
    let filter = WallpaperFilter::all();

    let total = state.wallpaper_repo.count(&filter).await?;
    if total == 0 {
        return Err(AppError::NotFound.into());
    }

    let skip = rand::thread_rng().gen_range(0..total);
    debug!(total, skip, "picked random wallpaper offset");

    let wallpaper = state
        .wallpaper_repo
        .find_one(&filter, WallpaperSort::IdAsc, skip)
        .await?;

    Ok(image_response(&wallpaper, options))
}

#[tracing::instrument(skip(state, _token))]
pub(crate) async fn list(
    State(state): State<AppState>,
    _token: ApiToken,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse<Wallpaper>>, ApiError> {
    let request = query.request();
    let filter = WallpaperFilter::by_market(query.market());

    let page = state.wallpaper_repo.list(&filter, &request).await?;

    Ok(Json(ListResponse {
        code: 200,
        message: "success".to_string(),
        data: page.items,
        total: page.total,
    }))
}

#[derive(Debug, Deserialize)]
pub(crate) struct DatePath {
    date: String,
}

#[tracing::instrument(skip(state, _token))]
pub(crate) async fn by_date(
    State(state): State<AppState>,
    _token: ApiToken,
    Path(path): Path<DatePath>,
    Query(query): Query<ImageQuery>,
) -> Result<Response, ApiError> {
    let date = NaiveDate::parse_from_str(path.date.trim(), DATE_FORMAT)
        .map_err(|_| AppError::validation("Invalid date format. Use YYYY-MM-DD"))?;
    let options = query.options()?;

    let filter = WallpaperFilter {
        date: Some(date),
        market: query.market(),
    };
    let wallpaper = state
        .wallpaper_repo
        .find_one(&filter, WallpaperSort::IdAsc, 0)
        .await?;

    Ok(image_response(&wallpaper, options))
}
