use axum::Json;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::application::errors::AppError;
use crate::domain::listing::{DEFAULT_PAGE_SIZE, ListRequest};
use crate::domain::wallpapers::{Market, Wallpaper};

pub const DEFAULT_WIDTH: u32 = 1920;
pub const DEFAULT_HEIGHT: u32 = 1080;

const UNSUPPORTED_TYPE: &str = "Unsupported response type. Use 'image' or 'json'";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// `302 Found` pointing at the sized image.
    Image,
    Json,
}

/// Size and format parameters shared by the image endpoints.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ImageQuery {
    #[serde(default)]
    mkt: Option<String>,
    #[serde(default)]
    w: Option<String>,
    #[serde(default)]
    h: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

impl ImageQuery {
    pub fn market(&self) -> Option<Market> {
        self.mkt.as_deref().and_then(Market::parse)
    }

    /// Validate size and format up front so bad requests fail before any
    /// lookup.
    pub fn options(&self) -> Result<ImageOptions, AppError> {
        let kind = match self.kind.as_deref().map(str::trim) {
            None | Some("" | "image") => ResponseKind::Image,
            Some("json") => ResponseKind::Json,
            Some(_) => return Err(AppError::validation(UNSUPPORTED_TYPE)),
        };
        let width = parse_dimension(self.w.as_deref(), DEFAULT_WIDTH, "w")?;
        let height = parse_dimension(self.h.as_deref(), DEFAULT_HEIGHT, "h")?;

        Ok(ImageOptions {
            kind,
            width,
            height,
        })
    }
}

fn parse_dimension(value: Option<&str>, default: u32, name: &str) -> Result<u32, AppError> {
    let invalid = || AppError::validation(format!("'{name}' must be a number"));
    match value.map(str::trim) {
        None | Some("") => Ok(default),
        Some(raw) if raw.bytes().all(|b| b.is_ascii_digit()) => {
            raw.parse::<u32>().map_err(|_| invalid())
        }
        Some(_) => Err(invalid()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageOptions {
    pub kind: ResponseKind,
    pub width: u32,
    pub height: u32,
}

/// Body of `type=json` image responses.
#[derive(Debug, Serialize, Deserialize)]
pub struct ImageResponse {
    pub url: String,
    pub title: String,
    pub datetime: String,
}

/// Render a wallpaper as a redirect or a JSON body.
pub(crate) fn image_response(wallpaper: &Wallpaper, options: ImageOptions) -> Response {
    let url = wallpaper.sized_image_url(options.width, options.height);

    match options.kind {
        ResponseKind::Image => (StatusCode::FOUND, [(header::LOCATION, url)]).into_response(),
        ResponseKind::Json => Json(ImageResponse {
            url,
            title: wallpaper.title.clone(),
            datetime: wallpaper.date.to_string(),
        })
        .into_response(),
    }
}

/// `page` / `pageSize` / `mkt` for the list endpoint. Unparseable numbers
/// fall back to the defaults instead of failing the request.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListQuery {
    #[serde(default)]
    page: Option<String>,
    #[serde(default, rename = "pageSize")]
    page_size: Option<String>,
    #[serde(default)]
    mkt: Option<String>,
}

impl ListQuery {
    pub fn request(&self) -> ListRequest {
        let page = lenient_u32(self.page.as_deref()).unwrap_or(1);
        let page_size = lenient_u32(self.page_size.as_deref()).unwrap_or(DEFAULT_PAGE_SIZE);
        ListRequest::new(page, page_size)
    }

    pub fn market(&self) -> Option<Market> {
        self.mkt.as_deref().and_then(Market::parse)
    }
}

fn lenient_u32(value: Option<&str>) -> Option<u32> {
    value.and_then(|v| v.trim().parse::<u32>().ok())
}

/// Envelope of the list endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub code: u16,
    pub message: String,
    pub data: Vec<T>,
    pub total: u64,
}
