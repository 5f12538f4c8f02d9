pub mod support;
pub mod system;
pub mod wallpapers;

use std::any::Any;
use std::time::Duration;

use axum::Json;
use axum::http::{HeaderValue, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultOnResponse, MakeSpan, TraceLayer};
use tracing::{Level, Span, error};

use crate::application::errors::ErrorBody;
use crate::application::state::AppState;

/// Upper bound on the lifetime of a single request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub fn app_router(state: AppState) -> axum::Router {
    axum::Router::new()
        .nest("/api/v1", api_router())
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(WallpaperMakeSpan)
                        .on_response(DefaultOnResponse::new().level(Level::INFO)),
                )
                .layer(CatchPanicLayer::custom(panic_response))
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    REQUEST_TIMEOUT,
                ))
                .layer(CorsLayer::permissive())
                .layer(SetResponseHeaderLayer::overriding(
                    axum::http::header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(CompressionLayer::new().gzip(true)),
        )
        .with_state(state)
}

fn api_router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/today", get(wallpapers::today))
        .route("/random", get(wallpapers::random))
        .route("/list", get(wallpapers::list))
        .route("/date/{date}", get(wallpapers::by_date))
        .route("/health", get(system::health))
        .route("/info", get(system::info))
}

/// Turn a handler panic into the usual 500 error body.
fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(panic = %detail, "request handler panicked");

    let status = StatusCode::INTERNAL_SERVER_ERROR;
    (
        status,
        Json(ErrorBody {
            code: status.as_u16(),
            message: "Internal server error".to_string(),
        }),
    )
        .into_response()
}

#[derive(Clone)]
struct WallpaperMakeSpan;

impl<B> MakeSpan<B> for WallpaperMakeSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        tracing::info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            version = ?request.version(),
        )
    }
}
