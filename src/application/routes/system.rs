use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::application::errors::ErrorBody;
use crate::application::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InfoResponse {
    pub name: String,
    pub version: String,
    pub author: String,
    pub description: String,
    pub repository: String,
}

pub(crate) async fn health(State(state): State<AppState>) -> Response {
    match state.wallpaper_repo.ping().await {
        Ok(()) => Json(HealthResponse {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        })
        .into_response(),
        Err(err) => {
            error!(error = %err, "health check failed");
            let status = StatusCode::INTERNAL_SERVER_ERROR;
            (
                status,
                Json(ErrorBody {
                    code: status.as_u16(),
                    message: "Database connection error".to_string(),
                }),
            )
                .into_response()
        }
    }
}

pub(crate) async fn info() -> Json<InfoResponse> {
    Json(InfoResponse {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        author: env!("CARGO_PKG_AUTHORS").to_string(),
        description: env!("CARGO_PKG_DESCRIPTION").to_string(),
        repository: env!("CARGO_PKG_REPOSITORY").to_string(),
    })
}
