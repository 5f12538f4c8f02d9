use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use tracing::warn;

use crate::application::errors::{ApiError, AppError};
use crate::application::state::AppState;
use crate::infrastructure::auth::hash_token;

/// Extractor guarding the private endpoints.
///
/// Accepts the configured API token in the `Authorization` header, either
/// bare or as `Bearer <token>`. A missing header is 401, a wrong token 403.
#[derive(Debug, Clone, Copy)]
pub struct ApiToken;

impl FromRequestParts<AppState> for ApiToken {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or_else(|| AppError::Unauthorized("Authorization token is required".into()))?;

        let raw = header_value.to_str().map_err(|err| {
            warn!(error = %err, "authorization header contains invalid characters");
            AppError::Forbidden("Invalid authorization token".into())
        })?;

        let token = raw.strip_prefix("Bearer ").unwrap_or(raw).trim();
        if token.is_empty() {
            return Err(AppError::Unauthorized("Authorization token is required".into()).into());
        }

        if hash_token(token) != *state.api_token_hash {
            warn!("rejected request with invalid API token");
            return Err(AppError::Forbidden("Invalid authorization token".into()).into());
        }

        Ok(ApiToken)
    }
}
