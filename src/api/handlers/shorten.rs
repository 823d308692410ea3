//! Handler for link shortening endpoint.

use axum::{Extension, Json, extract::State};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::domain::entities::Policy;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link for a long URL.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com/some/long/path",
///   "custom_alias": "promo"
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "code": "Q0v",
///   "short_url": "https://sl.example/Q0v"
/// }
/// ```
///
/// Shortening an already shortened URL returns its existing code.
///
/// # Errors
///
/// - 400 Bad Request: validation failed, URL invalid or scheme unsupported
/// - 409 Conflict: alias or code already taken
/// - 500 Internal Server Error: cache, store or sequence failure
pub async fn shorten_handler(
    State(state): State<AppState>,
    Extension(policy): Extension<Policy>,
    Json(payload): Json<ShortenRequest>,
) -> Result<Json<ShortenResponse>, AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .shorten(&payload.url, payload.custom_alias.as_deref(), policy)
        .await?;

    Ok(Json(link.into()))
}
