//! Handler for short URL redirect.

use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};

use crate::domain::entities::Policy;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its target URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Response Codes
///
/// - **307 Temporary Redirect**: code resolved
/// - **404 Not Found**: unknown, disabled or expired code
/// - **500 Internal Server Error**: cache fault
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    Extension(policy): Extension<Policy>,
) -> Result<impl IntoResponse, AppError> {
    let target = state.link_service.resolve(&code, policy).await?;
    Ok(Redirect::temporary(&target))
}
