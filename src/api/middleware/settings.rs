//! Per-request policy loading.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{error::AppError, state::AppState};

/// Loads the current [`Policy`](crate::domain::entities::Policy) once and
/// stores it in request extensions for handlers to extract.
///
/// # Errors
///
/// Returns `500 Internal Server Error` if the policy cannot be read from
/// either the cache or the durable store.
///
/// # Example
///
/// ```rust,ignore
/// let routes = Router::new()
///     .route("/{code}", get(redirect_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), settings::layer));
/// ```
pub async fn layer(
    State(st): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let policy = st.settings.get().await?;
    req.extensions_mut().insert(policy);
    Ok(next.run(req).await)
}
