//! Bearer-token middleware for the protected route tree.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::errors::AppError;

/// Verified identity of the caller, taken from the token claims.
///
/// Handlers read this from request extensions and hand it to the access
/// control service explicitly; no decision function reads ambient state.
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
}

/// Rejects the request unless it carries a verifiable bearer token.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix(BEARER_TOKEN_PREFIX))
        .ok_or(AppError::Unauthorized)?;

    let claims = state.token_service.verify(token)?;

    request.extensions_mut().insert(CurrentUser {
        id: claims.sub,
        email: claims.email,
    });

    Ok(next.run(request).await)
}
