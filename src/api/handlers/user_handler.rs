//! User handlers.

use axum::{
    extract::{Extension, Path, State},
    response::Json,
    routing::get,
    Router,
};
use uuid::Uuid;

use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::UserResponse;
use crate::errors::AppResult;
use crate::types::ApiResponse;

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new().route("/:id", get(get_user))
}

/// Get user by ID (own profile, or a user sharing an organisation)
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User profile", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found or not visible to the caller")
    )
)]
pub async fn get_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let user = state.access_service.get_user(current_user.id, id).await?;
    Ok(Json(ApiResponse::success(UserResponse::from(user))))
}
