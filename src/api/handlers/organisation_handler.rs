//! Organisation handlers.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{NewOrganisation, OrganisationResponse, UserResponse};
use crate::errors::AppResult;
use crate::types::{ApiResponse, Created};

/// Organisation creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateOrganisationRequest {
    /// Organisation display name
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    #[schema(example = "Acme Corp")]
    pub name: String,
    /// Free-form description
    #[validate(length(min = 1, message = "Description cannot be empty"))]
    #[schema(example = "Acme's engineering organisation")]
    pub description: String,
}

/// Add-member request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddMemberRequest {
    /// ID of the user to add
    pub user_id: Uuid,
}

/// Create organisation routes
pub fn organisation_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_organisations).post(create_organisation))
        .route("/:org_id", get(get_organisation))
        .route("/:org_id/users", get(list_members).post(add_member))
}

/// List the organisations the caller belongs to
#[utoipa::path(
    get,
    path = "/api/organisations",
    tag = "Organisations",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's organisations", body = Vec<OrganisationResponse>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_organisations(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<OrganisationResponse>>>> {
    let orgs = state
        .access_service
        .list_organisations(current_user.id)
        .await?;

    Ok(Json(ApiResponse::success(
        orgs.into_iter().map(OrganisationResponse::from).collect(),
    )))
}

/// Create a new organisation with the caller as its first member
#[utoipa::path(
    post,
    path = "/api/organisations",
    tag = "Organisations",
    security(("bearer_auth" = [])),
    request_body = CreateOrganisationRequest,
    responses(
        (status = 201, description = "Organisation created", body = OrganisationResponse),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_organisation(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateOrganisationRequest>,
) -> AppResult<Created<OrganisationResponse>> {
    let org = state
        .access_service
        .create_organisation(
            current_user.id,
            NewOrganisation {
                name: payload.name,
                description: payload.description,
            },
        )
        .await?;

    Ok(Created(OrganisationResponse::from(org)))
}

/// Get an organisation by ID (members only)
#[utoipa::path(
    get,
    path = "/api/organisations/{org_id}",
    tag = "Organisations",
    security(("bearer_auth" = [])),
    params(
        ("org_id" = Uuid, Path, description = "Organisation ID")
    ),
    responses(
        (status = 200, description = "Organisation details", body = OrganisationResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not a member"),
        (status = 404, description = "Organisation not found")
    )
)]
pub async fn get_organisation(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(org_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<OrganisationResponse>>> {
    let org = state
        .access_service
        .get_organisation(current_user.id, org_id)
        .await?;

    Ok(Json(ApiResponse::success(OrganisationResponse::from(org))))
}

/// List the members of an organisation (members only)
#[utoipa::path(
    get,
    path = "/api/organisations/{org_id}/users",
    tag = "Organisations",
    security(("bearer_auth" = [])),
    params(
        ("org_id" = Uuid, Path, description = "Organisation ID")
    ),
    responses(
        (status = 200, description = "Organisation members", body = Vec<UserResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not a member"),
        (status = 404, description = "Organisation not found")
    )
)]
pub async fn list_members(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(org_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Vec<UserResponse>>>> {
    let members = state
        .access_service
        .list_members(current_user.id, org_id)
        .await?;

    Ok(Json(ApiResponse::success(
        members.into_iter().map(UserResponse::from).collect(),
    )))
}

/// Add a user to an organisation
#[utoipa::path(
    post,
    path = "/api/organisations/{org_id}/users",
    tag = "Organisations",
    security(("bearer_auth" = [])),
    params(
        ("org_id" = Uuid, Path, description = "Organisation ID")
    ),
    request_body = AddMemberRequest,
    responses(
        (status = 201, description = "User added to organisation"),
        (status = 400, description = "Organisation or user does not exist"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn add_member(
    State(state): State<AppState>,
    Path(org_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<AddMemberRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<()>>)> {
    state
        .access_service
        .add_member(org_id, payload.user_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::message("User added to organisation")),
    ))
}
