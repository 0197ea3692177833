//! Authentication handlers.

use axum::{extract::State, http::StatusCode, response::Json, routing::post, Router};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{Registration, User, UserResponse};
use crate::errors::AppResult;
use crate::services::TokenResponse;
use crate::types::ApiResponse;

/// Registration payload.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// Given name
    #[validate(length(min = 1, message = "First name is required"))]
    #[schema(example = "Ada")]
    pub first_name: String,
    /// Family name
    #[validate(length(min = 1, message = "Last name is required"))]
    #[schema(example = "Lovelace")]
    pub last_name: String,
    /// Email address, unique across accounts
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// Minimum 8 characters with a digit, both letter cases, and a symbol
    #[validate(
        length(min = 8, message = "Password must be at least 8 characters"),
        custom(function = "validate_password_complexity")
    )]
    #[schema(example = "C0mpl3xP@ss", min_length = 8)]
    pub password: String,
    /// Contact phone number
    #[schema(example = "1234567890")]
    pub phone: String,
}

/// Login payload.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// Email address used at registration
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// Account password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "C0mpl3xP@ss")]
    pub password: String,
}

/// Authentication response: token plus the authenticated user
#[derive(Debug, serde::Serialize, ToSchema)]
pub struct AuthResponse {
    /// JWT access token
    pub access_token: String,
    /// Token type (always "Bearer")
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
    /// The authenticated user
    pub user: UserResponse,
}

impl AuthResponse {
    fn new(user: User, token: TokenResponse) -> Self {
        Self {
            access_token: token.access_token,
            token_type: token.token_type,
            expires_in: token.expires_in,
            user: UserResponse::from(user),
        }
    }
}

/// Passwords need a digit, both letter cases, a symbol, and no spaces.
fn validate_password_complexity(password: &str) -> Result<(), ValidationError> {
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_special = password.chars().any(|c| !c.is_alphanumeric());
    let has_space = password.chars().any(|c| c.is_whitespace());

    if has_digit && has_lower && has_upper && has_special && !has_space {
        Ok(())
    } else {
        let mut error = ValidationError::new("password_complexity");
        error.message = Some(
            "Password must contain at least one number, one lowercase and one uppercase letter, and one special character, with no spaces"
                .into(),
        );
        Err(error)
    }
}

/// Public authentication routes.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Register a new account with its default organisation
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 409, description = "Email already in use"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<AuthResponse>>)> {
    let registration = Registration {
        first_name: payload.first_name,
        last_name: payload.last_name,
        email: payload.email,
        password: payload.password,
        phone: payload.phone,
    };

    let (user, token) = state.auth_service.register(registration).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            AuthResponse::new(user, token),
            "Registration successful",
        )),
    ))
}

/// Exchange credentials for a bearer token
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<ApiResponse<AuthResponse>>> {
    let (user, token) = state
        .auth_service
        .login(payload.email, payload.password)
        .await?;

    Ok(Json(ApiResponse::with_message(
        AuthResponse::new(user, token),
        "Login successful",
    )))
}
