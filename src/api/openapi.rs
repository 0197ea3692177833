//! OpenAPI document served through Swagger UI.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth_handler, organisation_handler, user_handler};
use crate::domain::{OrganisationResponse, UserResponse};
use crate::services::TokenResponse;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tenancy API",
        version = "0.1.0",
        description = "Multi-tenant identity and organisation-membership API",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        auth_handler::register,
        auth_handler::login,
        user_handler::get_user,
        organisation_handler::list_organisations,
        organisation_handler::create_organisation,
        organisation_handler::get_organisation,
        organisation_handler::list_members,
        organisation_handler::add_member,
    ),
    components(
        schemas(
            UserResponse,
            OrganisationResponse,
            TokenResponse,
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            auth_handler::AuthResponse,
            organisation_handler::CreateOrganisationRequest,
            organisation_handler::AddMemberRequest,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "Authentication", description = "Registration and login"),
        (name = "Users", description = "Membership-scoped user lookups"),
        (name = "Organisations", description = "Organisations and membership links")
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` security scheme referenced by the
/// protected paths.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token obtained from /auth/register or /auth/login"))
                        .build(),
                ),
            );
        }
    }
}
