//! Application services: the authorization core and its collaborators.
//!
//! Each service is a trait plus one concrete implementation over the
//! Unit of Work, so tests can substitute the store or any collaborator.

mod access_control;
mod auth_service;
pub mod container;
mod membership;
mod token_service;

pub use access_control::{AccessService, Gatekeeper};
pub use auth_service::{AuthService, Authenticator};
pub use container::Services;
pub use membership::{MembershipResolver, MembershipService};
pub use token_service::{Claims, TokenResponse, TokenService};

#[cfg(any(test, feature = "test-utils"))]
pub use membership::MockMembershipResolver;
