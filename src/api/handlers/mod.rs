//! HTTP request handlers.

pub mod auth_handler;
pub mod organisation_handler;
pub mod user_handler;

pub use auth_handler::auth_routes;
pub use organisation_handler::organisation_routes;
pub use user_handler::user_routes;
