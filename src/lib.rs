//! Multi-tenant identity and access control.
//!
//! Users register, authenticate, and read resources scoped by
//! organisation membership. The crate is layered so the authorization
//! core (`services`) never touches HTTP concerns:
//!
//! - `domain`: entities and value objects
//! - `services`: token issue/verify, membership resolution, access control
//! - `infra`: SeaORM repositories, migrations, Unit of Work
//! - `api`: axum routes, handlers, bearer-token middleware
//! - `cli` / `commands`: `serve` and `migrate` entry points
//!
//! ```bash
//! cargo run -- serve
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

pub use api::AppState;
pub use config::Config;
pub use domain::{Organisation, Password, User};
pub use errors::{AppError, AppResult};
