//! Axum application state.
//!
//! Carries the service handles every handler needs. Actor identity is
//! NOT part of this state; the verified claim travels as an explicit
//! argument from middleware through handlers into the services.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::Database;
use crate::services::{AccessService, AuthService, Services, TokenService};

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub access_service: Arc<dyn AccessService>,
    pub token_service: Arc<TokenService>,
    pub database: Arc<Database>,
}

impl AppState {
    /// Production wiring: services over the real store.
    pub fn from_config(database: Arc<Database>, config: &Config) -> Self {
        let services = Services::from_connection(database.get_connection(), config);
        Self {
            auth_service: services.auth(),
            access_service: services.access(),
            token_service: services.tokens(),
            database,
        }
    }

    /// Test wiring: caller supplies each service directly.
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        access_service: Arc<dyn AccessService>,
        token_service: Arc<TokenService>,
        database: Arc<Database>,
    ) -> Self {
        Self {
            auth_service,
            access_service,
            token_service,
            database,
        }
    }
}
