//! Service wiring over a live database connection.

use std::sync::Arc;

use super::{
    AccessService, AuthService, Authenticator, Gatekeeper, MembershipResolver, MembershipService,
    TokenService,
};
use crate::config::Config;
use crate::infra::Persistence;

/// One instance of every application service, sharing a Unit of Work.
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    access_service: Arc<dyn AccessService>,
    token_service: Arc<TokenService>,
}

impl Services {
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: &Config) -> Self {
        let uow = Arc::new(Persistence::new(db));
        let token_service = Arc::new(TokenService::from_config(config));
        let resolver: Arc<dyn MembershipResolver> = Arc::new(MembershipService::new(uow.clone()));

        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), token_service.clone())),
            access_service: Arc::new(Gatekeeper::new(uow, resolver)),
            token_service,
        }
    }

    pub fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    pub fn access(&self) -> Arc<dyn AccessService> {
        self.access_service.clone()
    }

    pub fn tokens(&self) -> Arc<TokenService> {
        self.token_service.clone()
    }
}
