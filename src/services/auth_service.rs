//! Authentication service - registration and login.
//!
//! Registration creates the user, their default organisation, and the
//! membership link as a single transactional unit; a failure in any of
//! the three writes persists nothing.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{NewOrganisation, NewUser, Password, Registration, User};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;
use crate::services::{TokenResponse, TokenService};

/// A throwaway argon2 hash compared against when the email is unknown,
/// so login latency does not reveal whether an account exists.
const PHANTOM_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$dummysalt123456$dummyhash1234567890123456789012";

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user with their default organisation and return
    /// the created user plus a fresh token.
    async fn register(&self, registration: Registration) -> AppResult<(User, TokenResponse)>;

    /// Login with email and password and return the user plus a fresh
    /// token.
    async fn login(&self, email: String, password: String) -> AppResult<(User, TokenResponse)>;
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    tokens: Arc<TokenService>,
}

impl<U: UnitOfWork> Authenticator<U> {
    /// Create new auth service instance with Unit of Work
    pub fn new(uow: Arc<U>, tokens: Arc<TokenService>) -> Self {
        Self { uow, tokens }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(&self, registration: Registration) -> AppResult<(User, TokenResponse)> {
        // Payload shape is validated by the handler's ValidatedJson extractor
        if self
            .uow
            .users()
            .find_by_email(&registration.email)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("email"));
        }

        let password_hash = Password::new(&registration.password)?.into_string();

        let default_org =
            NewOrganisation::default_for(&registration.first_name, &registration.last_name);
        let new_user = NewUser {
            first_name: registration.first_name,
            last_name: registration.last_name,
            email: registration.email,
            password_hash,
            phone: registration.phone,
        };

        // User, default organisation, and membership persist together or
        // not at all.
        let (user, org) = self
            .uow
            .create_user_with_default_org(new_user, default_org)
            .await?;

        tracing::info!(user_id = %user.id, org_id = %org.id, "User registered");

        let token = self.tokens.issue(user.id, &user.email)?;
        Ok((user, token))
    }

    async fn login(&self, email: String, password: String) -> AppResult<(User, TokenResponse)> {
        let found = self.uow.users().find_by_email(&email).await?;

        // Always run a verification, against the phantom hash when the
        // lookup missed, to keep the unknown-email path timing-equivalent.
        let stored = Password::from_hash(
            found
                .as_ref()
                .map(|user| user.password_hash.clone())
                .unwrap_or_else(|| PHANTOM_HASH.to_string()),
        );

        let password_valid = stored.verify(&password);

        match found {
            Some(user) if password_valid => {
                let token = self.tokens.issue(user.id, &user.email)?;
                Ok((user, token))
            }
            _ => Err(AppError::InvalidCredentials),
        }
    }
}
