//! Token service - issues and verifies signed identity claims.
//!
//! A claim is a pure function of the subject, the secret key, and the
//! clock; nothing here touches the store. One uniform TTL applies to
//! every issue path.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{Config, TOKEN_TYPE_BEARER};
use crate::errors::AppResult;

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

/// Token response returned after successful authentication
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token lifetime in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
}

/// Issues and verifies bearer tokens against a process-wide secret.
pub struct TokenService {
    secret: Vec<u8>,
    ttl_seconds: i64,
}

impl TokenService {
    /// Create a token service with an explicit secret and TTL.
    pub fn new(secret: &[u8], ttl_seconds: i64) -> Self {
        Self {
            secret: secret.to_vec(),
            ttl_seconds,
        }
    }

    /// Create a token service from application configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.jwt_secret_bytes(), config.token_ttl_seconds)
    }

    /// Issue a signed token for the given subject.
    pub fn issue(&self, subject: Uuid, email: &str) -> AppResult<TokenResponse> {
        let now = Utc::now();
        let expires_at = now + Duration::seconds(self.ttl_seconds);

        let claims = Claims {
            sub: subject,
            email: email.to_string(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(&self.secret),
        )?;

        Ok(TokenResponse {
            access_token: token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: self.ttl_seconds,
        })
    }

    /// Verify a token and extract its claims.
    ///
    /// Malformed tokens, bad signatures, and expired claims all surface
    /// as the same error kind; callers cannot distinguish them.
    pub fn verify(&self, token: &str) -> AppResult<Claims> {
        let mut validation = Validation::default();
        // A token is invalid from its exp second onward
        validation.leeway = 0;

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(&self.secret),
            &validation,
        )?;

        Ok(token_data.claims)
    }
}
