//! Environment-backed configuration.
//!
//! Loaded once at startup; the token secret is process-wide and never
//! mutated afterwards.

use std::env;

use super::constants::{
    DEFAULT_DATABASE_URL, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, DEFAULT_TOKEN_TTL_SECONDS,
    MIN_JWT_SECRET_LENGTH,
};

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    jwt_secret: String,
    pub token_ttl_seconds: i64,
    pub server_host: String,
    pub server_port: u16,
}

impl Config {
    /// Read configuration from the environment (and `.env`, if present).
    ///
    /// # Panics
    /// Panics when `JWT_SECRET` is missing in a release build, or set
    /// but shorter than the minimum length.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) => secret,
            Err(_) if cfg!(debug_assertions) => {
                tracing::warn!("JWT_SECRET not set, falling back to the development default");
                "dev-secret-key-minimum-32-chars!!".to_string()
            }
            Err(_) => panic!("JWT_SECRET must be set in production"),
        };
        assert!(
            jwt_secret.len() >= MIN_JWT_SECRET_LENGTH,
            "JWT_SECRET must be at least {} characters",
            MIN_JWT_SECRET_LENGTH
        );

        Self {
            database_url: string_or("DATABASE_URL", DEFAULT_DATABASE_URL),
            jwt_secret,
            token_ttl_seconds: parsed_or("TOKEN_TTL_SECONDS", DEFAULT_TOKEN_TTL_SECONDS),
            server_host: string_or("SERVER_HOST", DEFAULT_SERVER_HOST),
            server_port: parsed_or("SERVER_PORT", DEFAULT_SERVER_PORT),
        }
    }

    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

// Connection strings and key material stay out of debug output.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .finish()
    }
}

fn string_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parsed_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(default)
}
