//! Password credential value object.
//!
//! Wraps an argon2 hash; plain text exists only transiently inside
//! `new` and `verify`. Everything else in the crate handles the opaque
//! hash string.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::config::MIN_PASSWORD_LENGTH;
use crate::errors::{AppError, AppResult};

#[derive(Clone)]
pub struct Password {
    hash: String,
}

impl Password {
    /// Hash a plain-text password into a credential.
    ///
    /// Rejects passwords below the minimum length. Composition rules
    /// (digit, case mix, symbol) are enforced at the request boundary,
    /// not here.
    pub fn new(plain_text: &str) -> AppResult<Self> {
        if plain_text.len() < MIN_PASSWORD_LENGTH as usize {
            return Err(AppError::validation_single(
                "password",
                format!("Password must be at least {} characters", MIN_PASSWORD_LENGTH),
            ));
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hash failed: {}", e)))?
            .to_string();

        Ok(Self { hash })
    }

    /// Wrap a hash loaded from the store.
    pub fn from_hash(hash: String) -> Self {
        Self { hash }
    }

    pub fn as_str(&self) -> &str {
        &self.hash
    }

    pub fn into_string(self) -> String {
        self.hash
    }

    /// Check a plain-text candidate against this credential.
    ///
    /// An unparseable stored hash verifies as false rather than erroring;
    /// login treats it the same as a wrong password.
    pub fn verify(&self, plain_text: &str) -> bool {
        PasswordHash::new(&self.hash)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(plain_text.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }
}

// The hash is still credential material; keep it out of logs.
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl From<Password> for String {
    fn from(password: Password) -> Self {
        password.hash
    }
}

impl PartialEq for Password {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for Password {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_verification() {
        let credential = Password::new("C0mpl3xP@ssw0rd").unwrap();

        assert!(credential.verify("C0mpl3xP@ssw0rd"));
        assert!(!credential.verify("Wr0ngP@ssword"));
    }

    #[test]
    fn test_stored_hash_verifies() {
        let hash = Password::new("C0mpl3xP@ssw0rd").unwrap().into_string();

        let restored = Password::from_hash(hash);
        assert!(restored.verify("C0mpl3xP@ssw0rd"));
    }

    #[test]
    fn test_salting_makes_hashes_unique() {
        let first = Password::new("SamePassword123!").unwrap();
        let second = Password::new("SamePassword123!").unwrap();

        assert_ne!(first.as_str(), second.as_str());
        assert!(first.verify("SamePassword123!"));
        assert!(second.verify("SamePassword123!"));
    }

    #[test]
    fn test_length_floor() {
        assert!(Password::new("short").is_err());
        assert!(Password::new("12345678").is_ok());
    }

    #[test]
    fn test_garbage_stored_hash_never_verifies() {
        let broken = Password::from_hash("not-an-argon2-hash".to_string());
        assert!(!broken.verify("anything"));
    }
}
