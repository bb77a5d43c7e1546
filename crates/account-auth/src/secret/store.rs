//! Cache-backed storage of one-time enrollment passwords.

use std::sync::Arc;
use std::time::Duration;

use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use account_cache::keys;
use account_cache::provider::CacheManager;
use account_core::result::AppResult;
use account_core::traits::cache::CacheProvider;

/// Outcome of presenting a one-time password.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretCheck {
    /// The password matched and the secret was consumed.
    Consumed,
    /// No secret is stored for this username (never issued, expired, or already used).
    Missing,
    /// A secret exists but the password differs. The secret is left in place.
    Mismatch,
}

/// One-time passwords keyed by username, each with an explicit TTL.
#[derive(Debug, Clone)]
pub struct EnrollmentSecretStore {
    cache: Arc<CacheManager>,
    ttl: Duration,
}

impl EnrollmentSecretStore {
    /// Create a store whose entries live for `ttl`.
    pub fn new(cache: Arc<CacheManager>, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    /// Store `password` for `username`, replacing any previous one.
    pub async fn put(&self, username: &str, password: &str) -> AppResult<()> {
        self.cache
            .set(&keys::enrollment_secret(username), password, self.ttl)
            .await?;
        debug!(username = %username, ttl_secs = self.ttl.as_secs(), "Enrollment secret stored");
        Ok(())
    }

    /// Whether a secret is currently stored for `username`.
    pub async fn is_pending(&self, username: &str) -> AppResult<bool> {
        Ok(self
            .cache
            .get(&keys::enrollment_secret(username))
            .await?
            .is_some())
    }

    /// Compare `password` with the stored secret and consume it on a match.
    ///
    /// Only one of several concurrent matching calls observes
    /// [`SecretCheck::Consumed`]; the others see [`SecretCheck::Missing`].
    pub async fn consume(&self, username: &str, password: &str) -> AppResult<SecretCheck> {
        let key = keys::enrollment_secret(username);

        let Some(stored) = self.cache.get(&key).await? else {
            return Ok(SecretCheck::Missing);
        };

        if !bool::from(stored.as_bytes().ct_eq(password.as_bytes())) {
            warn!(username = %username, "Enrollment password mismatch");
            return Ok(SecretCheck::Mismatch);
        }

        if self.cache.delete(&key).await? {
            Ok(SecretCheck::Consumed)
        } else {
            Ok(SecretCheck::Missing)
        }
    }

    /// Remove any stored secret for `username`.
    pub async fn discard(&self, username: &str) -> AppResult<()> {
        self.cache.delete(&keys::enrollment_secret(username)).await?;
        Ok(())
    }
}
