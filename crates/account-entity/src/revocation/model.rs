//! Revocation ledger row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A revoked refresh token. Unique on `(token_hash, user_id)`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RevocationEntry {
    /// Hex SHA-256 of the refresh token.
    pub token_hash: String,
    /// User the token was issued to.
    pub user_id: Uuid,
    /// When the token was revoked.
    pub revoked_at: DateTime<Utc>,
    /// When the token would have expired on its own.
    pub expires_at: DateTime<Utc>,
}
