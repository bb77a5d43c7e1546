//! Profile entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Profile materialized by enrollment confirmation.
///
/// The profile id equals the account's enrollment token.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    /// Profile identifier (the enrollment token).
    pub id: Uuid,
    /// Owning account.
    pub account_id: Uuid,
    /// Company the profile belongs to.
    pub company_id: Option<Uuid>,
    /// Display name, initially the username.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone.
    pub phone: Option<String>,
    /// When the profile was created.
    pub created_at: DateTime<Utc>,
    /// When the profile was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a profile.
#[derive(Debug, Clone)]
pub struct CreateProfile {
    /// Profile identifier (the enrollment token).
    pub id: Uuid,
    /// Owning account.
    pub account_id: Uuid,
    /// Company the profile belongs to.
    pub company_id: Option<Uuid>,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
}
