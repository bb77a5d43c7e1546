//! Account entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Per-user account record. Exactly one exists for each user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Account {
    /// Account identifier.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Whether the account may use admin-only endpoints.
    pub is_admin: bool,
    /// Enrollment token carried by the confirmation link. Immutable.
    #[serde(skip_serializing)]
    pub enrollment_token: Uuid,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Public projection safe to return to clients.
    pub fn view(&self) -> AccountView {
        AccountView {
            id: self.id,
            user_id: self.user_id,
            is_admin: self.is_admin,
            created_at: self.created_at,
        }
    }
}

/// Data required to create an account.
#[derive(Debug, Clone)]
pub struct CreateAccount {
    /// Owning user.
    pub user_id: Uuid,
    /// Freshly generated enrollment token.
    pub enrollment_token: Uuid,
    /// Admin flag.
    pub is_admin: bool,
}

/// Public account view. Omits the enrollment token, which only travels
/// out of band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountView {
    /// Account identifier.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Admin flag.
    pub is_admin: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}
