//! Mail profile entity model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Sender profile used by the outbound mail relay.
#[derive(Clone, Serialize, Deserialize, FromRow)]
pub struct MailProfile {
    /// Profile identifier.
    pub id: Uuid,
    /// Human-readable name.
    pub name: String,
    /// Whether this profile is the one in use.
    pub is_active: bool,
    /// Relay host.
    pub host: String,
    /// Relay port.
    pub port: i32,
    /// Relay login.
    pub username: String,
    /// Relay password.
    #[serde(skip_serializing)]
    pub password: String,
    /// Sender address.
    pub from_email: String,
    /// STARTTLS.
    pub use_tls: bool,
    /// Implicit TLS.
    pub use_ssl: bool,
    /// Connection timeout in seconds.
    pub timeout_seconds: i32,
    /// When the profile was created.
    pub created_at: DateTime<Utc>,
}

impl fmt::Debug for MailProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailProfile")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("is_active", &self.is_active)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("from_email", &self.from_email)
            .finish()
    }
}
