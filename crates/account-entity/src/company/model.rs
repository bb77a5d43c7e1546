//! Company entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

use super::kind::{CompanyRole, Industry};

/// Social links attached to a company. Every network defaults to empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyLinks {
    /// Telegram handle or URL.
    pub telegram: String,
    /// Instagram handle or URL.
    pub instagram: String,
    /// LinkedIn URL.
    pub linkedin: String,
    /// VK URL.
    pub vk: String,
}

/// Company created when an enrollment is confirmed.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Company {
    /// Company identifier.
    pub id: Uuid,
    /// Owning account.
    pub account_id: Uuid,
    /// Company name.
    pub title: String,
    /// Industry.
    pub industry: Industry,
    /// Role of the enrolling person.
    pub role: CompanyRole,
    /// Headcount.
    pub people: i32,
    /// Social links.
    pub links: Json<CompanyLinks>,
    /// When the company was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a company.
#[derive(Debug, Clone)]
pub struct CreateCompany {
    /// Owning account.
    pub account_id: Uuid,
    /// Company name.
    pub title: String,
    /// Industry.
    pub industry: Industry,
    /// Role of the enrolling person.
    pub role: CompanyRole,
    /// Headcount.
    pub people: i32,
    /// Social links.
    pub links: CompanyLinks,
}
