//! Company classification enums.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Industry a company operates in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "industry", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Industry {
    /// Wholesale and retail trade.
    WholesaleRetail,
    /// Information technology.
    InformationTechnology,
    /// Training and consulting.
    TrainingConsulting,
    /// Tourism.
    Tourism,
    /// Manufacturing.
    Manufacturing,
    /// Marketing and advertising.
    MarketingAdvertising,
    /// Anything else.
    Other,
}

impl Industry {
    /// Return the industry as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WholesaleRetail => "wholesale_retail",
            Self::InformationTechnology => "information_technology",
            Self::TrainingConsulting => "training_consulting",
            Self::Tourism => "tourism",
            Self::Manufacturing => "manufacturing",
            Self::MarketingAdvertising => "marketing_advertising",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for Industry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Industry {
    type Err = account_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "wholesale_retail" => Ok(Self::WholesaleRetail),
            "information_technology" => Ok(Self::InformationTechnology),
            "training_consulting" => Ok(Self::TrainingConsulting),
            "tourism" => Ok(Self::Tourism),
            "manufacturing" => Ok(Self::Manufacturing),
            "marketing_advertising" => Ok(Self::MarketingAdvertising),
            "other" => Ok(Self::Other),
            _ => Err(account_core::AppError::validation(format!(
                "Invalid industry: '{s}'"
            ))),
        }
    }
}

/// Role of the enrolling person within their company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "company_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CompanyRole {
    /// Owner or chief executive.
    Executive,
    /// Manager.
    Manager,
    /// IT specialist.
    ItSpecialist,
    /// Head of a department.
    DepartmentHead,
    /// Anything else.
    Other,
}

impl CompanyRole {
    /// Return the role as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Executive => "executive",
            Self::Manager => "manager",
            Self::ItSpecialist => "it_specialist",
            Self::DepartmentHead => "department_head",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for CompanyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CompanyRole {
    type Err = account_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "executive" => Ok(Self::Executive),
            "manager" => Ok(Self::Manager),
            "it_specialist" => Ok(Self::ItSpecialist),
            "department_head" => Ok(Self::DepartmentHead),
            "other" => Ok(Self::Other),
            _ => Err(account_core::AppError::validation(format!(
                "Invalid company role: '{s}'"
            ))),
        }
    }
}
