//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use account_entity::company::{CompanyLinks, CompanyRole, Industry};
use account_service::enrollment::{Confirmation, Registration};

/// Registration request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegistrationRequest {
    /// Username: letters, digits and `@.+-_`, at most 150 characters.
    #[validate(
        length(min = 1, max = 150, message = "Username must be 1-150 characters"),
        custom(function = "validate_username")
    )]
    pub username: String,
    /// Email address.
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
}

impl From<RegistrationRequest> for Registration {
    fn from(req: RegistrationRequest) -> Self {
        Self {
            username: req.username,
            email: req.email,
        }
    }
}

/// Confirmation request body: company details and the one-time password.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ConfirmationRequest {
    /// Company name.
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,
    /// Industry.
    pub industry: Industry,
    /// Role in the company.
    pub role: CompanyRole,
    /// Headcount.
    #[validate(range(min = 1, message = "People must be at least 1"))]
    pub people: i32,
    /// Social links; missing networks default to empty.
    #[serde(default)]
    pub links: CompanyLinks,
    /// One-time password from the enrollment mail.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl From<ConfirmationRequest> for Confirmation {
    fn from(req: ConfirmationRequest) -> Self {
        Self {
            title: req.title,
            industry: req.industry,
            role: req.role,
            people: req.people,
            links: req.links,
            password: req.password,
        }
    }
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username.
    #[validate(length(min = 1, message = "username required"))]
    pub username: String,
    /// Password, checked only when the login policy requires it.
    #[serde(default)]
    pub password: Option<String>,
}

fn validate_username(username: &str) -> Result<(), ValidationError> {
    let valid = username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'));
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("username_chars").with_message(
            "Username may contain only letters, digits and @/./+/-/_ characters.".into(),
        ))
    }
}
