//! # account-auth
//!
//! Authentication primitives and session management for the account service.
//!
//! ## Modules
//!
//! - `jwt`: HS256 token issuing and verification, one codec per token class
//! - `csrf`: Double-submit cookie/header CSRF guard
//! - `ledger`: Refresh token revocation ledger and its purge task
//! - `secret`: One-time enrollment password generation and storage
//! - `password`: Argon2id credential hashing
//! - `session`: Login, refresh, logout, and bearer authentication

pub mod csrf;
pub mod jwt;
pub mod ledger;
pub mod password;
pub mod secret;
pub mod session;

pub use csrf::{CsrfGuard, CsrfRejection, CsrfRequest};
pub use jwt::{Claims, IssuedToken, TokenCodec, TokenError, TokenType};
pub use ledger::RevocationLedger;
pub use password::PasswordHasher;
pub use secret::EnrollmentSecretStore;
pub use session::{LoginResult, RefreshSession, SessionManager, TokenPair};
