//! Custom Axum extractors.

pub mod admin;
pub mod auth;
pub mod json;
pub mod refresh;

pub use admin::AdminAccount;
pub use auth::AuthUser;
pub use json::ApiJson;
pub use refresh::RefreshAuth;
