//! Session lifecycle management: login, refresh, logout, and bearer authentication.

pub mod manager;

pub use manager::{LoginResult, MISSING_CREDENTIALS, RefreshSession, SessionManager, TokenPair};
