//! Refresh token revocation entities.

pub mod model;

pub use model::RevocationEntry;
