//! # account-database
//!
//! PostgreSQL connection management, the store traits the auth and
//! service layers depend on, and their Postgres and in-memory
//! implementations.

pub mod connection;
#[cfg(feature = "memory")]
pub mod memory;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use repositories::Stores;
