//! # account-core
//!
//! Core crate for the account service. Contains the cache provider trait,
//! configuration schemas, and the unified error system.
//!
//! This crate has **no** internal dependencies on other account crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
