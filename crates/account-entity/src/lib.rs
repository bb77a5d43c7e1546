//! # account-entity
//!
//! Domain entity models for the account service. Every struct in this crate
//! represents a database table row or a domain value object. All entities
//! derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and database
//! entities additionally derive `sqlx::FromRow`.

pub mod account;
pub mod company;
pub mod mail_profile;
pub mod profile;
pub mod revocation;
pub mod user;
