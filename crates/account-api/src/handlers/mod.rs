//! HTTP request handlers.

pub mod admin;
pub mod auth;
pub mod enrollment;
pub mod health;
