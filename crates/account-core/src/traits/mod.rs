//! Core traits defined in `account-core` and implemented by other crates.

pub mod cache;

pub use cache::CacheProvider;
