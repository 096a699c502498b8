//! # wchat-core
//!
//! Core crate for the W-Chat server. Contains configuration schemas,
//! typed identifiers, chat message records, domain events, the presence
//! persistence trait, and the unified error system.
//!
//! This crate has **no** internal dependencies on other W-Chat crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
