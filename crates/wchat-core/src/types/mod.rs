//! Core type definitions used across the W-Chat workspace.

pub mod id;
pub mod message;

pub use id::*;
pub use message::{MessageRecord, SeenReceipt};
