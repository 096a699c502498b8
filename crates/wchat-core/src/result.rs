//! Convenience result type alias for W-Chat.

use crate::error::AppError;

/// A specialized `Result` type for W-Chat operations.
pub type AppResult<T> = Result<T, AppError>;
