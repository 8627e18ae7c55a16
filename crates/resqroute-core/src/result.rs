//! Convenience result type alias for ResQroute.

use crate::error::AppError;

/// A specialized `Result` type for ResQroute operations.
pub type AppResult<T> = Result<T, AppError>;
