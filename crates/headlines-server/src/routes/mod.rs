//! HTTP endpoint handlers.
//!
//! - `status`: liveness check, served only once models are loaded
//! - `score`: batch headline scoring

pub mod score;
pub mod status;

use crate::error::ApiError;

/// Fallback for undefined routes.
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
