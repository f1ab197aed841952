use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use headlines_core::ScoringError;
use serde_json::json;

pub type ApiResult<T> = Result<T, ApiError>;

/// Errors surfaced to HTTP clients as `{"detail": "..."}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Well-formed JSON that does not match the request schema.
    #[error("{0}")]
    Validation(String),

    /// Body could not be read as JSON at all.
    #[error("{detail}")]
    BadRequest { status: StatusCode, detail: String },

    #[error(transparent)]
    Scoring(#[from] ScoringError),

    #[error("{0}")]
    Internal(String),

    #[error("Not Found")]
    NotFound,
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::BadRequest { status, .. } => *status,
            Self::Scoring(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(e) => Self::Validation(e.body_text()),
            other => Self::BadRequest {
                status: other.status(),
                detail: other.body_text(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use headlines_core::Stage;

    #[test]
    fn scoring_errors_are_server_errors() {
        let err = ApiError::from(ScoringError::new(Stage::Embed, anyhow::anyhow!("boom")));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "embed stage failed: boom");
    }

    #[test]
    fn validation_is_a_client_error() {
        let err = ApiError::Validation("headlines: invalid type".into());
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
