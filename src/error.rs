use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

// Application error type, mapped to HTTP status codes at the boundary
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    // A plan horizon cannot be derived from an empty subject list
    #[error("no subjects to plan for")]
    NoSubjects,

    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    #[error("storage error: {0}")]
    Store(#[from] std::io::Error),
}

impl PlanError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        PlanError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}

impl IntoResponse for PlanError {
    fn into_response(self) -> Response {
        let status = match &self {
            PlanError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            PlanError::NoSubjects => StatusCode::UNPROCESSABLE_ENTITY,
            PlanError::NotFound { .. } => StatusCode::NOT_FOUND,
            PlanError::Store(e) => {
                tracing::error!(error = %e, "storage failure");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, self.to_string()).into_response()
    }
}
