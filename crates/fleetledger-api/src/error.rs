//! Error types for fleetledger-api

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use fleetledger_core::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Bad request: {message}")]
    BadRequest { message: String },

    /// A domain operation refused the input
    #[error(transparent)]
    Rejected(#[from] CoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Rejected(CoreError::NodeNotFound { .. })
            | ApiError::Rejected(CoreError::LineNotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Rejected(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::Rejected(err) => serde_json::to_value(err.to_details())
                .unwrap_or_else(|_| serde_json::json!({ "message": err.to_string() })),
            ApiError::NotFound { .. } => serde_json::json!({
                "code": "NOT_FOUND",
                "message": self.to_string(),
            }),
            ApiError::BadRequest { .. } => serde_json::json!({
                "code": "BAD_REQUEST",
                "message": self.to_string(),
            }),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let dup = ApiError::from(CoreError::DuplicateCode { code: "1110".to_string() });
        assert_eq!(dup.status(), StatusCode::BAD_REQUEST);

        let missing = ApiError::from(CoreError::NodeNotFound { id: "x".to_string() });
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let bad = ApiError::BadRequest { message: "nope".to_string() };
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_rejection_response_status() {
        let response = ApiError::from(CoreError::InvalidParent { code: "1110".to_string() })
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
