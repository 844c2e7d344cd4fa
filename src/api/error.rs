//! API error types with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::db::DatabaseError;
use crate::error::WardError;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping. Front-line staff act
/// differently on each code (pick another bed vs. refresh vs. stop), so
/// every conflict carries its own code rather than a generic 409.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Conflict: {message}")]
    Conflict { code: &'static str, message: String },
    #[error("Database busy")]
    Busy,
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::BadRequest(detail) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail.clone())
            }
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, "NOT_FOUND", detail.clone()),
            ApiError::Conflict { code, message } => {
                (StatusCode::CONFLICT, *code, message.clone())
            }
            ApiError::Busy => (
                StatusCode::SERVICE_UNAVAILABLE,
                "TRY_AGAIN",
                "The ward database is busy; nothing was committed, retry shortly".to_string(),
            ),
            ApiError::Internal(detail) => {
                tracing::error!(detail = %detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

impl From<WardError> for ApiError {
    fn from(err: WardError) -> Self {
        match err {
            WardError::RoomNotFound(_)
            | WardError::BedNotFound(_)
            | WardError::AdmissionNotFound(_) => ApiError::NotFound(err.to_string()),
            WardError::BedUnavailable { .. } => {
                ApiError::Conflict { code: "BED_UNAVAILABLE", message: err.to_string() }
            }
            WardError::RoomAtCapacity { .. } => {
                ApiError::Conflict { code: "ROOM_AT_CAPACITY", message: err.to_string() }
            }
            WardError::BedInUse(_) => {
                ApiError::Conflict { code: "BED_IN_USE", message: err.to_string() }
            }
            WardError::AlreadyDischarged(_) => {
                ApiError::Conflict { code: "ALREADY_DISCHARGED", message: err.to_string() }
            }
            WardError::Validation(detail) => ApiError::BadRequest(detail),
            WardError::Database(db) => ApiError::from(db),
        }
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        if err.is_busy() {
            ApiError::Busy
        } else {
            ApiError::Internal(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use uuid::Uuid;

    #[tokio::test]
    async fn bad_request_returns_400() {
        let response = ApiError::BadRequest("quantity must be at least 1".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn not_found_returns_404() {
        let response = ApiError::NotFound("Admission not found".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn conflict_carries_specific_code() {
        let err: ApiError = WardError::BedUnavailable {
            bed_id: Uuid::new_v4(),
            reason: "occupied".into(),
        }
        .into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["code"], "BED_UNAVAILABLE");
    }

    #[tokio::test]
    async fn already_discharged_maps_to_conflict() {
        let err: ApiError = WardError::AlreadyDischarged("ADM-00000001".into()).into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["code"], "ALREADY_DISCHARGED");
    }

    #[tokio::test]
    async fn internal_hides_details() {
        let response = ApiError::Internal("connection dropped".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["message"], "An internal error occurred");
    }

    #[tokio::test]
    async fn busy_returns_503() {
        let response = ApiError::Busy.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["code"], "TRY_AGAIN");
    }

    #[tokio::test]
    async fn ward_not_found_maps_to_404() {
        let err: ApiError = WardError::AdmissionNotFound("ADM-X".into()).into();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }
}
