//! HTTP mapping for domain errors.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use board::BoardError;

/// JSON body returned by every failing endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Stable machine-readable error class.
    pub error: &'static str,
    /// Human-readable description.
    pub message: String,
}

/// An API error: the response status plus its JSON body.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, error: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                error,
                message: message.into(),
            },
        }
    }

    /// Missing or malformed caller identity.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "unauthorized", message)
    }

    /// A request the router could parse but the handler cannot accept.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid_request", message)
    }
}

impl From<BoardError> for ApiError {
    fn from(err: BoardError) -> Self {
        let (status, code) = match &err {
            BoardError::DeadlineInPast
            | BoardError::EmptyField { .. }
            | BoardError::AssigneeUnspecified
            | BoardError::UnknownAssignee { .. }
            | BoardError::InactiveAssignee { .. }
            | BoardError::EmptyRejectionReason
            | BoardError::InvalidEmail { .. }
            | BoardError::InvalidPrincipal { .. }
            | BoardError::InvalidRole { .. }
            | BoardError::InvalidAccountStatus { .. }
            | BoardError::InvalidDepartment { .. }
            | BoardError::InvalidPriority { .. }
            | BoardError::InvalidApprovalStatus { .. }
            | BoardError::InvalidTaskStatus { .. }
            | BoardError::InvalidDecision { .. } => (StatusCode::BAD_REQUEST, "invalid_request"),

            BoardError::Forbidden { .. } | BoardError::AccountInactive { .. } => {
                (StatusCode::FORBIDDEN, "forbidden")
            }

            BoardError::TaskNotFound { .. }
            | BoardError::UserNotFound { .. }
            | BoardError::NotRegistered { .. }
            | BoardError::BlobNotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),

            // State-machine preconditions that the resource is not in
            BoardError::InvalidTransition { .. }
            | BoardError::NoProofAttached { .. }
            | BoardError::EmailTaken { .. } => (StatusCode::CONFLICT, "conflict"),

            BoardError::ProofTooLarge { .. } => {
                (StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large")
            }

            BoardError::UnsupportedProofType { .. } => {
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, "unsupported_media_type")
            }

            BoardError::StorageError { .. }
            | BoardError::FileReadError { .. }
            | BoardError::FileWriteError { .. }
            | BoardError::JsonParseError { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal")
            }
        };

        Self::new(status, code, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, message = %self.body.message, "request failed");
        }
        (self.status, Json(self.body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: BoardError) -> StatusCode {
        ApiError::from(err).status
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_of(BoardError::TaskNotFound { task_id: 1 }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(BoardError::Forbidden {
                reason: "nope".to_string()
            }),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_of(BoardError::InvalidTransition {
                task_id: 1,
                from: "approved".to_string(),
                to: "pendingReview".to_string(),
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(BoardError::ProofTooLarge {
                size: 20,
                limit: 10
            }),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            status_of(BoardError::UnsupportedProofType {
                content_type: "text/html".to_string()
            }),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(
            status_of(BoardError::StorageError {
                reason: "io".to_string()
            }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(status_of(BoardError::DeadlineInPast), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_error_body_shape() {
        let err = ApiError::from(BoardError::TaskNotFound { task_id: 42 });
        let value = serde_json::to_value(&err.body).unwrap();
        assert_eq!(value["error"], "not_found");
        assert_eq!(value["message"], "Task 42 not found");
    }

    #[test]
    fn test_unauthorized_helper() {
        let err = ApiError::unauthorized("missing identity header");
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.body.error, "unauthorized");
    }
}
