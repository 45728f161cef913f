//! Error types for the board crate.

use thiserror::Error;

/// Comprehensive error types for the task board
#[derive(Error, Debug, Clone)]
pub enum BoardError {
    // Task errors
    #[error("Task {task_id} not found")]
    TaskNotFound { task_id: u64 },

    #[error("Invalid approval transition for task {task_id}: {from} -> {to}")]
    InvalidTransition {
        task_id: u64,
        from: String,
        to: String,
    },

    #[error("Task {task_id} has no proof attached")]
    NoProofAttached { task_id: u64 },

    #[error("A rejection requires a non-empty comment")]
    EmptyRejectionReason,

    #[error("Deadline must be in the future")]
    DeadlineInPast,

    #[error("Field '{field}' must not be empty")]
    EmptyField { field: String },

    #[error("Exactly one of 'assignedTo' or 'assigneeEmail' must be provided")]
    AssigneeUnspecified,

    #[error("Assignee '{assignee}' is not a registered user")]
    UnknownAssignee { assignee: String },

    #[error("Cannot assign tasks to inactive user '{principal}'")]
    InactiveAssignee { principal: String },

    // Proof errors
    #[error("Unsupported proof content type: '{content_type}'")]
    UnsupportedProofType { content_type: String },

    #[error("Proof of {size} bytes exceeds the {limit} byte limit")]
    ProofTooLarge { size: u64, limit: u64 },

    #[error("Blob '{blob_id}' not found")]
    BlobNotFound { blob_id: String },

    // User errors
    #[error("User '{principal}' not found")]
    UserNotFound { principal: String },

    #[error("Caller '{principal}' has no profile")]
    NotRegistered { principal: String },

    #[error("Account '{principal}' is inactive")]
    AccountInactive { principal: String },

    #[error("Email '{email}' is already in use")]
    EmailTaken { email: String },

    #[error("Invalid email address: '{email}'")]
    InvalidEmail { email: String },

    // Authorization errors
    #[error("Forbidden: {reason}")]
    Forbidden { reason: String },

    // Parse errors
    #[error("Invalid principal: '{principal}'")]
    InvalidPrincipal { principal: String },

    #[error("Invalid role: '{role}'")]
    InvalidRole { role: String },

    #[error("Invalid account status: '{status}'")]
    InvalidAccountStatus { status: String },

    #[error("Invalid department: '{department}'")]
    InvalidDepartment { department: String },

    #[error("Invalid priority: '{priority}'")]
    InvalidPriority { priority: String },

    #[error("Invalid approval status: '{status}'")]
    InvalidApprovalStatus { status: String },

    #[error("Invalid task status: '{status}'")]
    InvalidTaskStatus { status: String },

    #[error("Invalid review decision: '{decision}'")]
    InvalidDecision { decision: String },

    // Storage errors
    #[error("Storage error: {reason}")]
    StorageError { reason: String },

    #[error("Failed to read file '{path}': {reason}")]
    FileReadError { path: String, reason: String },

    #[error("Failed to write file '{path}': {reason}")]
    FileWriteError { path: String, reason: String },

    #[error("Failed to parse JSON: {reason}")]
    JsonParseError { reason: String },
}

impl From<std::io::Error> for BoardError {
    fn from(err: std::io::Error) -> Self {
        Self::StorageError {
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for BoardError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonParseError {
            reason: err.to_string(),
        }
    }
}

/// Result type alias for board operations
pub type BoardResult<T> = Result<T, BoardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BoardError::TaskNotFound { task_id: 42 };
        assert_eq!(err.to_string(), "Task 42 not found");
    }

    #[test]
    fn test_transition_error_display() {
        let err = BoardError::InvalidTransition {
            task_id: 7,
            from: "approved".to_string(),
            to: "pendingReview".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid approval transition for task 7: approved -> pendingReview"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let board_err: BoardError = io_err.into();
        assert!(matches!(board_err, BoardError::StorageError { .. }));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<u64>("not json").unwrap_err();
        let board_err: BoardError = json_err.into();
        assert!(matches!(board_err, BoardError::JsonParseError { .. }));
    }
}
