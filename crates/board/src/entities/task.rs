//! Task entity, approval state machine, and derived status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::Department;
use crate::errors::{BoardError, BoardResult};
use crate::identity::Principal;

/// Persisted review state of a task. This is the state machine; the colored
/// `TaskStatus` shown to users is derived from it and the deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum ApprovalStatus {
    #[default]
    Pending,
    PendingReview,
    Approved,
    Rejected,
}

impl std::fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::PendingReview => write!(f, "pendingReview"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

impl std::str::FromStr for ApprovalStatus {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "pendingreview" | "pending-review" | "pending_review" => Ok(Self::PendingReview),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(BoardError::InvalidApprovalStatus {
                status: s.to_string(),
            }),
        }
    }
}

/// Derived task color. Never persisted; computed from the approval state and
/// the deadline at read time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// In progress, deadline not passed
    Yellow,
    /// Submitted, awaiting review
    Blue,
    /// Approved
    Green,
    /// Deadline passed without an accepted submission
    Red,
}

impl TaskStatus {
    /// Human-readable label as shown on status badges
    pub fn label(self) -> &'static str {
        match self {
            Self::Yellow => "In Progress",
            Self::Blue => "Under Review",
            Self::Green => "Completed",
            Self::Red => "Overdue",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Yellow => write!(f, "yellow"),
            Self::Blue => write!(f, "blue"),
            Self::Green => write!(f, "green"),
            Self::Red => write!(f, "red"),
        }
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yellow" => Ok(Self::Yellow),
            "blue" => Ok(Self::Blue),
            "green" => Ok(Self::Green),
            "red" => Ok(Self::Red),
            _ => Err(BoardError::InvalidTaskStatus {
                status: s.to_string(),
            }),
        }
    }
}

/// Task priority levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    /// Performance points awarded on approval. Fixed at task creation;
    /// creation requests carry no points field.
    pub fn points(self) -> u64 {
        match self {
            Self::Low => 10,
            Self::Medium => 20,
            Self::High => 30,
        }
    }
}

impl std::fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

impl std::str::FromStr for TaskPriority {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" | "med" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(BoardError::InvalidPriority {
                priority: s.to_string(),
            }),
        }
    }
}

/// Reference to a stored proof-of-completion file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofFile {
    /// Content hash identifying the blob in the proof store
    pub blob_id: String,

    /// Original filename supplied by the uploader
    pub filename: String,

    /// MIME type of the stored content
    pub content_type: String,

    /// Size in bytes
    pub size: u64,
}

/// Core task structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier, issued by storage, never reused
    #[serde(rename = "taskId")]
    pub task_id: u64,

    /// Brief, descriptive title
    pub title: String,

    /// What the assignee is expected to do
    pub description: String,

    /// Department the task belongs to
    pub department: Department,

    /// Priority, which also fixes the point value
    #[serde(default)]
    pub priority: TaskPriority,

    /// Points credited to the assignee on approval
    #[serde(rename = "performancePoints")]
    pub performance_points: u64,

    /// Assigned employee
    #[serde(rename = "assignedTo")]
    pub assigned_to: Principal,

    /// Manager or admin who created the task
    #[serde(rename = "createdBy")]
    pub created_by: Principal,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    /// Completion deadline
    pub deadline: DateTime<Utc>,

    /// Review state
    #[serde(default, rename = "approvalStatus")]
    pub approval_status: ApprovalStatus,

    /// Proof of completion, once uploaded
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "proofFile")]
    pub proof: Option<ProofFile>,

    /// When the proof was submitted for review
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        rename = "submissionTimestamp"
    )]
    pub submission_timestamp: Option<DateTime<Utc>>,

    /// Who submitted the proof
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        rename = "proofSubmittedBy"
    )]
    pub proof_submitted_by: Option<Principal>,

    /// When the task was approved
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        rename = "completionTime"
    )]
    pub completion_time: Option<DateTime<Utc>>,

    /// Reviewer comment from the most recent rejection
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        rename = "rejectionReason"
    )]
    pub rejection_reason: Option<String>,
}

impl Task {
    /// Create a new pending task. Points are derived from the priority.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        task_id: u64,
        title: impl Into<String>,
        description: impl Into<String>,
        department: Department,
        priority: TaskPriority,
        assigned_to: Principal,
        created_by: Principal,
        deadline: DateTime<Utc>,
    ) -> Self {
        Self {
            task_id,
            title: title.into(),
            description: description.into(),
            department,
            priority,
            performance_points: priority.points(),
            assigned_to,
            created_by,
            created_at: Utc::now(),
            deadline,
            approval_status: ApprovalStatus::default(),
            proof: None,
            submission_timestamp: None,
            proof_submitted_by: None,
            completion_time: None,
            rejection_reason: None,
        }
    }

    /// Derive the colored status from the approval state and the deadline.
    /// A deadline exactly equal to `now` is not yet overdue.
    pub fn derived_status(&self, now: DateTime<Utc>) -> TaskStatus {
        match self.approval_status {
            ApprovalStatus::Approved => TaskStatus::Green,
            ApprovalStatus::PendingReview => TaskStatus::Blue,
            ApprovalStatus::Pending | ApprovalStatus::Rejected => {
                if now > self.deadline {
                    TaskStatus::Red
                } else {
                    TaskStatus::Yellow
                }
            }
        }
    }

    pub fn is_assigned_to(&self, principal: &Principal) -> bool {
        self.assigned_to == *principal
    }

    /// Whether a (re)submission is currently allowed
    pub fn can_submit(&self) -> bool {
        matches!(
            self.approval_status,
            ApprovalStatus::Pending | ApprovalStatus::Rejected
        )
    }

    fn transition_error(&self, to: ApprovalStatus) -> BoardError {
        BoardError::InvalidTransition {
            task_id: self.task_id,
            from: self.approval_status.to_string(),
            to: to.to_string(),
        }
    }

    /// Attach a proof file and submit the task for review.
    /// Allowed from Pending or Rejected; late submissions are accepted.
    pub fn attach_proof(
        &mut self,
        proof: ProofFile,
        submitted_by: Principal,
        now: DateTime<Utc>,
    ) -> BoardResult<()> {
        if !self.can_submit() {
            return Err(self.transition_error(ApprovalStatus::PendingReview));
        }

        self.proof = Some(proof);
        self.submission_timestamp = Some(now);
        self.proof_submitted_by = Some(submitted_by);
        self.rejection_reason = None;
        self.approval_status = ApprovalStatus::PendingReview;
        Ok(())
    }

    /// Submit an already-attached proof for review. Used to resubmit after a
    /// rejection without uploading the file again.
    pub fn mark_complete(&mut self, now: DateTime<Utc>) -> BoardResult<()> {
        if !self.can_submit() {
            return Err(self.transition_error(ApprovalStatus::PendingReview));
        }
        if self.proof.is_none() {
            return Err(BoardError::NoProofAttached {
                task_id: self.task_id,
            });
        }

        self.submission_timestamp = Some(now);
        self.rejection_reason = None;
        self.approval_status = ApprovalStatus::PendingReview;
        Ok(())
    }

    /// Approve a submission. Approved is terminal, so the points for a task
    /// can be credited at most once.
    pub fn approve(&mut self, now: DateTime<Utc>) -> BoardResult<()> {
        if self.approval_status != ApprovalStatus::PendingReview {
            return Err(self.transition_error(ApprovalStatus::Approved));
        }

        self.approval_status = ApprovalStatus::Approved;
        self.completion_time = Some(now);
        Ok(())
    }

    /// Reject a submission with a reviewer comment. The task may be
    /// resubmitted afterwards.
    pub fn reject(&mut self, reason: impl Into<String>) -> BoardResult<()> {
        if self.approval_status != ApprovalStatus::PendingReview {
            return Err(self.transition_error(ApprovalStatus::Rejected));
        }

        let reason = reason.into();
        if reason.trim().is_empty() {
            return Err(BoardError::EmptyRejectionReason);
        }

        self.approval_status = ApprovalStatus::Rejected;
        self.rejection_reason = Some(reason);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_task(deadline: DateTime<Utc>) -> Task {
        Task::new(
            1,
            "Repaint lobby",
            "Repaint the lobby of building A",
            Department::Apartments,
            TaskPriority::High,
            Principal::new("emp-1").unwrap(),
            Principal::new("mgr-1").unwrap(),
            deadline,
        )
    }

    fn sample_proof() -> ProofFile {
        ProofFile {
            blob_id: "da39a3ee5e6b4b0d3255bfef95601890afd80709".to_string(),
            filename: "lobby.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
            size: 1024,
        }
    }

    #[test]
    fn test_new_task_points_follow_priority() {
        let now = Utc::now();
        let task = sample_task(now + Duration::days(1));
        assert_eq!(task.performance_points, 30);
        assert_eq!(TaskPriority::Low.points(), 10);
        assert_eq!(TaskPriority::Medium.points(), 20);
    }

    #[test]
    fn test_derived_status_pending() {
        let now = Utc::now();
        let task = sample_task(now + Duration::hours(2));
        assert_eq!(task.derived_status(now), TaskStatus::Yellow);

        let overdue = sample_task(now - Duration::hours(2));
        assert_eq!(overdue.derived_status(now), TaskStatus::Red);
    }

    #[test]
    fn test_derived_status_deadline_boundary() {
        let now = Utc::now();
        let task = sample_task(now);
        assert_eq!(task.derived_status(now), TaskStatus::Yellow);
    }

    #[test]
    fn test_derived_status_tracks_approval_state() {
        let now = Utc::now();
        let mut task = sample_task(now - Duration::hours(1));
        task.attach_proof(sample_proof(), Principal::new("emp-1").unwrap(), now)
            .unwrap();
        assert_eq!(task.derived_status(now), TaskStatus::Blue);

        task.approve(now).unwrap();
        assert_eq!(task.derived_status(now), TaskStatus::Green);
    }

    #[test]
    fn test_attach_proof_submits_for_review() {
        let now = Utc::now();
        let mut task = sample_task(now + Duration::days(1));
        task.attach_proof(sample_proof(), Principal::new("emp-1").unwrap(), now)
            .unwrap();

        assert_eq!(task.approval_status, ApprovalStatus::PendingReview);
        assert_eq!(task.submission_timestamp, Some(now));
        assert!(task.proof.is_some());

        // Re-upload while under review is refused
        let err = task
            .attach_proof(sample_proof(), Principal::new("emp-1").unwrap(), now)
            .unwrap_err();
        assert!(matches!(err, BoardError::InvalidTransition { .. }));
    }

    #[test]
    fn test_mark_complete_requires_proof() {
        let now = Utc::now();
        let mut task = sample_task(now + Duration::days(1));
        let err = task.mark_complete(now).unwrap_err();
        assert!(matches!(err, BoardError::NoProofAttached { .. }));
    }

    #[test]
    fn test_reject_requires_comment_and_allows_resubmission() {
        let now = Utc::now();
        let mut task = sample_task(now + Duration::days(1));
        task.attach_proof(sample_proof(), Principal::new("emp-1").unwrap(), now)
            .unwrap();

        assert!(matches!(
            task.reject("   ").unwrap_err(),
            BoardError::EmptyRejectionReason
        ));

        task.reject("photo is too dark").unwrap();
        assert_eq!(task.approval_status, ApprovalStatus::Rejected);
        assert_eq!(task.rejection_reason.as_deref(), Some("photo is too dark"));

        // Resubmit the same proof; the old reason is cleared
        task.mark_complete(now).unwrap();
        assert_eq!(task.approval_status, ApprovalStatus::PendingReview);
        assert!(task.rejection_reason.is_none());
    }

    #[test]
    fn test_approve_only_from_pending_review() {
        let now = Utc::now();
        let mut task = sample_task(now + Duration::days(1));
        assert!(task.approve(now).is_err());

        task.attach_proof(sample_proof(), Principal::new("emp-1").unwrap(), now)
            .unwrap();
        task.approve(now).unwrap();
        assert_eq!(task.completion_time, Some(now));

        // Terminal: a second approval is refused
        assert!(task.approve(now).is_err());
    }

    #[test]
    fn test_approval_status_tokens() {
        assert_eq!(
            serde_json::to_string(&ApprovalStatus::PendingReview).unwrap(),
            "\"pendingReview\""
        );
        assert_eq!(
            "pendingReview".parse::<ApprovalStatus>().unwrap(),
            ApprovalStatus::PendingReview
        );
        assert!("done".parse::<ApprovalStatus>().is_err());
    }

    #[test]
    fn test_task_json_field_names() {
        let now = Utc::now();
        let task = sample_task(now + Duration::days(1));
        let value = serde_json::to_value(&task).unwrap();
        assert!(value.get("taskId").is_some());
        assert!(value.get("assignedTo").is_some());
        assert!(value.get("performancePoints").is_some());
        assert!(value.get("approvalStatus").is_some());
        // Unset optionals are omitted
        assert!(value.get("proofFile").is_none());
        assert!(value.get("rejectionReason").is_none());
    }
}
