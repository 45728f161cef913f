//! Task workflow facade: creation, proof submission, review, and reads.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{require_active, require_manager};
use crate::entities::{
    normalize_email, validate_email, ApprovalStatus, Department, ProofFile, Task, TaskPriority,
    TaskStatus, UserProfile,
};
use crate::errors::{BoardError, BoardResult};
use crate::identity::Principal;
use crate::storage::{BlobStore, Storage};

/// Fields for a new task. Exactly one of `assigned_to` / `assignee_email`
/// identifies the assignee; points are derived from the priority.
#[derive(Debug, Clone)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub department: Department,
    pub priority: TaskPriority,
    pub deadline: DateTime<Utc>,
    pub assigned_to: Option<Principal>,
    pub assignee_email: Option<String>,
}

/// Reviewer's verdict on a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewDecision {
    Approved,
    Rejected,
}

impl std::fmt::Display for ReviewDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

impl std::str::FromStr for ReviewDecision {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "approved" | "approve" => Ok(Self::Approved),
            "rejected" | "reject" => Ok(Self::Rejected),
            _ => Err(BoardError::InvalidDecision {
                decision: s.to_string(),
            }),
        }
    }
}

/// Task as returned to callers: the stored task plus the derived status and
/// the assignee's name/email while their profile exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskView {
    #[serde(flatten)]
    pub task: Task,

    /// Derived color, computed at read time
    pub status: TaskStatus,

    #[serde(default, skip_serializing_if = "Option::is_none", rename = "assigneeName")]
    pub assignee_name: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        rename = "assigneeEmail"
    )]
    pub assignee_email: Option<String>,
}

/// Task workflow facade
#[derive(Clone)]
pub struct TaskFlow {
    storage: Arc<dyn Storage>,
    blobs: Arc<BlobStore>,
}

impl TaskFlow {
    pub fn new(storage: Arc<dyn Storage>, blobs: Arc<BlobStore>) -> Self {
        Self { storage, blobs }
    }

    /// Create a task. Admin/manager only.
    pub async fn create_task(&self, caller: &Principal, draft: TaskDraft) -> BoardResult<u64> {
        require_manager(self.storage.as_ref(), caller).await?;

        let title = draft.title.trim();
        if title.is_empty() {
            return Err(BoardError::EmptyField {
                field: "title".to_string(),
            });
        }
        let description = draft.description.trim();
        if description.is_empty() {
            return Err(BoardError::EmptyField {
                field: "description".to_string(),
            });
        }
        if draft.deadline <= Utc::now() {
            return Err(BoardError::DeadlineInPast);
        }

        let assignee = match (draft.assigned_to, draft.assignee_email) {
            (Some(principal), None) => principal,
            (None, Some(raw)) => {
                let email = normalize_email(&raw);
                validate_email(&email)?;
                self.storage
                    .find_user_by_email(&email)
                    .await?
                    .map(|(principal, _)| principal)
                    .ok_or(BoardError::UnknownAssignee { assignee: email })?
            }
            _ => return Err(BoardError::AssigneeUnspecified),
        };

        let profile = self.storage.get_user(&assignee).await?.ok_or_else(|| {
            BoardError::UnknownAssignee {
                assignee: assignee.to_string(),
            }
        })?;
        if !profile.is_active() {
            return Err(BoardError::InactiveAssignee {
                principal: assignee.to_string(),
            });
        }

        let task_id = self.storage.next_task_id().await?;
        let task = Task::new(
            task_id,
            title,
            description,
            draft.department,
            draft.priority,
            assignee.clone(),
            caller.clone(),
            draft.deadline,
        );
        self.storage.insert_task(task).await?;
        info!(task_id, assignee = %assignee, priority = %draft.priority, "task created");
        Ok(task_id)
    }

    /// Tasks assigned to the caller. An unregistered caller simply has none.
    pub async fn tasks_for_caller(&self, caller: &Principal) -> BoardResult<Vec<TaskView>> {
        let tasks = self.storage.list_tasks_for(caller).await?;
        self.views(tasks).await
    }

    /// Tasks assigned to a user. Admin/manager may query anyone; everyone
    /// else only themselves.
    pub async fn tasks_for_user(
        &self,
        caller: &Principal,
        subject: &Principal,
    ) -> BoardResult<Vec<TaskView>> {
        if caller != subject {
            require_manager(self.storage.as_ref(), caller).await?;
        }
        let tasks = self.storage.list_tasks_for(subject).await?;
        self.views(tasks).await
    }

    /// Every task on the board. Admin/manager only.
    pub async fn all_tasks(&self, caller: &Principal) -> BoardResult<Vec<TaskView>> {
        require_manager(self.storage.as_ref(), caller).await?;
        let tasks = self.storage.list_tasks().await?;
        self.views(tasks).await
    }

    /// A single task. Visible to its assignee and to admins/managers.
    pub async fn get_task(&self, caller: &Principal, task_id: u64) -> BoardResult<TaskView> {
        let task = self.load_task(task_id).await?;
        if !task.is_assigned_to(caller) {
            require_manager(self.storage.as_ref(), caller).await?;
        }
        self.view(task).await
    }

    /// Store a proof file and submit the task for review. Assignee only.
    pub async fn attach_proof(
        &self,
        caller: &Principal,
        task_id: u64,
        filename: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> BoardResult<TaskView> {
        require_active(self.storage.as_ref(), caller).await?;

        let mut task = self.load_task(task_id).await?;
        if !task.is_assigned_to(caller) {
            return Err(BoardError::Forbidden {
                reason: "only the assigned employee can upload proof".to_string(),
            });
        }

        let filename = filename.trim();
        if filename.is_empty() {
            return Err(BoardError::EmptyField {
                field: "filename".to_string(),
            });
        }

        // Validate the transition and the blob limits before writing anything
        if !task.can_submit() {
            return Err(BoardError::InvalidTransition {
                task_id,
                from: task.approval_status.to_string(),
                to: ApprovalStatus::PendingReview.to_string(),
            });
        }
        self.blobs.check(content_type, bytes.len() as u64)?;

        let blob_id = self.blobs.store(content_type, bytes).await?;
        let proof = ProofFile {
            blob_id,
            filename: filename.to_string(),
            content_type: content_type.to_string(),
            size: bytes.len() as u64,
        };
        task.attach_proof(proof, caller.clone(), Utc::now())?;
        self.storage.update_task(&task).await?;
        info!(task_id, by = %caller, size = bytes.len(), "proof uploaded");
        self.view(task).await
    }

    /// Download a task's proof. Assignee and admins/managers.
    pub async fn proof_blob(
        &self,
        caller: &Principal,
        task_id: u64,
    ) -> BoardResult<(ProofFile, Vec<u8>)> {
        let task = self.load_task(task_id).await?;
        if !task.is_assigned_to(caller) {
            require_manager(self.storage.as_ref(), caller).await?;
        }

        let proof = task.proof.ok_or(BoardError::NoProofAttached { task_id })?;
        let bytes = self.blobs.load(&proof.blob_id).await?;
        Ok((proof, bytes))
    }

    /// Resubmit an already-attached proof for review. Assignee only.
    pub async fn mark_complete(&self, caller: &Principal, task_id: u64) -> BoardResult<TaskView> {
        require_active(self.storage.as_ref(), caller).await?;

        let mut task = self.load_task(task_id).await?;
        if !task.is_assigned_to(caller) {
            return Err(BoardError::Forbidden {
                reason: "only the assigned employee can mark the task complete".to_string(),
            });
        }

        task.mark_complete(Utc::now())?;
        self.storage.update_task(&task).await?;
        info!(task_id, by = %caller, "task submitted for review");
        self.view(task).await
    }

    /// Approve or reject a submission. Admin/manager only. Approval credits
    /// the task's points to the assignee.
    pub async fn review_task(
        &self,
        caller: &Principal,
        task_id: u64,
        decision: ReviewDecision,
        comment: Option<String>,
    ) -> BoardResult<TaskView> {
        require_manager(self.storage.as_ref(), caller).await?;

        let mut task = self.load_task(task_id).await?;
        let now = Utc::now();

        match decision {
            ReviewDecision::Approved => {
                task.approve(now)?;
                self.storage.update_task(&task).await?;

                match self.storage.get_user(&task.assigned_to).await? {
                    Some(mut profile) => {
                        profile.credit_points(task.performance_points);
                        self.storage.upsert_user(&task.assigned_to, &profile).await?;
                    }
                    None => warn!(
                        task_id,
                        assignee = %task.assigned_to,
                        "approved task has no assignee profile; points not credited"
                    ),
                }
                info!(task_id, reviewer = %caller, points = task.performance_points, "task approved");
            }
            ReviewDecision::Rejected => {
                task.reject(comment.unwrap_or_default())?;
                self.storage.update_task(&task).await?;
                info!(task_id, reviewer = %caller, "task rejected");
            }
        }

        self.view(task).await
    }

    async fn load_task(&self, task_id: u64) -> BoardResult<Task> {
        self.storage
            .get_task(task_id)
            .await?
            .ok_or(BoardError::TaskNotFound { task_id })
    }

    async fn view(&self, task: Task) -> BoardResult<TaskView> {
        let profile = self.storage.get_user(&task.assigned_to).await?;
        Ok(Self::enrich(task, profile.as_ref(), Utc::now()))
    }

    async fn views(&self, tasks: Vec<Task>) -> BoardResult<Vec<TaskView>> {
        let users: HashMap<Principal, UserProfile> =
            self.storage.list_users().await?.into_iter().collect();
        let now = Utc::now();
        Ok(tasks
            .into_iter()
            .map(|task| {
                let profile = users.get(&task.assigned_to);
                Self::enrich(task, profile, now)
            })
            .collect())
    }

    fn enrich(task: Task, profile: Option<&UserProfile>, now: DateTime<Utc>) -> TaskView {
        TaskView {
            status: task.derived_status(now),
            assignee_name: profile.map(|p| p.name.clone()),
            assignee_email: profile.and_then(|p| p.email.clone()),
            task,
        }
    }
}
