//! Storage trait definitions.

use async_trait::async_trait;

use crate::entities::{Task, UserProfile};
use crate::errors::BoardResult;
use crate::identity::Principal;

/// Storage interface for tasks and user profiles
#[async_trait]
pub trait Storage: Send + Sync {
    /// Initialize storage (create directories, etc.)
    async fn initialize(&self) -> BoardResult<()>;

    /// Get storage type identifier
    fn storage_type(&self) -> &'static str;

    // === Task Operations ===

    /// Allocate the next task ID. IDs are strictly increasing and are never
    /// reused, including across restarts.
    async fn next_task_id(&self) -> BoardResult<u64>;

    /// Add a new task
    async fn insert_task(&self, task: Task) -> BoardResult<()>;

    /// Load a single task by ID
    async fn get_task(&self, task_id: u64) -> BoardResult<Option<Task>>;

    /// Replace a stored task
    async fn update_task(&self, task: &Task) -> BoardResult<()>;

    /// Load all tasks
    async fn list_tasks(&self) -> BoardResult<Vec<Task>>;

    /// Load all tasks assigned to a principal
    async fn list_tasks_for(&self, assignee: &Principal) -> BoardResult<Vec<Task>>;

    // === User Operations ===

    /// Load a profile by principal
    async fn get_user(&self, principal: &Principal) -> BoardResult<Option<UserProfile>>;

    /// Find a user by normalized email
    async fn find_user_by_email(
        &self,
        email: &str,
    ) -> BoardResult<Option<(Principal, UserProfile)>>;

    /// Create or replace a profile
    async fn upsert_user(&self, principal: &Principal, profile: &UserProfile) -> BoardResult<()>;

    /// Remove a profile. Returns whether one existed.
    async fn delete_user(&self, principal: &Principal) -> BoardResult<bool>;

    /// Load all profiles
    async fn list_users(&self) -> BoardResult<Vec<(Principal, UserProfile)>>;
}
