//! Core data structures for the task board.

mod task;
mod user;

pub use task::{ApprovalStatus, ProofFile, Task, TaskPriority, TaskStatus};
pub use user::{
    normalize_email, validate_email, AccountStatus, Department, UserProfile, UserRole,
    UserStats, UserSummary,
};
