#![warn(clippy::pedantic)]
// Allow common pedantic lints that don't affect correctness
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::map_unwrap_or)]

//! # Board
//!
//! Task assignment and approval domain for Taskdesk.
//!
//! Managers create tasks and assign them to employees by principal or email;
//! employees upload proof of completion; managers review and approve or
//! reject. Approvals credit performance points that feed per-user stats and
//! the leaderboard. The colored task status (yellow/blue/green/red) is
//! derived from the persisted approval state and the deadline at read time.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use board::{BlobStore, Directory, FileStorage, TaskFlow};
//!
//! let storage = Arc::new(FileStorage::new("./data"));
//! let blobs = Arc::new(BlobStore::new("./data/blobs"));
//! let flow = TaskFlow::new(storage.clone(), blobs);
//! let directory = Directory::new(storage);
//!
//! let mine = flow.tasks_for_caller(&caller).await?;
//! ```

// Core entities
pub mod entities;

// Error types
pub mod errors;

// Caller identity
pub mod identity;

// Storage layer
pub mod storage;

// Domain facades
pub mod domain;

// Re-export key types for convenience
pub use domain::{
    AdminDashboard, DepartmentProductivity, Directory, LeaderboardEntry, ProfileDraft, Reports,
    ReviewDecision, TaskDraft, TaskFlow, TaskView,
};
pub use entities::{
    AccountStatus, ApprovalStatus, Department, ProofFile, Task, TaskPriority, TaskStatus,
    UserProfile, UserRole, UserStats, UserSummary,
};
pub use errors::{BoardError, BoardResult};
pub use identity::Principal;
pub use storage::{BlobStore, FileStorage, Storage, DEFAULT_MAX_PROOF_BYTES};
