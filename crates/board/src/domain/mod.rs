//! Domain facades: user directory, task workflow, and reporting.
//!
//! All operations take the caller's `Principal` and enforce the role matrix
//! here, against the stored profile; nothing above this layer is trusted for
//! authorization.

mod reports;
mod tasks;
mod users;

pub use reports::{AdminDashboard, DepartmentProductivity, LeaderboardEntry, Reports};
pub use tasks::{ReviewDecision, TaskDraft, TaskFlow, TaskView};
pub use users::{Directory, ProfileDraft};

use crate::entities::UserProfile;
use crate::errors::{BoardError, BoardResult};
use crate::identity::Principal;
use crate::storage::Storage;

/// Load the caller's profile or fail with NotRegistered
pub(crate) async fn require_profile(
    storage: &dyn Storage,
    principal: &Principal,
) -> BoardResult<UserProfile> {
    storage
        .get_user(principal)
        .await?
        .ok_or_else(|| BoardError::NotRegistered {
            principal: principal.to_string(),
        })
}

/// Like `require_profile`, but inactive accounts are refused
pub(crate) async fn require_active(
    storage: &dyn Storage,
    principal: &Principal,
) -> BoardResult<UserProfile> {
    let profile = require_profile(storage, principal).await?;
    if !profile.is_active() {
        return Err(BoardError::AccountInactive {
            principal: principal.to_string(),
        });
    }
    Ok(profile)
}

/// Require an active admin or manager
pub(crate) async fn require_manager(
    storage: &dyn Storage,
    principal: &Principal,
) -> BoardResult<UserProfile> {
    let profile = require_active(storage, principal).await?;
    if !profile.role.can_manage_tasks() {
        return Err(BoardError::Forbidden {
            reason: "requires an admin or manager role".to_string(),
        });
    }
    Ok(profile)
}

/// Require an active admin
pub(crate) async fn require_admin(
    storage: &dyn Storage,
    principal: &Principal,
) -> BoardResult<UserProfile> {
    let profile = require_active(storage, principal).await?;
    if !profile.role.is_admin() {
        return Err(BoardError::Forbidden {
            reason: "requires an admin role".to_string(),
        });
    }
    Ok(profile)
}
