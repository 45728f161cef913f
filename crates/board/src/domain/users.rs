//! User directory facade: profiles, roles, account status, and stats.

use std::sync::Arc;

use tracing::info;

use super::{require_admin, require_manager};
use crate::entities::{
    normalize_email, validate_email, AccountStatus, ApprovalStatus, Department, UserProfile,
    UserRole, UserStats, UserSummary,
};
use crate::errors::{BoardError, BoardResult};
use crate::identity::Principal;
use crate::storage::Storage;

/// Editable profile fields as submitted by the caller. Points and account
/// status are server-managed and deliberately absent.
#[derive(Debug, Clone)]
pub struct ProfileDraft {
    pub name: String,
    pub email: Option<String>,
    pub department: Department,
    pub role: UserRole,
}

/// User directory facade
#[derive(Clone)]
pub struct Directory {
    storage: Arc<dyn Storage>,
}

impl Directory {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Create or update the caller's own profile.
    ///
    /// The role is honored at first registration (profile setup lets the
    /// user pick one); afterwards only admins can change roles, so on
    /// updates the stored role is kept unless the caller is an admin.
    pub async fn save_profile(
        &self,
        caller: &Principal,
        draft: ProfileDraft,
    ) -> BoardResult<UserProfile> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(BoardError::EmptyField {
                field: "name".to_string(),
            });
        }

        let email = match draft.email {
            Some(raw) => {
                let email = normalize_email(&raw);
                validate_email(&email)?;
                if let Some((owner, _)) = self.storage.find_user_by_email(&email).await? {
                    if owner != *caller {
                        return Err(BoardError::EmailTaken { email });
                    }
                }
                Some(email)
            }
            None => None,
        };

        let profile = match self.storage.get_user(caller).await? {
            Some(mut existing) => {
                if !existing.is_active() {
                    return Err(BoardError::AccountInactive {
                        principal: caller.to_string(),
                    });
                }
                existing.name = name.to_string();
                existing.email = email;
                existing.department = draft.department;
                if existing.role.is_admin() {
                    existing.role = draft.role;
                }
                existing
            }
            None => {
                let mut profile = UserProfile::new(name, draft.role, draft.department);
                profile.email = email;
                profile
            }
        };

        self.storage.upsert_user(caller, &profile).await?;
        info!(principal = %caller, role = %profile.role, "profile saved");
        Ok(profile)
    }

    /// The caller's own profile, if registered
    pub async fn caller_profile(&self, caller: &Principal) -> BoardResult<Option<UserProfile>> {
        self.storage.get_user(caller).await
    }

    /// The caller's role, if registered
    pub async fn caller_role(&self, caller: &Principal) -> BoardResult<Option<UserRole>> {
        Ok(self.storage.get_user(caller).await?.map(|p| p.role))
    }

    /// Another user's profile. Admin/manager only.
    pub async fn user_profile(
        &self,
        caller: &Principal,
        subject: &Principal,
    ) -> BoardResult<UserProfile> {
        require_manager(self.storage.as_ref(), caller).await?;
        self.storage
            .get_user(subject)
            .await?
            .ok_or_else(|| BoardError::UserNotFound {
                principal: subject.to_string(),
            })
    }

    /// Active accounts, for the assignment picker. Admin/manager only.
    pub async fn active_users(&self, caller: &Principal) -> BoardResult<Vec<UserSummary>> {
        require_manager(self.storage.as_ref(), caller).await?;

        let mut users: Vec<UserSummary> = self
            .storage
            .list_users()
            .await?
            .into_iter()
            .filter(|(_, profile)| profile.is_active())
            .map(|(principal, profile)| UserSummary {
                principal,
                name: profile.name,
                email: profile.email,
                department: profile.department,
                role: profile.role,
            })
            .collect();
        users.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(users)
    }

    /// Change a user's role. Admin only.
    pub async fn update_user_role(
        &self,
        caller: &Principal,
        subject: &Principal,
        role: UserRole,
    ) -> BoardResult<UserProfile> {
        require_admin(self.storage.as_ref(), caller).await?;

        let mut profile =
            self.storage
                .get_user(subject)
                .await?
                .ok_or_else(|| BoardError::UserNotFound {
                    principal: subject.to_string(),
                })?;
        profile.role = role;
        self.storage.upsert_user(subject, &profile).await?;
        info!(principal = %subject, role = %role, "role updated");
        Ok(profile)
    }

    /// Activate or deactivate an account. Admin only.
    pub async fn set_account_status(
        &self,
        caller: &Principal,
        subject: &Principal,
        status: AccountStatus,
    ) -> BoardResult<UserProfile> {
        require_admin(self.storage.as_ref(), caller).await?;

        let mut profile =
            self.storage
                .get_user(subject)
                .await?
                .ok_or_else(|| BoardError::UserNotFound {
                    principal: subject.to_string(),
                })?;
        profile.account_status = status;
        self.storage.upsert_user(subject, &profile).await?;
        info!(principal = %subject, status = %status, "account status updated");
        Ok(profile)
    }

    /// Remove a user. Admin only. Historical tasks keep the principal;
    /// task views simply lose the resolved name and email.
    pub async fn delete_user(&self, caller: &Principal, subject: &Principal) -> BoardResult<()> {
        require_admin(self.storage.as_ref(), caller).await?;

        if !self.storage.delete_user(subject).await? {
            return Err(BoardError::UserNotFound {
                principal: subject.to_string(),
            });
        }
        info!(principal = %subject, "user deleted");
        Ok(())
    }

    /// Task statistics for every registered user. Admin/manager only.
    pub async fn all_users_stats(&self, caller: &Principal) -> BoardResult<Vec<UserStats>> {
        require_manager(self.storage.as_ref(), caller).await?;

        let users = self.storage.list_users().await?;
        let tasks = self.storage.list_tasks().await?;

        let mut stats: Vec<UserStats> = users
            .into_iter()
            .map(|(principal, profile)| {
                let total_tasks = tasks
                    .iter()
                    .filter(|t| t.assigned_to == principal)
                    .count() as u64;
                let tasks_completed = tasks
                    .iter()
                    .filter(|t| {
                        t.assigned_to == principal
                            && t.approval_status == ApprovalStatus::Approved
                    })
                    .count() as u64;
                let performance_points = profile.performance_points;
                UserStats {
                    principal,
                    profile,
                    total_tasks,
                    tasks_completed,
                    performance_points,
                }
            })
            .collect();
        stats.sort_by(|a, b| {
            a.profile
                .name
                .to_lowercase()
                .cmp(&b.profile.name.to_lowercase())
        });
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::FileStorage;
    use tempfile::TempDir;

    fn setup() -> (Directory, Arc<FileStorage>, TempDir) {
        let temp = TempDir::new().unwrap();
        let storage = Arc::new(FileStorage::new(temp.path()));
        let directory = Directory::new(storage.clone());
        (directory, storage, temp)
    }

    fn principal(s: &str) -> Principal {
        Principal::new(s).unwrap()
    }

    fn draft(name: &str, email: Option<&str>, role: UserRole) -> ProfileDraft {
        ProfileDraft {
            name: name.to_string(),
            email: email.map(str::to_string),
            department: Department::Construction,
            role,
        }
    }

    async fn register(directory: &Directory, who: &str, role: UserRole) -> Principal {
        let p = principal(who);
        directory
            .save_profile(&p, draft(who, Some(&format!("{who}@example.com")), role))
            .await
            .unwrap();
        p
    }

    #[tokio::test]
    async fn test_register_and_fetch_profile() {
        let (directory, _storage, _temp) = setup();
        let p = principal("emp-1");

        assert!(directory.caller_profile(&p).await.unwrap().is_none());

        let profile = directory
            .save_profile(&p, draft("Asha", Some("Asha@Example.com"), UserRole::Employee))
            .await
            .unwrap();
        assert_eq!(profile.performance_points, 0);
        // Emails are stored normalized
        assert_eq!(profile.email.as_deref(), Some("asha@example.com"));
        assert_eq!(
            directory.caller_role(&p).await.unwrap(),
            Some(UserRole::Employee)
        );
    }

    #[tokio::test]
    async fn test_registration_rejects_bad_or_taken_email() {
        let (directory, _storage, _temp) = setup();
        register(&directory, "emp-1", UserRole::Employee).await;

        let err = directory
            .save_profile(
                &principal("emp-2"),
                draft("Noor", Some("not-an-email"), UserRole::Employee),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, BoardError::InvalidEmail { .. }));

        // Case-insensitive clash with emp-1's address
        let err = directory
            .save_profile(
                &principal("emp-2"),
                draft("Noor", Some("EMP-1@example.com"), UserRole::Employee),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, BoardError::EmailTaken { .. }));

        // Re-saving your own email is fine
        let p1 = principal("emp-1");
        assert!(directory
            .save_profile(&p1, draft("Asha", Some("emp-1@example.com"), UserRole::Employee))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_profile_update_keeps_role_for_non_admins() {
        let (directory, _storage, _temp) = setup();
        let p = register(&directory, "emp-1", UserRole::Employee).await;

        let updated = directory
            .save_profile(&p, draft("Asha N.", None, UserRole::Manager))
            .await
            .unwrap();
        assert_eq!(updated.role, UserRole::Employee);
        assert_eq!(updated.name, "Asha N.");
    }

    #[tokio::test]
    async fn test_admin_may_change_own_role() {
        let (directory, _storage, _temp) = setup();
        let p = register(&directory, "admin-1", UserRole::Admin).await;

        let updated = directory
            .save_profile(&p, draft("Root", None, UserRole::Manager))
            .await
            .unwrap();
        assert_eq!(updated.role, UserRole::Manager);
    }

    #[tokio::test]
    async fn test_role_update_requires_admin() {
        let (directory, _storage, _temp) = setup();
        let manager = register(&directory, "mgr-1", UserRole::Manager).await;
        let employee = register(&directory, "emp-1", UserRole::Employee).await;

        let err = directory
            .update_user_role(&manager, &employee, UserRole::Manager)
            .await
            .unwrap_err();
        assert!(matches!(err, BoardError::Forbidden { .. }));

        let admin = register(&directory, "admin-1", UserRole::Admin).await;
        let profile = directory
            .update_user_role(&admin, &employee, UserRole::Manager)
            .await
            .unwrap();
        assert_eq!(profile.role, UserRole::Manager);
    }

    #[tokio::test]
    async fn test_deactivated_account_is_blocked() {
        let (directory, _storage, _temp) = setup();
        let admin = register(&directory, "admin-1", UserRole::Admin).await;
        let employee = register(&directory, "emp-1", UserRole::Employee).await;

        directory
            .set_account_status(&admin, &employee, AccountStatus::Inactive)
            .await
            .unwrap();

        // Inactive users can still be read but cannot mutate
        assert!(directory.caller_profile(&employee).await.unwrap().is_some());
        let err = directory
            .save_profile(&employee, draft("Asha", None, UserRole::Employee))
            .await
            .unwrap_err();
        assert!(matches!(err, BoardError::AccountInactive { .. }));
    }

    #[tokio::test]
    async fn test_delete_user() {
        let (directory, _storage, _temp) = setup();
        let admin = register(&directory, "admin-1", UserRole::Admin).await;
        let employee = register(&directory, "emp-1", UserRole::Employee).await;

        directory.delete_user(&admin, &employee).await.unwrap();
        assert!(directory.caller_profile(&employee).await.unwrap().is_none());

        let err = directory.delete_user(&admin, &employee).await.unwrap_err();
        assert!(matches!(err, BoardError::UserNotFound { .. }));
    }

    #[tokio::test]
    async fn test_active_users_excludes_inactive_and_sorts() {
        let (directory, _storage, _temp) = setup();
        let admin = register(&directory, "admin-1", UserRole::Admin).await;
        register(&directory, "zoe", UserRole::Employee).await;
        let beni = register(&directory, "beni", UserRole::Employee).await;

        directory
            .set_account_status(&admin, &beni, AccountStatus::Inactive)
            .await
            .unwrap();

        let active = directory.active_users(&admin).await.unwrap();
        let names: Vec<&str> = active.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["admin-1", "zoe"]);
    }

    #[tokio::test]
    async fn test_stats_require_manager_role() {
        let (directory, _storage, _temp) = setup();
        let employee = register(&directory, "emp-1", UserRole::Employee).await;

        let err = directory.all_users_stats(&employee).await.unwrap_err();
        assert!(matches!(err, BoardError::Forbidden { .. }));

        let err = directory
            .active_users(&principal("ghost"))
            .await
            .unwrap_err();
        assert!(matches!(err, BoardError::NotRegistered { .. }));
    }
}
