//! User profile entity and related types.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::{BoardError, BoardResult};
use crate::identity::Principal;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

/// User roles. Admins additionally manage accounts; managers create and
/// review tasks; employees complete them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Manager,
    #[default]
    Employee,
}

impl UserRole {
    pub fn is_admin(self) -> bool {
        self == Self::Admin
    }

    /// Roles allowed to create tasks, review submissions, and read
    /// board-wide views
    pub fn can_manage_tasks(self) -> bool {
        matches!(self, Self::Admin | Self::Manager)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Manager => write!(f, "manager"),
            Self::Employee => write!(f, "employee"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            "employee" => Ok(Self::Employee),
            _ => Err(BoardError::InvalidRole {
                role: s.to_string(),
            }),
        }
    }
}

/// Whether an account may act on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    #[default]
    Active,
    Inactive,
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Inactive => write!(f, "inactive"),
        }
    }
}

impl std::str::FromStr for AccountStatus {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(BoardError::InvalidAccountStatus {
                status: s.to_string(),
            }),
        }
    }
}

/// Company departments tasks and users belong to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Department {
    Construction,
    Marketing,
    Accounts,
    TravelDesk,
    Apartments,
}

impl Department {
    pub const ALL: [Department; 5] = [
        Department::Construction,
        Department::Marketing,
        Department::Accounts,
        Department::TravelDesk,
        Department::Apartments,
    ];

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            Self::Construction => "Construction",
            Self::Marketing => "Marketing",
            Self::Accounts => "Accounts",
            Self::TravelDesk => "Travel Desk",
            Self::Apartments => "Apartments",
        }
    }
}

impl std::fmt::Display for Department {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Construction => write!(f, "construction"),
            Self::Marketing => write!(f, "marketing"),
            Self::Accounts => write!(f, "accounts"),
            Self::TravelDesk => write!(f, "travelDesk"),
            Self::Apartments => write!(f, "apartments"),
        }
    }
}

impl std::str::FromStr for Department {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "construction" => Ok(Self::Construction),
            "marketing" => Ok(Self::Marketing),
            "accounts" => Ok(Self::Accounts),
            "traveldesk" | "travel-desk" | "travel_desk" => Ok(Self::TravelDesk),
            "apartments" => Ok(Self::Apartments),
            _ => Err(BoardError::InvalidDepartment {
                department: s.to_string(),
            }),
        }
    }
}

/// Profile stored per principal. Points and account status are
/// server-managed and never taken from client input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Display name
    pub name: String,

    /// Contact email, unique across users when present. Lowercased on save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default)]
    pub role: UserRole,

    pub department: Department,

    /// Accumulated points from approved tasks
    #[serde(default, rename = "performancePoints")]
    pub performance_points: u64,

    #[serde(default, rename = "accountStatus")]
    pub account_status: AccountStatus,
}

impl UserProfile {
    /// Create a fresh profile with zero points and an active account
    pub fn new(name: impl Into<String>, role: UserRole, department: Department) -> Self {
        Self {
            name: name.into(),
            email: None,
            role,
            department,
            performance_points: 0,
            account_status: AccountStatus::default(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.account_status == AccountStatus::Active
    }

    /// Add approved-task points to the running total
    pub fn credit_points(&mut self, points: u64) {
        self.performance_points = self.performance_points.saturating_add(points);
    }
}

/// Lowercase and trim an email for storage and comparison
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate an email address shape
pub fn validate_email(email: &str) -> BoardResult<()> {
    if EMAIL_PATTERN.is_match(email) {
        Ok(())
    } else {
        Err(BoardError::InvalidEmail {
            email: email.to_string(),
        })
    }
}

/// Row in the active-user listing used by the assignment picker
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub principal: Principal,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub department: Department,
    pub role: UserRole,
}

/// Per-user task statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub principal: Principal,
    pub profile: UserProfile,
    pub total_tasks: u64,
    pub tasks_completed: u64,
    pub performance_points: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!("admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert_eq!("Manager".parse::<UserRole>().unwrap(), UserRole::Manager);
        assert!("owner".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_role_capabilities() {
        assert!(UserRole::Admin.is_admin());
        assert!(UserRole::Admin.can_manage_tasks());
        assert!(UserRole::Manager.can_manage_tasks());
        assert!(!UserRole::Manager.is_admin());
        assert!(!UserRole::Employee.can_manage_tasks());
    }

    #[test]
    fn test_department_tokens() {
        assert_eq!(
            serde_json::to_string(&Department::TravelDesk).unwrap(),
            "\"travelDesk\""
        );
        assert_eq!(
            "travelDesk".parse::<Department>().unwrap(),
            Department::TravelDesk
        );
        assert_eq!(Department::TravelDesk.label(), "Travel Desk");
        assert!("finance".parse::<Department>().is_err());
    }

    #[test]
    fn test_new_profile_defaults() {
        let profile = UserProfile::new("Asha", UserRole::Employee, Department::Marketing);
        assert_eq!(profile.performance_points, 0);
        assert!(profile.is_active());
        assert!(profile.email.is_none());
    }

    #[test]
    fn test_credit_points() {
        let mut profile = UserProfile::new("Asha", UserRole::Employee, Department::Marketing);
        profile.credit_points(20);
        profile.credit_points(30);
        assert_eq!(profile.performance_points, 50);
    }

    #[test]
    fn test_email_validation() {
        assert!(validate_email("asha@example.com").is_ok());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("two@at@signs.com").is_err());
        assert!(validate_email("").is_err());
    }

    #[test]
    fn test_email_normalization() {
        assert_eq!(normalize_email("  Asha@Example.COM "), "asha@example.com");
    }

    #[test]
    fn test_profile_json_field_names() {
        let profile = UserProfile::new("Asha", UserRole::Employee, Department::Marketing);
        let value = serde_json::to_value(&profile).unwrap();
        assert!(value.get("performancePoints").is_some());
        assert!(value.get("accountStatus").is_some());
        assert!(value.get("email").is_none());
    }
}
