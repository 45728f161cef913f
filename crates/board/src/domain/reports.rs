//! Board-wide aggregation: admin dashboard and department productivity.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::require_manager;
use crate::entities::{ApprovalStatus, Department, TaskStatus, UserRole};
use crate::errors::BoardResult;
use crate::identity::Principal;
use crate::storage::Storage;

/// Leaderboard row, ordered by points descending
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub principal: Principal,
    pub name: String,
    pub department: Department,
    pub role: UserRole,
    pub points: u64,
}

/// Headline numbers plus the leaderboard
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboard {
    pub total_tasks: u64,
    pub completed_tasks: u64,
    /// Tasks whose derived status is Red right now
    pub late_tasks: u64,
    pub leaderboard: Vec<LeaderboardEntry>,
}

/// Per-department task breakdown
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentProductivity {
    pub department: Department,
    pub total_tasks: u64,
    pub in_progress: u64,
    pub under_review: u64,
    pub completed: u64,
    pub overdue: u64,
    /// Points already credited through approved tasks
    pub points_awarded: u64,
    /// completed / total, 0.0 for an empty department
    pub completion_rate: f64,
}

/// Reporting facade
#[derive(Clone)]
pub struct Reports {
    storage: Arc<dyn Storage>,
}

impl Reports {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Dashboard headline numbers and leaderboard. Admin/manager only.
    pub async fn admin_dashboard(&self, caller: &Principal) -> BoardResult<AdminDashboard> {
        require_manager(self.storage.as_ref(), caller).await?;

        let tasks = self.storage.list_tasks().await?;
        let users = self.storage.list_users().await?;
        let now = Utc::now();

        let total_tasks = tasks.len() as u64;
        let completed_tasks = tasks
            .iter()
            .filter(|t| t.approval_status == ApprovalStatus::Approved)
            .count() as u64;
        let late_tasks = tasks
            .iter()
            .filter(|t| t.derived_status(now) == TaskStatus::Red)
            .count() as u64;

        let mut leaderboard: Vec<LeaderboardEntry> = users
            .into_iter()
            .map(|(principal, profile)| LeaderboardEntry {
                principal,
                name: profile.name,
                department: profile.department,
                role: profile.role,
                points: profile.performance_points,
            })
            .collect();
        leaderboard.sort_by(|a, b| {
            b.points
                .cmp(&a.points)
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });

        Ok(AdminDashboard {
            total_tasks,
            completed_tasks,
            late_tasks,
            leaderboard,
        })
    }

    /// Status breakdown per department, all departments included.
    /// Admin/manager only.
    pub async fn department_productivity(
        &self,
        caller: &Principal,
    ) -> BoardResult<Vec<DepartmentProductivity>> {
        require_manager(self.storage.as_ref(), caller).await?;

        let tasks = self.storage.list_tasks().await?;
        let now = Utc::now();

        Ok(Department::ALL
            .into_iter()
            .map(|department| {
                let mut row = DepartmentProductivity {
                    department,
                    total_tasks: 0,
                    in_progress: 0,
                    under_review: 0,
                    completed: 0,
                    overdue: 0,
                    points_awarded: 0,
                    completion_rate: 0.0,
                };

                for task in tasks.iter().filter(|t| t.department == department) {
                    row.total_tasks += 1;
                    match task.derived_status(now) {
                        TaskStatus::Yellow => row.in_progress += 1,
                        TaskStatus::Blue => row.under_review += 1,
                        TaskStatus::Green => {
                            row.completed += 1;
                            row.points_awarded += task.performance_points;
                        }
                        TaskStatus::Red => row.overdue += 1,
                    }
                }

                if row.total_tasks > 0 {
                    row.completion_rate = row.completed as f64 / row.total_tasks as f64;
                }
                row
            })
            .collect())
    }
}
