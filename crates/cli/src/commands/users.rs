//! User administration.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use comfy_table::Cell;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Confirm;

use board::{AccountStatus, UserRole};

use crate::client::ApiClient;
use crate::output::styled_table;

/// List users with task counts and points
#[derive(Args)]
pub struct UsersCommand {
    /// Only active users, the assignment picker view
    #[arg(long)]
    active: bool,
}

impl UsersCommand {
    pub async fn run(&self, client: &ApiClient) -> Result<()> {
        if self.active {
            let users = client.active_users().await?;
            let mut table =
                styled_table(vec!["Principal", "Name", "Email", "Department", "Role"]);
            for user in &users {
                table.add_row(vec![
                    Cell::new(user.principal.as_str()),
                    Cell::new(&user.name),
                    Cell::new(user.email.as_deref().unwrap_or("-")),
                    Cell::new(user.department.label()),
                    Cell::new(user.role.to_string()),
                ]);
            }
            println!("{table}");
            return Ok(());
        }

        let stats = client.user_stats().await?;
        let mut table = styled_table(vec![
            "Principal",
            "Name",
            "Department",
            "Role",
            "Status",
            "Tasks",
            "Completed",
            "Points",
        ]);
        for row in &stats {
            table.add_row(vec![
                Cell::new(row.principal.as_str()),
                Cell::new(&row.profile.name),
                Cell::new(row.profile.department.label()),
                Cell::new(row.profile.role.to_string()),
                Cell::new(row.profile.account_status.to_string()),
                Cell::new(row.total_tasks),
                Cell::new(row.tasks_completed),
                Cell::new(row.performance_points),
            ]);
        }
        println!("{table}");
        Ok(())
    }
}

/// Change a user's role (admin only)
#[derive(Args)]
pub struct SetRoleCommand {
    /// Subject principal
    principal: String,

    /// New role (admin, manager, employee)
    role: UserRole,
}

impl SetRoleCommand {
    pub async fn run(&self, client: &ApiClient) -> Result<()> {
        let profile = client.set_role(&self.principal, self.role).await?;
        println!("{} is now {}", profile.name.bold(), profile.role);
        Ok(())
    }
}

/// Activate or deactivate an account (admin only)
#[derive(Args)]
pub struct SetStatusCommand {
    /// Subject principal
    principal: String,

    /// New status (active, inactive)
    status: AccountStatus,
}

impl SetStatusCommand {
    pub async fn run(&self, client: &ApiClient) -> Result<()> {
        let profile = client.set_status(&self.principal, self.status).await?;
        println!("{} is now {}", profile.name.bold(), profile.account_status);
        Ok(())
    }
}

/// Delete a user's profile; their historical tasks remain
#[derive(Args)]
pub struct DeleteUserCommand {
    /// Subject principal
    principal: String,

    /// Skip the confirmation prompt
    #[arg(long)]
    yes: bool,
}

impl DeleteUserCommand {
    pub async fn run(&self, client: &ApiClient) -> Result<()> {
        if !self.yes {
            let proceed = Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt(format!("Delete user '{}'?", self.principal))
                .default(false)
                .interact()?;
            if !proceed {
                println!("{}", "Cancelled.".yellow());
                return Ok(());
            }
        }
        client.delete_user(&self.principal).await?;
        println!("Deleted '{}'", self.principal);
        Ok(())
    }
}
