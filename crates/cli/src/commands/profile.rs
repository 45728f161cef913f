//! Caller profile commands.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde_json::json;

use board::{Department, UserRole};

use crate::client::ApiClient;

/// Show the caller's profile and role
#[derive(Args)]
pub struct WhoamiCommand {}

impl WhoamiCommand {
    pub async fn run(&self, client: &ApiClient) -> Result<()> {
        let profile = client.me().await?;
        let role = client.my_role().await?;

        println!("{}", profile.name.bold());
        if let Some(email) = &profile.email {
            println!("  Email:      {email}");
        }
        println!("  Department: {}", profile.department.label());
        println!("  Role:       {}", role.role);
        println!("  Status:     {}", profile.account_status);
        println!("  Points:     {}", profile.performance_points);
        if role.is_admin {
            println!("  {}", "Full administrative access".yellow());
        }
        Ok(())
    }
}

/// Create or update the caller's profile
#[derive(Args)]
pub struct RegisterCommand {
    /// Display name
    #[arg(long)]
    name: String,

    /// Contact email, unique across users
    #[arg(long)]
    email: Option<String>,

    /// Department (construction, marketing, accounts, travelDesk, apartments)
    #[arg(long)]
    department: Department,

    /// Requested role, honored at first registration (admin, manager, employee)
    #[arg(long, default_value = "employee")]
    role: UserRole,
}

impl RegisterCommand {
    pub async fn run(&self, client: &ApiClient) -> Result<()> {
        let mut body = json!({
            "name": self.name,
            "department": self.department,
            "role": self.role,
        });
        if let Some(email) = &self.email {
            body["email"] = json!(email);
        }

        let profile = client.save_profile(&body).await?;
        println!(
            "{} profile for {}",
            "Saved".green().bold(),
            profile.name.bold()
        );
        Ok(())
    }
}
