//! Task creation.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::Args;
use colored::Colorize;
use serde_json::json;

use board::{Department, TaskPriority};

use crate::client::ApiClient;

/// Create a task and assign it
#[derive(Args)]
pub struct CreateCommand {
    /// Task title
    #[arg(long)]
    title: String,

    /// What the assignee is expected to deliver
    #[arg(long)]
    description: String,

    /// Department (construction, marketing, accounts, travelDesk, apartments)
    #[arg(long)]
    department: Department,

    /// Priority; fixes the point value (low, medium, high)
    #[arg(long, default_value = "medium")]
    priority: TaskPriority,

    /// Deadline, RFC 3339 or YYYY-MM-DD (end of day UTC)
    #[arg(long)]
    deadline: String,

    /// Assignee principal
    #[arg(long, conflicts_with = "email")]
    assignee: Option<String>,

    /// Assignee email, resolved to a principal by the server
    #[arg(long)]
    email: Option<String>,
}

impl CreateCommand {
    pub async fn run(&self, client: &ApiClient) -> Result<()> {
        if self.assignee.is_none() && self.email.is_none() {
            bail!("Provide one of --assignee or --email");
        }
        let deadline = parse_deadline(&self.deadline)?;

        let mut body = json!({
            "title": self.title,
            "description": self.description,
            "department": self.department,
            "priority": self.priority,
            "deadline": deadline.to_rfc3339(),
        });
        if let Some(assignee) = &self.assignee {
            body["assignedTo"] = json!(assignee);
        }
        if let Some(email) = &self.email {
            body["assigneeEmail"] = json!(email);
        }

        let id = client.create_task(&body).await?;
        println!("{} task {id}", "Created".green().bold());
        Ok(())
    }
}

/// Accepts a full RFC 3339 timestamp or a bare date, which lands at the end
/// of that day in UTC.
fn parse_deadline(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let dt = date
            .and_hms_opt(23, 59, 59)
            .context("Invalid end-of-day time")?;
        return Ok(dt.and_utc());
    }
    bail!("Unrecognized deadline '{raw}'; use RFC 3339 or YYYY-MM-DD")
}
