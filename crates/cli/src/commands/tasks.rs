//! Task listing and inspection.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use board::TaskStatus;

use crate::client::ApiClient;
use crate::output::{local_time, status_colored, task_table};

/// List tasks on the board
#[derive(Args)]
pub struct TasksCommand {
    /// Every task, not just yours (admin/manager)
    #[arg(long)]
    all: bool,

    /// Another user's tasks by principal (admin/manager)
    #[arg(long, conflicts_with = "all")]
    user: Option<String>,
}

impl TasksCommand {
    pub async fn run(&self, client: &ApiClient) -> Result<()> {
        let tasks = if self.all {
            client.all_tasks().await?
        } else if let Some(user) = &self.user {
            client.user_tasks(user).await?
        } else {
            client.my_tasks().await?
        };

        if tasks.is_empty() {
            println!("{}", "No tasks.".dimmed());
            return Ok(());
        }
        println!("{}", task_table(&tasks));
        Ok(())
    }
}

/// Show one task in full
#[derive(Args)]
pub struct TaskCommand {
    /// Task id
    id: u64,
}

impl TaskCommand {
    pub async fn run(&self, client: &ApiClient) -> Result<()> {
        let view = client.get_task(self.id).await?;
        let task = &view.task;

        println!(
            "{} {} {}",
            format!("Task {}", task.task_id).bold(),
            "·".dimmed(),
            status_colored(view.status)
        );
        println!("  Title:       {}", task.title);
        println!("  Description: {}", task.description);
        println!("  Department:  {}", task.department.label());
        println!("  Priority:    {}", task.priority);
        println!("  Points:      {}", task.performance_points);
        println!(
            "  Assignee:    {}",
            view.assignee_name
                .as_deref()
                .unwrap_or_else(|| task.assigned_to.as_str())
        );
        if let Some(email) = &view.assignee_email {
            println!("  Email:       {email}");
        }
        println!("  Created by:  {}", task.created_by.as_str());
        println!("  Created at:  {}", local_time(task.created_at));
        println!("  Deadline:    {}", local_time(task.deadline));
        if let Some(proof) = &task.proof {
            println!(
                "  Proof:       {} ({}, {} bytes)",
                proof.filename, proof.content_type, proof.size
            );
        }
        if let Some(ts) = task.submission_timestamp {
            println!("  Submitted:   {}", local_time(ts));
        }
        if let Some(ts) = task.completion_time {
            println!("  Approved:    {}", local_time(ts));
        }
        if let Some(reason) = &task.rejection_reason {
            println!("  Rejected:    {}", reason.red());
        }
        Ok(())
    }
}

/// List tasks past their deadline and not yet approved
#[derive(Args)]
pub struct OverdueCommand {
    /// Check only your own tasks
    #[arg(long)]
    mine: bool,
}

impl OverdueCommand {
    pub async fn run(&self, client: &ApiClient) -> Result<()> {
        let tasks = if self.mine {
            client.my_tasks().await?
        } else {
            client.all_tasks().await?
        };
        let overdue: Vec<_> = tasks
            .into_iter()
            .filter(|view| view.status == TaskStatus::Red)
            .collect();

        if overdue.is_empty() {
            println!("{}", "Nothing overdue.".green());
            return Ok(());
        }
        println!("{}", task_table(&overdue));
        Ok(())
    }
}
