//! Board-wide reporting.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use comfy_table::Cell;

use crate::client::ApiClient;
use crate::output::styled_table;

/// Board totals, the leaderboard, and department productivity
#[derive(Args)]
pub struct DashboardCommand {
    /// Include the per-department productivity table
    #[arg(long)]
    departments: bool,
}

impl DashboardCommand {
    pub async fn run(&self, client: &ApiClient) -> Result<()> {
        let dashboard = client.dashboard().await?;

        println!("{}", "Taskdesk".bold());
        println!("  Total tasks: {}", dashboard.total_tasks);
        println!(
            "  Completed:   {}",
            dashboard.completed_tasks.to_string().green()
        );
        println!("  Late:        {}", dashboard.late_tasks.to_string().red());
        println!();

        let mut table = styled_table(vec!["#", "Name", "Department", "Role", "Points"]);
        for (rank, entry) in dashboard.leaderboard.iter().enumerate() {
            table.add_row(vec![
                Cell::new(rank + 1),
                Cell::new(&entry.name),
                Cell::new(entry.department.label()),
                Cell::new(entry.role.to_string()),
                Cell::new(entry.points),
            ]);
        }
        println!("{table}");

        if self.departments {
            let rows = client.department_productivity().await?;
            let mut table = styled_table(vec![
                "Department",
                "Tasks",
                "In Progress",
                "Under Review",
                "Completed",
                "Overdue",
                "Points",
                "Completion",
            ]);
            for row in &rows {
                table.add_row(vec![
                    Cell::new(row.department.label()),
                    Cell::new(row.total_tasks),
                    Cell::new(row.in_progress),
                    Cell::new(row.under_review),
                    Cell::new(row.completed),
                    Cell::new(row.overdue),
                    Cell::new(row.points_awarded),
                    Cell::new(format!("{:.0}%", row.completion_rate * 100.0)),
                ]);
            }
            println!();
            println!("{table}");
        }
        Ok(())
    }
}
