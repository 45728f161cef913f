//! Terminal rendering helpers for tasks and users.

use chrono::{DateTime, Local, Utc};
use colored::Colorize;
use comfy_table::{Cell, Color, ContentArrangement, Table};

use board::{TaskStatus, TaskView};

/// Get colored status string
pub fn status_colored(status: TaskStatus) -> String {
    match status {
        TaskStatus::Yellow => status.label().yellow().to_string(),
        TaskStatus::Blue => status.label().blue().to_string(),
        TaskStatus::Green => status.label().green().to_string(),
        TaskStatus::Red => status.label().red().bold().to_string(),
    }
}

/// Table cell for a status, in the badge color the board uses
pub fn status_cell(status: TaskStatus) -> Cell {
    let color = match status {
        TaskStatus::Yellow => Color::Yellow,
        TaskStatus::Blue => Color::Blue,
        TaskStatus::Green => Color::Green,
        TaskStatus::Red => Color::Red,
    };
    Cell::new(status.label()).fg(color)
}

/// Create an empty table with cyan headers
pub fn styled_table(headers: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(
        headers
            .into_iter()
            .map(|h| Cell::new(h).fg(Color::Cyan))
            .collect::<Vec<_>>(),
    );
    table
}

/// Render timestamps in the operator's local time
pub fn local_time(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// Create a table for displaying tasks
pub fn task_table(tasks: &[TaskView]) -> Table {
    let mut table = styled_table(vec![
        "ID",
        "Title",
        "Assignee",
        "Department",
        "Priority",
        "Deadline",
        "Points",
        "Status",
    ]);

    for view in tasks {
        let assignee = view
            .assignee_name
            .clone()
            .unwrap_or_else(|| view.task.assigned_to.to_string());
        table.add_row(vec![
            Cell::new(view.task.task_id),
            Cell::new(&view.task.title),
            Cell::new(assignee),
            Cell::new(view.task.department.label()),
            Cell::new(view.task.priority.to_string()),
            Cell::new(local_time(view.task.deadline)),
            Cell::new(view.task.performance_points),
            status_cell(view.status),
        ]);
    }
    table
}
