//! Taskdesk operator CLI.
//!
//! Talks to a running Taskdesk API server. Identity is a bare principal
//! string sent on every request; point it at a server with `--api-url`
//! and say who you are with `--principal` or `TASKDESK_PRINCIPAL`.

// Allow product names without backticks in doc comments
#![allow(clippy::doc_markdown)]
// File sizes fit comfortably in usize on supported targets
#![allow(clippy::cast_possible_truncation)]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod client;
mod commands;
mod output;

use client::ApiClient;
use commands::create::CreateCommand;
use commands::dashboard::DashboardCommand;
use commands::profile::{RegisterCommand, WhoamiCommand};
use commands::proof::{CompleteCommand, UploadProofCommand};
use commands::review::ReviewCommand;
use commands::tasks::{OverdueCommand, TaskCommand, TasksCommand};
use commands::users::{DeleteUserCommand, SetRoleCommand, SetStatusCommand, UsersCommand};

/// Taskdesk - task assignment and approval from the terminal.
#[derive(Parser)]
#[command(
    name = "taskdesk",
    version,
    about = "Taskdesk operator CLI",
    long_about = "Work a Taskdesk board from the terminal.\n\n\
                  Managers create and review tasks, employees upload proof of\n\
                  completion, admins run the directory. Every command acts as the\n\
                  principal given by --principal or TASKDESK_PRINCIPAL."
)]
#[command(propagate_version = true)]
struct Cli {
    /// Base URL of the Taskdesk API server.
    #[arg(
        long,
        global = true,
        env = "TASKDESK_API_URL",
        default_value = "http://127.0.0.1:8080"
    )]
    api_url: String,

    /// Principal to act as.
    #[arg(long, global = true, env = "TASKDESK_PRINCIPAL")]
    principal: Option<String>,

    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List tasks, yours by default.
    Tasks(TasksCommand),

    /// Show one task in full.
    Task(TaskCommand),

    /// Create a task and assign it (admin/manager).
    Create(CreateCommand),

    /// Upload a proof file and submit the task for review.
    UploadProof(UploadProofCommand),

    /// Resubmit the attached proof after a rejection.
    Complete(CompleteCommand),

    /// Approve or reject a submitted task (admin/manager).
    Review(ReviewCommand),

    /// List tasks past their deadline.
    Overdue(OverdueCommand),

    /// Board totals, leaderboard, and productivity (admin).
    Dashboard(DashboardCommand),

    /// List users with task counts and points (admin/manager).
    Users(UsersCommand),

    /// Change a user's role (admin).
    SetRole(SetRoleCommand),

    /// Activate or deactivate an account (admin).
    SetStatus(SetStatusCommand),

    /// Delete a user's profile (admin).
    DeleteUser(DeleteUserCommand),

    /// Show your profile.
    Whoami(WhoamiCommand),

    /// Create or update your profile.
    Register(RegisterCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        EnvFilter::new("info,taskdesk=debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let principal = cli
        .principal
        .as_deref()
        .context("Set --principal or TASKDESK_PRINCIPAL to identify yourself")?;
    let client = ApiClient::new(&cli.api_url, principal)?;

    match cli.command {
        Commands::Tasks(cmd) => cmd.run(&client).await,
        Commands::Task(cmd) => cmd.run(&client).await,
        Commands::Create(cmd) => cmd.run(&client).await,
        Commands::UploadProof(cmd) => cmd.run(&client).await,
        Commands::Complete(cmd) => cmd.run(&client).await,
        Commands::Review(cmd) => cmd.run(&client).await,
        Commands::Overdue(cmd) => cmd.run(&client).await,
        Commands::Dashboard(cmd) => cmd.run(&client).await,
        Commands::Users(cmd) => cmd.run(&client).await,
        Commands::SetRole(cmd) => cmd.run(&client).await,
        Commands::SetStatus(cmd) => cmd.run(&client).await,
        Commands::DeleteUser(cmd) => cmd.run(&client).await,
        Commands::Whoami(cmd) => cmd.run(&client).await,
        Commands::Register(cmd) => cmd.run(&client).await,
    }
}
