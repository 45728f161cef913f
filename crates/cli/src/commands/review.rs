//! Submission review.

use anyhow::Result;
use clap::Args;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Input;

use board::ReviewDecision;

use crate::client::ApiClient;
use crate::output::status_colored;

/// Approve or reject a submitted task
#[derive(Args)]
pub struct ReviewCommand {
    /// Task id
    id: u64,

    /// approve or reject
    decision: String,

    /// Rejection comment; prompted for when omitted
    #[arg(long)]
    comment: Option<String>,
}

impl ReviewCommand {
    pub async fn run(&self, client: &ApiClient) -> Result<()> {
        let decision: ReviewDecision = self.decision.parse()?;

        // Rejections carry a comment back to the assignee.
        let comment = match (decision, &self.comment) {
            (ReviewDecision::Rejected, None) => {
                let text: String = Input::with_theme(&ColorfulTheme::default())
                    .with_prompt("Rejection comment")
                    .interact_text()?;
                Some(text)
            }
            (_, comment) => comment.clone(),
        };

        let view = client
            .review_task(self.id, &decision.to_string(), comment.as_deref())
            .await?;
        println!("Task {} is now {}", self.id, status_colored(view.status));
        Ok(())
    }
}
