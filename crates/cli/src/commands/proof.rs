//! Proof upload and resubmission.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::fs;
use tokio::io::AsyncReadExt;

use crate::client::ApiClient;
use crate::output::status_colored;

/// Upload a proof file and submit the task for review
#[derive(Args)]
pub struct UploadProofCommand {
    /// Task id
    id: u64,

    /// Path to the proof file (jpg, png, or pdf)
    file: PathBuf,
}

impl UploadProofCommand {
    pub async fn run(&self, client: &ApiClient) -> Result<()> {
        let content_type = content_type_for(&self.file)?;
        let filename = self
            .file
            .file_name()
            .and_then(|name| name.to_str())
            .context("Proof path has no file name")?
            .to_string();

        let metadata = fs::metadata(&self.file)
            .await
            .with_context(|| format!("Cannot read '{}'", self.file.display()))?;

        let bar = ProgressBar::new(metadata.len());
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} {msg}",
            )?
            .progress_chars("#>-"),
        );
        bar.set_message("reading");

        let mut file = fs::File::open(&self.file).await?;
        let mut bytes = Vec::with_capacity(metadata.len() as usize);
        let mut chunk = vec![0u8; 64 * 1024];
        loop {
            let n = file.read(&mut chunk).await?;
            if n == 0 {
                break;
            }
            bytes.extend_from_slice(&chunk[..n]);
            bar.inc(n as u64);
        }

        bar.set_message("uploading");
        let view = client
            .upload_proof(self.id, &filename, content_type, bytes)
            .await?;
        bar.finish_with_message("done");

        println!("Task {} is now {}", self.id, status_colored(view.status));
        Ok(())
    }
}

/// Resubmit the attached proof for review after a rejection
#[derive(Args)]
pub struct CompleteCommand {
    /// Task id
    id: u64,
}

impl CompleteCommand {
    pub async fn run(&self, client: &ApiClient) -> Result<()> {
        let view = client.mark_complete(self.id).await?;
        println!("Task {} is now {}", self.id, status_colored(view.status));
        Ok(())
    }
}

fn content_type_for(path: &Path) -> Result<&'static str> {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => Ok("image/jpeg"),
        "png" => Ok("image/png"),
        "pdf" => Ok("application/pdf"),
        _ => bail!(
            "Unsupported proof file '{}'; use jpg, png, or pdf",
            path.display()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_from_extension() {
        assert_eq!(content_type_for(Path::new("a.jpg")).unwrap(), "image/jpeg");
        assert_eq!(content_type_for(Path::new("a.JPEG")).unwrap(), "image/jpeg");
        assert_eq!(content_type_for(Path::new("a.png")).unwrap(), "image/png");
        assert_eq!(
            content_type_for(Path::new("receipt.pdf")).unwrap(),
            "application/pdf"
        );
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        assert!(content_type_for(Path::new("notes.txt")).is_err());
        assert!(content_type_for(Path::new("noext")).is_err());
    }
}
