//! Append-only, human-readable trace of agent runs.
//!
//! The trace is informational: write failures are logged and otherwise ignored.

use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;

const BANNER_WIDTH: usize = 50;

/// Destination for trace lines.
#[derive(Debug, Clone, Default)]
pub struct TraceSink {
    path: Option<PathBuf>,
}

impl TraceSink {
    /// Append to the file at `path`, creating parent directories as needed.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn disabled() -> Self {
        Self { path: None }
    }

    /// Record a `role: content` event.
    pub async fn event(&self, role: &str, content: &str) {
        self.append(&format!("{}: {}\n", role, content)).await;
    }

    /// Record the start of an iteration.
    pub async fn banner(&self, iteration: usize) {
        let rule = "=".repeat(BANNER_WIDTH);
        self.append(&format!("\n{rule}\nIteration {iteration}\n{rule}\n")).await;
    }

    async fn append(&self, text: &str) {
        let Some(path) = &self.path else {
            return;
        };
        if let Err(e) = append_to_file(path, text).await {
            tracing::warn!("Failed to write trace to {}: {}", path.display(), e);
        }
    }
}

async fn append_to_file(path: &Path, text: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(text.as_bytes()).await?;
    file.flush().await
}
