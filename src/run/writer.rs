// src/run/writer.rs
// =============================================================================
// Saves the body of a 200 answer as {run-id}.{index}.html.
//
// The file is always created fresh (an existing file with the same name is
// truncated). The body is written exactly as the HTTP client decoded it.
// =============================================================================

use std::path::{Path, PathBuf};

use super::RunId;
use crate::error::Result;

pub fn page_path(dir: &Path, run_id: &RunId, index: usize) -> PathBuf {
    dir.join(format!("{run_id}.{index}.html"))
}

pub async fn write_page(dir: &Path, run_id: &RunId, index: usize, body: &str) -> Result<()> {
    let path = page_path(dir, run_id, index);
    tokio::fs::write(&path, body).await?;
    tracing::debug!(path = %path.display(), bytes = body.len(), "saved page");
    Ok(())
}
