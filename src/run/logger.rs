// src/run/logger.rs
// =============================================================================
// The per-run log file, {run-id}.log.
//
// Format (one event per line, no timestamps):
//   Start work: {run-id}
//   process: {i}/{max} {url}
//   error: {i}/{max} {status or reason}
//
// Each line is flushed as soon as it is written, so a run that dies halfway
// still leaves everything up to that point on disk. finish() must be called
// to close the handle; the fetch loop does it on every exit path.
// =============================================================================

use std::fmt::Display;
use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};

use super::RunId;
use crate::error::Result;

pub struct RunLog {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl RunLog {
    // Creates (or truncates) the log and writes the header line.
    // The output directory is created if it does not exist yet.
    pub async fn create(dir: &Path, run_id: &RunId) -> Result<Self> {
        tokio::fs::create_dir_all(dir).await?;

        let path = dir.join(format!("{run_id}.log"));
        let file = File::create(&path).await?;

        let mut log = Self {
            path,
            writer: BufWriter::new(file),
        };
        log.write_line(&format!("Start work: {run_id}")).await?;
        Ok(log)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn progress(&mut self, index: usize, max: usize, url: &str) -> Result<()> {
        self.write_line(&format!("process: {index}/{max} {url}")).await
    }

    pub async fn error(&mut self, index: usize, max: usize, reason: impl Display) -> Result<()> {
        self.write_line(&format!("error: {index}/{max} {reason}")).await
    }

    pub async fn finish(mut self) -> Result<()> {
        self.writer.flush().await?;
        self.writer.shutdown().await?;
        Ok(())
    }

    async fn write_line(&mut self, line: &str) -> Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }
}
