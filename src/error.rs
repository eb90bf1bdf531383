// src/error.rs
// =============================================================================
// Error types shared by the loader, the writer, the run log and the fetcher.
//
// The binary entry point (main.rs) uses anyhow, everything below it returns
// these typed errors so callers and tests can match on them.
// =============================================================================

use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The --input-file path does not exist.
    #[error("File not found: {}", .0.display())]
    FileNotFound(std::path::PathBuf),

    #[error("Io Error: {0}")]
    Io(#[from] std::io::Error),

    /// The HTTP client could not be built (e.g. TLS backend failed to load).
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

// Why a single GET did not produce a response we could act on.
//
// Neither variant is fatal for the run: Transport is logged as an error line
// and the loop moves on, Cancelled ends the loop cleanly.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("cancelled")]
    Cancelled,

    #[error("{0}")]
    Transport(String),
}
