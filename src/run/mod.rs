// src/run/mod.rs
// =============================================================================
// One invocation of the tool = one Run.
//
// A Run has a random id. The id names every file the run produces:
//   {run-id}.log         progress and error lines
//   {run-id}.{n}.html    body of the n-th validated URL, if it answered 200
//
// Submodules:
// - fetch: the Fetcher trait and the reqwest implementation
// - fetch_loop: the sequential driver (delay, GET, write or log)
// - writer: saves page bodies
// - logger: the per-run log file
// =============================================================================

mod fetch;
mod fetch_loop;
mod logger;
mod writer;

pub use fetch::HttpFetcher;
pub use fetch_loop::run_all;

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunId(Uuid);

impl RunId {
    pub fn new() -> Self {
        RunId(Uuid::new_v4())
    }
}

impl From<Uuid> for RunId {
    fn from(id: Uuid) -> Self {
        RunId(id)
    }
}

// Lowercase hyphenated form, e.g. 67e55044-10b1-426f-9247-bb680e5fe0c8
impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

// Settings that come from the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Directory for the log and the saved pages
    pub output_dir: PathBuf,
    /// Pause before every fetch, including the first
    pub delay: Duration,
}

#[derive(Debug, Clone)]
pub struct RunContext {
    pub id: RunId,
    pub config: RunConfig,
}

impl RunContext {
    // Starts a new run with a fresh id
    pub fn new(config: RunConfig) -> Self {
        Self {
            id: RunId::new(),
            config,
        }
    }
}
