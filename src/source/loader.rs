// src/source/loader.rs
// =============================================================================
// Resolves the raw URL list for a run.
//
// Precedence:
// 1. One or more --url values: used verbatim, the input file is ignored
// 2. Otherwise --input-file: read line by line (\n, \r\n or a lone \r)
// 3. Neither: there is no work to do (not an error)
//
// Nothing here checks whether a line is a usable URL; that is the
// validator's job. Blank lines and garbage are passed through as-is.
// =============================================================================

use std::io::ErrorKind;
use std::path::PathBuf;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlSource {
    /// URLs given directly on the command line
    Inline(Vec<String>),
    /// A newline-delimited file of URLs
    File(PathBuf),
}

impl UrlSource {
    // Picks the source from the CLI values.
    //
    // Returns None when there is nothing to do. An empty path counts as
    // "no file" so `--input-file ""` behaves like leaving the flag out.
    pub fn from_args(urls: Vec<String>, input_file: Option<PathBuf>) -> Option<Self> {
        if !urls.is_empty() {
            return Some(UrlSource::Inline(urls));
        }

        input_file
            .filter(|path| !path.as_os_str().is_empty())
            .map(UrlSource::File)
    }

    // Produces the ordered list of raw URL strings.
    //
    // A missing file fails with Error::FileNotFound before anything else
    // happens (no log file, no fetches).
    pub async fn load(self) -> Result<Vec<String>> {
        match self {
            UrlSource::Inline(urls) => Ok(urls),
            UrlSource::File(path) => {
                let content = match tokio::fs::read_to_string(&path).await {
                    Ok(content) => content,
                    Err(e) if e.kind() == ErrorKind::NotFound => {
                        return Err(Error::FileNotFound(path));
                    }
                    Err(e) => return Err(e.into()),
                };

                tracing::debug!(path = %path.display(), "loaded url file");

                Ok(split_lines(&content))
            }
        }
    }
}

// Splits on "\r\n", "\n" and a lone "\r". A terminator at the very end does
// not start another (empty) line, but blank lines in the middle are kept.
fn split_lines(content: &str) -> Vec<String> {
    let mut lines: Vec<String> = content
        .split("\r\n")
        .flat_map(|chunk| chunk.split(['\r', '\n']))
        .map(str::to_string)
        .collect();

    if lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    lines
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why does load() take `self` and not `&self`?
//    - The inline list can be handed back as-is, no clone needed
//    - After loading, the source is not needed anymore
//
// 2. What is `Err(e) if e.kind() == ...`?
//    - A match guard: the arm only matches when the condition holds
//    - Here it picks out "file does not exist" from all other io errors
//
// 3. Why not str::lines()?
//    - lines() only knows "\n" and "\r\n"
//    - Files saved with old Mac endings use a lone "\r", which lines() would
//      glue into one long entry
// -----------------------------------------------------------------------------
