// src/run/fetch.rs
// =============================================================================
// Issues one HTTP GET and turns the answer into something the loop can act on.
//
// Outcomes:
// - 200 OK             -> FetchOutcome::Page(body)
// - any other status   -> FetchOutcome::Status(code)
// - no response at all -> FetchError::Transport(reason)
// - Ctrl-C mid-flight  -> FetchError::Cancelled
//
// The request uses the client's defaults (no custom headers, no auth, the
// default redirect policy) plus a 100 second timeout for the whole exchange,
// so a stalled server turns into an error line instead of a hung run.
// There is no retry.
// =============================================================================

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tokio_util::sync::CancellationToken;

use crate::error::{FetchError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Full response body of a 200 answer, decoded as text
    Page(String),
    /// Any status other than 200
    Status(StatusCode),
}

// The seam between the fetch loop and the network.
//
// The loop only ever has one call in flight, but the trait stays Send + Sync
// so the future can live on the multi-threaded runtime.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> std::result::Result<FetchOutcome, FetchError>;
}

pub struct HttpFetcher {
    client: Client,
}

// Whole-request limit, connect through body
const REQUEST_TIMEOUT: Duration = Duration::from_secs(100);

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        Self::with_timeout(REQUEST_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> std::result::Result<FetchOutcome, FetchError> {
        // biased: a cancelled token always wins over a ready response
        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(FetchError::Cancelled),
            result = self.client.get(url).send() => result.map_err(categorize_error)?,
        };

        let status = response.status();
        if status != StatusCode::OK {
            return Ok(FetchOutcome::Status(status));
        }

        let body = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(FetchError::Cancelled),
            result = response.text() => result.map_err(categorize_error)?,
        };

        Ok(FetchOutcome::Page(body))
    }
}

// Short, log-friendly description of why there was no usable response
fn categorize_error(error: reqwest::Error) -> FetchError {
    let error_string = error.to_string();

    let reason = if error.is_timeout() {
        "timed out".to_string()
    } else if error.is_redirect() {
        "too many redirects".to_string()
    } else if error.is_connect() {
        if error_string.contains("dns") {
            "could not resolve host".to_string()
        } else {
            "connection failed".to_string()
        }
    } else {
        error_string
    };

    FetchError::Transport(reason)
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a trait for one real implementation?
//    - run_all only needs "give me the outcome for this URL"
//    - Tests swap in a stub, so the loop can be checked without a network
//    - #[async_trait] is needed because the trait has an async method
//
// 2. Why StatusCode::OK and not is_success()?
//    - Only a plain 200 is saved as a page
//    - 204, 206 and friends are logged like any other non-200 answer
//
// 3. What does .timeout() cover?
//    - The whole exchange: connecting, sending, and reading the body
//    - When it fires, reqwest returns an error with is_timeout() == true,
//      which categorize_error turns into "timed out"
//
// 4. Why map_err(categorize_error)?
//    - reqwest::Error carries a lot of detail we don't need in the run log
//    - The log line only needs a short reason, so we boil it down to a String
// -----------------------------------------------------------------------------
