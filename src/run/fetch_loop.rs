// src/run/fetch_loop.rs
// =============================================================================
// The sequential driver. For each validated URL, strictly in input order:
//
// 1. i += 1
// 2. print "process: {i}/{max} {url}" to stdout and to the run log
// 3. wait the configured delay (also before the very first fetch)
// 4. GET the URL
// 5. 200 -> save the body as {run-id}.{i}.html
//    otherwise -> log "error: {i}/{max} {status}"
// 6. stop here if Ctrl-C was pressed
//
// Only one URL is ever in flight. A Ctrl-C during the delay or the GET
// abandons the current URL: no page file and no error line for it.
// =============================================================================

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::fetch::{FetchOutcome, Fetcher};
use super::logger::RunLog;
use super::writer::write_page;
use super::RunContext;
use crate::error::{FetchError, Result};

// What happened during a run. Used for diagnostics only, never printed as
// a report.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// URLs that got a "process:" line
    pub processed: usize,
    /// Pages written to disk
    pub saved: usize,
    /// Non-200 answers and transport failures
    pub failed: usize,
    /// True if the run stopped early because of Ctrl-C
    pub cancelled: bool,
}

// Runs the whole loop and returns once every URL is done or the token is
// cancelled.
//
// The run log is created first (even for an empty list) and is closed
// before returning, whatever happened in between.
pub async fn run_all<F: Fetcher>(
    ctx: &RunContext,
    urls: &[String],
    fetcher: &F,
    cancel: &CancellationToken,
) -> Result<RunSummary> {
    let mut log = RunLog::create(&ctx.config.output_dir, &ctx.id).await?;
    tracing::debug!(run_id = %ctx.id, log = %log.path().display(), "run started");

    let result = drive(ctx, urls, fetcher, cancel, &mut log).await;
    let closed = log.finish().await;

    let summary = result?;
    closed?;
    Ok(summary)
}

async fn drive<F: Fetcher>(
    ctx: &RunContext,
    urls: &[String],
    fetcher: &F,
    cancel: &CancellationToken,
    log: &mut RunLog,
) -> Result<RunSummary> {
    let max = urls.len();
    let mut summary = RunSummary::default();

    for (i, url) in (1..).zip(urls) {
        if cancel.is_cancelled() {
            summary.cancelled = true;
            break;
        }

        println!("process: {i}/{max} {url}");
        log.progress(i, max, url).await?;
        summary.processed += 1;

        let outcome = match pause(ctx.config.delay, cancel).await {
            Ok(()) => fetcher.fetch(url, cancel).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(FetchOutcome::Page(body)) => {
                write_page(&ctx.config.output_dir, &ctx.id, i, &body).await?;
                summary.saved += 1;
            }
            Ok(FetchOutcome::Status(status)) => {
                log.error(i, max, status).await?;
                summary.failed += 1;
            }
            Err(FetchError::Transport(reason)) => {
                tracing::warn!(%url, %reason, "fetch failed");
                log.error(i, max, reason).await?;
                summary.failed += 1;
            }
            Err(FetchError::Cancelled) => {
                tracing::debug!(%url, "fetch abandoned");
                summary.cancelled = true;
                break;
            }
        }

        if cancel.is_cancelled() {
            summary.cancelled = true;
            break;
        }
    }

    Ok(summary)
}

// Sleeps for `delay` unless the token is cancelled first
async fn pause(delay: Duration, cancel: &CancellationToken) -> std::result::Result<(), FetchError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(FetchError::Cancelled),
        _ = tokio::time::sleep(delay) => Ok(()),
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is tokio::select!?
//    - Waits on several futures at once and runs the branch of the first
//      one that finishes; the others are dropped (cancelled)
//    - Dropping the losing reqwest future aborts the request
//    - `biased;` polls the branches top to bottom instead of randomly, so a
//      cancelled token is always noticed first
//
// 2. What is a CancellationToken?
//    - A cheap, clonable flag from tokio-util
//    - cancel() sets it, is_cancelled() reads it, cancelled() is a future
//      that completes once it is set
//    - main.rs hands one clone to the Ctrl-C task and one to this loop
//
// 3. Why is run_all generic over Fetcher?
//    - The real HttpFetcher talks to the network
//    - Tests pass a stub that answers from a table, so ordering and
//      cancellation can be checked without timing games
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::run::{RunConfig, RunId};
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use std::collections::HashMap;
    use std::path::Path;
    use std::sync::Mutex;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    // Answers from a fixed table and records every URL it was asked for.
    // Optionally cancels the token once it has served `cancel_after` calls.
    struct StubFetcher {
        answers: HashMap<String, std::result::Result<FetchOutcome, FetchError>>,
        calls: Mutex<Vec<String>>,
        cancel: CancellationToken,
        cancel_after: Option<usize>,
    }

    impl StubFetcher {
        fn new(cancel: &CancellationToken) -> Self {
            Self {
                answers: HashMap::new(),
                calls: Mutex::new(Vec::new()),
                cancel: cancel.clone(),
                cancel_after: None,
            }
        }

        fn answer(
            mut self,
            url: &str,
            outcome: std::result::Result<FetchOutcome, FetchError>,
        ) -> Self {
            self.answers.insert(url.to_string(), outcome);
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Fetcher for StubFetcher {
        async fn fetch(
            &self,
            url: &str,
            _cancel: &CancellationToken,
        ) -> std::result::Result<FetchOutcome, FetchError> {
            let count = {
                let mut calls = self.calls.lock().unwrap();
                calls.push(url.to_string());
                calls.len()
            };
            if self.cancel_after == Some(count) {
                self.cancel.cancel();
            }
            self.answers
                .get(url)
                .cloned()
                .unwrap_or(Ok(FetchOutcome::Status(StatusCode::NOT_FOUND)))
        }
    }

    fn context(dir: &Path) -> RunContext {
        RunContext {
            id: RunId::new(),
            config: RunConfig {
                output_dir: dir.to_path_buf(),
                delay: Duration::ZERO,
            },
        }
    }

    fn read_log(ctx: &RunContext) -> Vec<String> {
        let path = ctx.config.output_dir.join(format!("{}.log", ctx.id));
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    fn html_files(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(".html"))
            .collect();
        names.sort();
        names
    }

    fn urls(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_pages_and_errors() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        let cancel = CancellationToken::new();
        let fetcher = StubFetcher::new(&cancel)
            .answer("http://a.com", Ok(FetchOutcome::Page("A".to_string())))
            .answer("http://b.com", Ok(FetchOutcome::Status(StatusCode::INTERNAL_SERVER_ERROR)))
            .answer("http://c.com", Ok(FetchOutcome::Page("C".to_string())));

        let list = urls(&["http://a.com", "http://b.com", "http://c.com"]);
        let summary = run_all(&ctx, &list, &fetcher, &cancel).await.unwrap();

        assert_eq!(
            summary,
            RunSummary {
                processed: 3,
                saved: 2,
                failed: 1,
                cancelled: false
            }
        );
        assert_eq!(fetcher.calls(), list);
        assert_eq!(
            read_log(&ctx),
            vec![
                format!("Start work: {}", ctx.id),
                "process: 1/3 http://a.com".to_string(),
                "process: 2/3 http://b.com".to_string(),
                "error: 2/3 500 Internal Server Error".to_string(),
                "process: 3/3 http://c.com".to_string(),
            ]
        );

        // index 2 failed, so there is a gap
        assert_eq!(
            html_files(dir.path()),
            vec![format!("{}.1.html", ctx.id), format!("{}.3.html", ctx.id)]
        );
        let third = dir.path().join(format!("{}.3.html", ctx.id));
        assert_eq!(std::fs::read_to_string(third).unwrap(), "C");
    }

    #[tokio::test]
    async fn test_transport_failure_is_logged_and_loop_continues() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        let cancel = CancellationToken::new();
        let fetcher = StubFetcher::new(&cancel)
            .answer("http://down.com", Err(FetchError::Transport("connection failed".to_string())))
            .answer("http://up.com", Ok(FetchOutcome::Page("up".to_string())));

        let list = urls(&["http://down.com", "http://up.com"]);
        let summary = run_all(&ctx, &list, &fetcher, &cancel).await.unwrap();

        assert_eq!(summary.saved, 1);
        assert_eq!(summary.failed, 1);
        assert!(read_log(&ctx).contains(&"error: 1/2 connection failed".to_string()));
        assert_eq!(html_files(dir.path()), vec![format!("{}.2.html", ctx.id)]);
    }

    #[tokio::test]
    async fn test_stops_after_iteration_when_cancelled() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        let cancel = CancellationToken::new();
        let mut fetcher = StubFetcher::new(&cancel)
            .answer("http://a.com", Ok(FetchOutcome::Page("A".to_string())))
            .answer("http://b.com", Ok(FetchOutcome::Page("B".to_string())));
        fetcher.cancel_after = Some(1);

        let list = urls(&["http://a.com", "http://b.com"]);
        let summary = run_all(&ctx, &list, &fetcher, &cancel).await.unwrap();

        assert!(summary.cancelled);
        assert_eq!(summary.processed, 1);
        assert_eq!(fetcher.calls(), urls(&["http://a.com"]));
        // the iteration in progress still completes
        assert_eq!(html_files(dir.path()), vec![format!("{}.1.html", ctx.id)]);
        assert_eq!(
            read_log(&ctx),
            vec![
                format!("Start work: {}", ctx.id),
                "process: 1/2 http://a.com".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_cancelled_before_start_fetches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        let cancel = CancellationToken::new();
        cancel.cancel();
        let fetcher = StubFetcher::new(&cancel);

        let summary = run_all(&ctx, &urls(&["http://a.com"]), &fetcher, &cancel)
            .await
            .unwrap();

        assert!(summary.cancelled);
        assert!(fetcher.calls().is_empty());
        assert_eq!(read_log(&ctx), vec![format!("Start work: {}", ctx.id)]);
    }

    #[tokio::test]
    async fn test_cancel_during_delay_skips_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(dir.path());
        ctx.config.delay = Duration::from_secs(60);
        let cancel = CancellationToken::new();
        let fetcher = StubFetcher::new(&cancel);

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let summary = run_all(&ctx, &urls(&["http://a.com"]), &fetcher, &cancel)
            .await
            .unwrap();

        assert!(summary.cancelled);
        assert!(fetcher.calls().is_empty());
        // progress line was written before the delay, nothing after it
        assert_eq!(
            read_log(&ctx),
            vec![
                format!("Start work: {}", ctx.id),
                "process: 1/1 http://a.com".to_string(),
            ]
        );
        assert!(html_files(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_empty_list_writes_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        let cancel = CancellationToken::new();
        let fetcher = StubFetcher::new(&cancel);

        let summary = run_all(&ctx, &[], &fetcher, &cancel).await.unwrap();

        assert_eq!(summary, RunSummary::default());
        assert_eq!(read_log(&ctx), vec![format!("Start work: {}", ctx.id)]);
    }

    #[tokio::test]
    async fn test_validated_file_list_fetched_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        let cancel = CancellationToken::new();
        let fetcher = StubFetcher::new(&cancel);

        let raw = urls(&["http://example.com", "bad-url", "https://example.org"]);
        let list = crate::source::validate(raw);
        run_all(&ctx, &list, &fetcher, &cancel).await.unwrap();

        assert_eq!(
            fetcher.calls(),
            urls(&["http://example.com", "https://example.org"])
        );
        let log = read_log(&ctx);
        assert_eq!(log[1], "process: 1/2 http://example.com");
        assert_eq!(log[3], "process: 2/2 https://example.org");
    }

    #[tokio::test]
    async fn test_end_to_end_with_http_server() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ok"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<p>hello</p>"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        let fetcher = crate::run::HttpFetcher::new().unwrap();
        let list = vec![format!("{}/gone", server.uri()), format!("{}/ok", server.uri())];

        let summary = run_all(&ctx, &list, &fetcher, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(summary.saved, 1);
        assert_eq!(summary.failed, 1);
        assert!(read_log(&ctx).contains(&"error: 1/2 404 Not Found".to_string()));
        let page = dir.path().join(format!("{}.2.html", ctx.id));
        assert_eq!(std::fs::read_to_string(page).unwrap(), "<p>hello</p>");
    }
}
