// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Pick the URL source (--url or --input-file) and load it
// 3. Drop every URL that is not absolute http/https
// 4. Hand the rest to the fetch loop, with a Ctrl-C listener that cancels it
// 5. Exit with 0 (also for "no work" and Ctrl-C), or 1 if something escaped
// =============================================================================

mod cli; // src/cli.rs - command-line parsing
mod error; // src/error.rs - typed errors
mod logging; // src/logging.rs - diagnostics on stderr
mod run; // src/run/ - the fetch loop and its files
mod source; // src/source/ - loading and validating URLs

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use run::{HttpFetcher, RunContext};
use source::UrlSource;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() {
    logging::init_logging();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    run_with(Cli::parse()).await
}

// Everything after argument parsing. Returns the exit code.
async fn run_with(cli: Cli) -> Result<i32> {
    let config = cli.run_config();

    let Some(source) = UrlSource::from_args(cli.urls, cli.input_file) else {
        println!("No work, either url or file was provided.");
        return Ok(0);
    };

    // A missing input file stops us here, before any log file exists
    let urls = source::validate(source.load().await?);

    let ctx = RunContext::new(config);
    let fetcher = HttpFetcher::new()?;

    let cancel = CancellationToken::new();
    let interrupt = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("interrupt received, stopping");
                cancel.cancel();
            }
        }
    });

    let result = run::run_all(&ctx, &urls, &fetcher, &cancel).await;
    interrupt.abort();

    let summary = result.with_context(|| {
        format!(
            "run {} failed in {}",
            ctx.id,
            ctx.config.output_dir.display()
        )
    })?;

    tracing::info!(
        run_id = %ctx.id,
        processed = summary.processed,
        saved = summary.saved,
        failed = summary.failed,
        cancelled = summary.cancelled,
        "run finished"
    );

    Ok(0)
}
