// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// There are no subcommands: one invocation = one run over a list of URLs.
// The URLs come either from repeated --url flags or from a file given with
// --input-file. If both are given, --url wins and the file is never opened.
// =============================================================================

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::run::RunConfig;

#[derive(Parser, Debug)]
#[command(
    name = "scrape-wget",
    version = "0.1.0",
    about = "A simple scraper",
    long_about = "scrape-wget downloads a list of web pages one after the other. \
                  Each page answered with 200 OK is saved as {run-id}.{n}.html, \
                  and progress and errors are written to {run-id}.log."
)]
pub struct Cli {
    /// The Url to query (can be repeated)
    ///
    /// Example: -u https://example.com -u https://example.org
    #[arg(short = 'u', long = "url", value_name = "URL")]
    pub urls: Vec<String>,

    /// The path to a file with Urls, one per line
    ///
    /// Ignored when at least one --url is given.
    #[arg(short = 'i', long = "input-file", value_name = "PATH")]
    pub input_file: Option<PathBuf>,

    /// The delay before each query, in milliseconds
    #[arg(short = 'w', long = "wait", value_name = "TIME", default_value_t = 0)]
    pub wait: u64,

    /// The output directory for the log and the downloaded pages
    #[arg(short = 'o', long = "output", value_name = "PATH", default_value = ".")]
    pub output: PathBuf,
}

impl Cli {
    // Everything the fetch loop needs from the command line, besides the URLs.
    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            output_dir: self.output.clone(),
            delay: Duration::from_millis(self.wait),
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. How does a Vec<String> field become a repeatable flag?
//    - clap sees the Vec and accepts the flag any number of times
//    - `-u a -u b` gives vec!["a", "b"], in the order they were typed
//    - Leaving the flag out gives an empty Vec, not an error
//
// 2. Option<PathBuf> vs PathBuf with default_value
//    - --input-file is optional and has no sensible default, so it is Option
//    - --output always has a value ("." unless given), so it is a plain PathBuf
//
// 3. Why is --wait a u64 and not a Duration?
//    - clap parses numbers out of the box; the unit (milliseconds) lives in
//      the help text
//    - run_config() turns it into a Duration in one place
//
// 4. What does parse_from do in the tests?
//    - Same as parse(), but with a fixed argument list instead of the real
//      command line. The first item is the program name.
// -----------------------------------------------------------------------------
