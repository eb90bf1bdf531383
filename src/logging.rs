// src/logging.rs
// =============================================================================
// Diagnostics setup.
//
// This is NOT the run log ({run-id}.log). The run log is an output of the
// tool and is written by run::logger. This module only wires `tracing` to
// stderr so that RUST_LOG=debug shows what the program is doing.
// =============================================================================

use tracing_subscriber::EnvFilter;

// Initializes a stderr subscriber. Quiet by default (warnings only), so the
// progress lines on stdout stay the only normal output.
pub fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}
