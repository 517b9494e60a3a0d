//! Tracing setup for the binary.
//!
//! `RUST_LOG` wins when set; otherwise the launcher logs at `info`, or `debug`
//! with `--verbose`. Output goes to stderr so it never mixes with `plan` JSON.

use tracing_subscriber::{EnvFilter, prelude::*};

pub fn init_tracing(verbose: bool) {
    let level = if verbose {
        "vertex_launcher=debug"
    } else {
        "vertex_launcher=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}
