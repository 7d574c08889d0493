//! Diagnostic logging for the CLI.
//!
//! Command output goes to the `out` writer handed to [`crate::run`]; tracing
//! events go to stderr and are silent below `warn` unless `DIEMSO_LOG` asks
//! for more (e.g. `DIEMSO_LOG=diemso_engine=debug`).

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "DIEMSO_LOG";

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Installs the global subscriber. Later calls in the same process are no-ops.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_twice_does_not_panic() {
        init_logging();
        init_logging();
    }
}
