//! Logging setup for the binary
//!
//! The library only emits `tracing` events. The binary installs a single `fmt`
//! subscriber writing to stderr, so stdout stays clean for JSON output.
//!
//! The level comes from `HOUSEFIT_LOG` when set (any `EnvFilter` directive,
//! e.g. `housefit=debug`), otherwise from the number of `-v` flags.

use tracing_subscriber::EnvFilter;

/// Environment variable holding an explicit filter directive
pub const LOG_ENV: &str = "HOUSEFIT_LOG";

/// Default filter directive for a `-v` count.
pub fn level_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber. Calling it twice is a no-op.
pub fn init_logging(verbose: u8) {
    let filter = std::env::var(LOG_ENV)
        .ok()
        .filter(|v| !v.is_empty())
        .and_then(|v| EnvFilter::try_new(v).ok())
        .unwrap_or_else(|| EnvFilter::new(level_for_verbosity(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_verbosity() {
        assert_eq!(level_for_verbosity(0), "warn");
        assert_eq!(level_for_verbosity(2), "debug");
        assert_eq!(level_for_verbosity(9), "trace");
    }
}
