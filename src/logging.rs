//! Logging setup using tracing
//!
//! Logs go to stderr so command output on stdout stays pipeable. The level
//! comes from `-v`/`-q` flags unless `LQC_LOG` holds a filter directive.
//!
//! ```no_run
//! lqc::logging::init_logging(1, false);
//! tracing::info!(count = 3, "Records created");
//! ```

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Environment variable holding an explicit filter (e.g. `lqc=debug`)
pub const LOG_ENV: &str = "LQC_LOG";

/// Map verbosity flags to a level
///
/// Default is `warn`; each `-v` steps up once; `--quiet` only shows errors.
pub fn level_for(verbosity: u8, quiet: bool) -> Level {
    if quiet {
        return Level::ERROR;
    }
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Install the global subscriber
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging(verbosity: u8, quiet: bool) {
    let level = level_for(verbosity, quiet);
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(format!("lqc={}", level.as_str().to_lowercase())));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_flags() {
        assert_eq!(level_for(0, false), Level::WARN);
        assert_eq!(level_for(1, false), Level::INFO);
        assert_eq!(level_for(2, false), Level::DEBUG);
        assert_eq!(level_for(7, false), Level::TRACE);
        assert_eq!(level_for(3, true), Level::ERROR);
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init_logging(0, false);
        init_logging(2, false);
    }
}
