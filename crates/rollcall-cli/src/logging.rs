use tracing_subscriber::fmt;
use tracing_subscriber::EnvFilter;

use crate::constants::LOG_ENV;

const DEFAULT_FILTER: &str = "warn";

/// Install the stderr tracing subscriber.
///
/// The filter is read from `ROLLCALL_LOG` (e.g. `debug`, `rollcall_core=trace`).
/// Stdout is left alone so JSON output stays machine-readable.
pub fn init_logging(no_color: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .with_ansi(!no_color)
        .try_init();
}
