//! Diagnostic logging on stderr.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable overriding the log filter.
pub const LOG_ENV: &str = "PREHOOK_LOG";

/// Install the stderr subscriber.
///
/// The filter comes from `PREHOOK_LOG` when set and valid, otherwise
/// `prehook=warn` (`prehook=debug` when `verbose`). Calling this twice is
/// harmless; the second subscriber is dropped.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .compact()
        .with_ansi(crate::hook::report::stderr_supports_color());

    let _ = tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .try_init();
}

/// Warnings only, or everything down to `debug` when `verbose`.
fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "prehook=debug"
    } else {
        "prehook=warn"
    }
}
