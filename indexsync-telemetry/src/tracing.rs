use std::error::Error;
use std::io;
use std::sync::Once;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Default directive applied when `RUST_LOG` is unset.
const DEFAULT_LOG_DIRECTIVES: &str = "info";

/// Initializes tracing for a binary with a non-blocking stdout writer.
///
/// The filter is taken from `RUST_LOG` when set and falls back to `info`.
/// The returned [`WorkerGuard`] must be held for the lifetime of the process;
/// dropping it flushes any buffered log lines.
pub fn init_tracing() -> Result<WorkerGuard, Box<dyn Error + Send + Sync + 'static>> {
    let (writer, guard) = tracing_appender::non_blocking(io::stdout());

    tracing_subscriber::fmt()
        .with_env_filter(default_env_filter())
        .with_writer(writer)
        .with_target(false)
        .try_init()?;

    Ok(guard)
}

/// Initializes tracing for tests.
///
/// Safe to call from every test; only the first call installs the
/// subscriber. Output is routed through the test writer so it is captured
/// per test.
pub fn init_test_tracing() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(default_env_filter())
            .with_test_writer()
            .init();
    });
}

fn default_env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVES))
}
