//! Logging setup for the CLI using `tracing-subscriber`.
//!
//! Logs go to stderr so the chart specification on stdout stays clean.
//! `RUST_LOG` takes precedence over the `-v` count.

use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Map a `-v` count to a level: 0 = warn, 1 = info, 2 = debug, 3+ = trace.
pub fn level_from_verbosity(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

pub fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_from_verbosity(verbosity).as_str().to_lowercase()));

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();

    // A subscriber may already be installed (e.g. in tests)
    let _ = tracing_subscriber::registry().with(filter).with(layer).try_init();
}
