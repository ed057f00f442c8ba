//! Logging for the goast command line
//!
//! Compact `LEVEL message key=value` lines on stderr, without timestamps or
//! module paths. `$GOAST_LOG` takes an `EnvFilter` directive and wins over `-v`.

use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer, Registry};

pub const LOG_ENV: &str = "GOAST_LOG";

/// `-v` count to level: warn, info, debug, then trace
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// An unparsable directive falls back to the verbosity level
pub fn filter_for(verbosity: u8, directive: Option<&str>) -> EnvFilter {
    directive
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(|| EnvFilter::default().add_directive(level_for(verbosity).into()))
}

pub fn init(verbosity: u8) {
    let directive = std::env::var(LOG_ENV).ok();
    let filter = filter_for(verbosity, directive.as_deref());

    let layer = tracing_subscriber::fmt::layer()
        .without_time()
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .compact()
        .with_filter(filter);

    // A second init (tests) keeps the first subscriber
    let _ = Registry::default().with(layer).try_init();
}
