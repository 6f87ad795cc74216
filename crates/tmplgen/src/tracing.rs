//! Logging utilities with segment prefixes.
//!
//! protoc reads the plugin response from stdout, so every subscriber set up
//! here writes to stderr.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize tracing with a custom default filter.
///
/// `RUST_LOG` takes precedence over `default_filter` when set.
pub fn init_with_filter(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

/// Segment prefixes for logging.
pub mod prefix {
    /// Extension registry and option lookups
    pub const OPTIONS: &str = "⊕";
    /// Parameter parsing
    pub const PARAMS: &str = "⚙";
    /// Template rendering
    pub const RENDER: &str = "✎";
    /// Output emission
    pub const EMIT: &str = "⇥";
}
