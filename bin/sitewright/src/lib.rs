//! Sitewright CLI Library
//!
//! Command implementations for the `sitewright` binary. The binary entry
//! point lives in `main.rs`; this crate exposes the commands for
//! documentation and integration purposes.
//!
//! # Modules
//!
//! - [`cmd`] - Command implementations (build, check)

pub mod cmd;

// Re-export core types for convenience
pub use sitewright_compose::{Composer, Site};
pub use sitewright_core::Config;

/// Initialize tracing with the specified verbosity level.
///
/// # Arguments
///
/// * `verbose` - Verbosity level (0 = WARN, 1 = INFO, 2 = DEBUG, 3+ = TRACE)
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}
