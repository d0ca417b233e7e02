//! seogen CLI Library
//!
//! Command implementations for the seogen binary, exposed as a library so
//! they can be driven from tests and other tools.
//!
//! # Modules
//!
//! - [`cmd`] - Command implementations (generate, watch, redirect)
//! - [`watcher`] - Debounced regeneration state machine and change filtering
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use seogen::cmd;
//!
//! // Regenerate sitemap.xml and robots.txt once
//! cmd::generate::run(Path::new("seogen.toml")).unwrap();
//! ```

pub mod cmd;
pub mod watcher;

// Re-export core types for convenience
pub use seogen_core::{Config, Entry};
pub use seogen_generator::{GenerationStats, Generator};

/// Initialize tracing with the specified verbosity level.
///
/// Logs go to stderr so progress output on stdout stays readable.
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
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}
