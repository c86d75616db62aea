//! Tracing subscriber setup
//!
//! `KEEL_LOG` takes precedence over `RUST_LOG`; `default_level` applies when
//! neither is set.

use tracing_subscriber::EnvFilter;

/// Install a formatting subscriber for the process.
///
/// Returns `false` when a global subscriber was already installed, in which
/// case the existing one is left in place.
pub fn init_tracing(default_level: &str) -> bool {
    let filter = std::env::var("KEEL_LOG")
        .ok()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
