//! Shared helpers for unit tests.

use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::EnvFilter;

/// Installs a test-writer subscriber once per test binary.
///
/// Honors `RUST_LOG`; defaults to warnings plus `offcut=debug`.
pub fn init_tracing() {
    let mut env_filter = EnvFilter::from_default_env().add_directive(LevelFilter::WARN.into());
    if let Ok(directive) = "offcut=debug".parse::<Directive>() {
        env_filter = env_filter.add_directive(directive);
    }
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_test_writer()
        .try_init();
}
