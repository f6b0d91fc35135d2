//! Console logging using env_logger
//!
//! Defaults to `info` so a CI run shows progress without any setup;
//! `RUST_LOG` overrides the level as usual.

use env_logger::{Builder, Env};

/// Initialize logging to stderr
pub fn init() {
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_target(false)
        .init();
}
