//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

/// Initialize logging at `level` unless `RUST_LOG` says otherwise
pub fn init_with_level(level: log::LevelFilter) {
    let env = env_logger::Env::default().default_filter_or(level.to_string());
    env_logger::Builder::from_env(env).init();
}
