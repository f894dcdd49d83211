// logscrub/src/logger.rs
//! Process-wide logger setup shared by every logscrub binary.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Initializes `env_logger` once for the process.
///
/// With `Some(level)` the given level applies to every target and `RUST_LOG` is ignored.
/// With `None` the filter comes from `RUST_LOG`, defaulting to `info`. Later calls are
/// no-ops.
pub fn init_logger(level: Option<LevelFilter>) {
    let mut builder = match level {
        Some(level) => {
            let mut builder = Builder::new();
            builder.filter_level(level);
            builder
        }
        None => Builder::from_env(Env::default().default_filter_or("info")),
    };
    builder.format_timestamp_millis().try_init().ok();
}
