//! Logging setup.

use log::LevelFilter;

/// Initialize the logger with the specified level.
///
/// Diagnostics go to stderr, so they never mix with a PPM stream being
/// written to stdout.
pub fn init_logger(level: LevelFilter) {
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .init();
}
