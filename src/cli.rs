//! Command-line interface.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

/// Log levels usable as clap values.
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    /// Errors only.
    Error,
    /// Errors and warnings.
    Warn,
    /// Normal operational chatter (the default).
    Info,
    /// Per-stage diagnostics.
    Debug,
    /// Everything.
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Command line arguments structure using clap derive macros.
///
/// The scene description is read from standard input; the rendered image
/// goes to standard output unless `--output` names a file.
#[derive(Parser)]
#[command(name = "lucent")]
#[command(about = "A Whitted-style ray tracer: scene text in, PPM out")]
pub struct Args {
    /// Image width in pixels
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    pub width: u32,

    /// Image height in pixels
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    pub height: u32,

    /// Cast shadow rays while shading
    #[arg(short, long)]
    pub shadows: bool,

    /// Output file path (.png for an 8-bit PNG, anything else for plain
    /// PPM); PPM goes to stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Set the logging level
    #[arg(long, default_value = "info")]
    pub debug_level: LogLevel,
}
