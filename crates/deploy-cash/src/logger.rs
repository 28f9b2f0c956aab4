//! Terminal and file logging using simplelog
//!
//! Log lines go to stderr, so stdout only carries command output. Commands
//! that talk to GitHub also log to a timestamped file in the cache directory
//! (~/.cache/deploy-cash/ on Linux); offline commands leave no file behind.

use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, LevelFilter, SharedLogger, TermLogger,
    TerminalMode, WriteLogger,
};
use std::fs::File;
use std::path::PathBuf;

/// Get the log file path in the cache directory
fn log_file_path() -> Option<PathBuf> {
    let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    deploy_cash_config::cache_dir()
        .ok()
        .map(|dir| dir.join(format!("deploy-cash-{}.log", timestamp)))
}

/// Level from `RUST_LOG`, `Info` when unset or unknown
fn level_from_env(value: Option<&str>) -> LevelFilter {
    match value.map(str::to_lowercase).as_deref() {
        Some("off") => LevelFilter::Off,
        Some("error") => LevelFilter::Error,
        Some("warn") => LevelFilter::Warn,
        Some("debug") => LevelFilter::Debug,
        Some("trace") => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

/// Terminal logger, plus a file logger when a file is given
fn build_loggers(
    level: LevelFilter,
    config: Config,
    file: Option<File>,
) -> Vec<Box<dyn SharedLogger>> {
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        config.clone(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];
    if let Some(file) = file {
        loggers.push(WriteLogger::new(level, config, file));
    }
    loggers
}

/// Initialize logging
///
/// With `to_file` set, also logs to a new file in the cache directory.
/// Returns the path of that file, or `None` when logging to the terminal
/// only.
pub fn init(to_file: bool) -> Option<PathBuf> {
    let level = level_from_env(std::env::var("RUST_LOG").ok().as_deref());

    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_time_offset_to_local()
        .unwrap_or_else(|c| c) // Fallback if local time offset fails
        .build();

    let log_file = to_file
        .then(log_file_path)
        .flatten()
        .and_then(|path| match File::create(&path) {
            Ok(file) => Some((path, file)),
            Err(e) => {
                eprintln!("Could not create log file {}: {}", path.display(), e);
                None
            }
        });
    let (path, file) = log_file.unzip();

    if let Err(e) = CombinedLogger::init(build_loggers(level, config, file)) {
        eprintln!("Failed to initialize logger: {}", e);
    }

    path
}
