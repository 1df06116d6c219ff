//! `log` backend writing to the browser console through `console_log`.
//!
//! Events are single-line `event=... module=...` records so they can be
//! filtered in devtools. Off the browser (native tests) records go to stderr.

use std::sync::OnceLock;

use log::{LevelFilter, Log, Metadata, Record};

use crate::error::RevealError;

static LOGGER: ConsoleLogger = ConsoleLogger;
static INSTALLED: OnceLock<()> = OnceLock::new();

pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) { "debug" } else { "info" }
}

/// Parses `off|error|warn|info|debug|trace` (case-insensitive).
pub fn parse_level(level: &str) -> Result<LevelFilter, RevealError> {
    match level.trim().to_ascii_lowercase().as_str() {
        "off" => Ok(LevelFilter::Off),
        "error" => Ok(LevelFilter::Error),
        "warn" => Ok(LevelFilter::Warn),
        "info" => Ok(LevelFilter::Info),
        "debug" => Ok(LevelFilter::Debug),
        "trace" => Ok(LevelFilter::Trace),
        other => Err(RevealError::InvalidConfig(format!(
            "unsupported log level `{other}`"
        ))),
    }
}

pub struct ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        emit(record);
    }

    fn flush(&self) {}
}

#[cfg(target_arch = "wasm32")]
fn emit(record: &Record<'_>) {
    // One console method per level.
    console_log::log(record);
}

#[cfg(not(target_arch = "wasm32"))]
fn emit(record: &Record<'_>) {
    eprintln!("[{}] {}", record.level(), record.args());
}

/// Installs the console logger once and applies `level`. Later calls only
/// adjust the level.
pub fn init(level: &str) -> Result<(), RevealError> {
    let filter = parse_level(level)?;
    if INSTALLED.get().is_none() {
        // Another logger may already be installed by the host; keep it.
        if log::set_logger(&LOGGER).is_ok() {
            let _ = INSTALLED.set(());
        }
    }
    log::set_max_level(filter);
    log::debug!("event=logging_ready module=logging level={filter}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("INFO").unwrap(), LevelFilter::Info);
        assert_eq!(parse_level(" warn ").unwrap(), LevelFilter::Warn);
        assert!(matches!(
            parse_level("verbose"),
            Err(RevealError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_init_is_idempotent() {
        init("info").unwrap();
        init("info").unwrap();
        init("debug").unwrap();
        assert_eq!(log::max_level(), LevelFilter::Debug);
        assert!(init("nope").is_err());
    }
}
