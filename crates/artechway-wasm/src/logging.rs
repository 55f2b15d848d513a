//! Browser console backend for the `log` facade.
//!
//! The core crate logs through `log`; this module routes those records to
//! `console.error` / `console.warn` / `console.info` / `console.debug` so they
//! show up with the right severity in devtools.

use log::{Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::prelude::*;

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            Level::Error => web_sys::console::error_1(&line),
            Level::Warn => web_sys::console::warn_1(&line),
            Level::Info => web_sys::console::info_1(&line),
            Level::Debug | Level::Trace => web_sys::console::debug_1(&line),
        }
    }

    fn flush(&self) {}
}

/// Default verbosity: debug builds log everything down to `debug`.
pub(crate) fn default_level() -> LevelFilter {
    if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Install the console logger. Later calls only adjust the level.
pub(crate) fn init_logger(level: LevelFilter) {
    if log::set_logger(&LOGGER).is_err() {
        log::debug!("console logger already installed");
    }
    log::set_max_level(level);
}

/// Change log verbosity at runtime.
///
/// Accepts `off`, `error`, `warn`, `info`, `debug` or `trace`
/// (case-insensitive). Returns `false` and leaves the level unchanged for
/// anything else.
#[wasm_bindgen]
pub fn set_log_level(level: &str) -> bool {
    match level.parse::<LevelFilter>() {
        Ok(filter) => {
            log::set_max_level(filter);
            true
        }
        Err(_) => false,
    }
}

/// Log an error surfaced at the JS boundary and turn it into a JS value.
pub(crate) fn js_error(context: &str, err: impl std::fmt::Display) -> JsValue {
    log::error!("{context}: {err}");
    JsValue::from_str(&err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_log_level() {
        assert!(set_log_level("warn"));
        assert_eq!(log::max_level(), LevelFilter::Warn);

        assert!(set_log_level("DEBUG"));
        assert_eq!(log::max_level(), LevelFilter::Debug);

        assert!(!set_log_level("loud"));
        assert_eq!(log::max_level(), LevelFilter::Debug);
    }

    #[test]
    fn test_default_level_is_at_least_info() {
        assert!(default_level() >= LevelFilter::Info);
    }
}
