//! Logger installation for the loaded library
//!
//! On Android `log` records go to logcat through liblog, tagged with the record target. Any
//! other host (a desktop JVM running tests) gets a `tracing-subscriber` fmt layer filtered by
//! `RUST_LOG`.

#![cfg_attr(not(target_os = "android"), allow(dead_code))]

use std::ffi::CString;
use std::sync::Once;

/// Install the platform logger. Safe to call more than once.
pub(crate) fn init() {
    static INIT: Once = Once::new();
    INIT.call_once(install);
}

#[cfg(target_os = "android")]
fn install() {
    android::install();
}

#[cfg(not(target_os = "android"))]
fn install() {
    use tracing_subscriber::{layer::SubscriberExt, EnvFilter};

    // Either may already be set by the embedding process; keep theirs
    let _ = tracing_log::LogTracer::init();
    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .with(EnvFilter::from_default_env());
    let _ = tracing::subscriber::set_global_default(subscriber);
}

// android/log.h
const ANDROID_LOG_VERBOSE: i32 = 2;
const ANDROID_LOG_DEBUG: i32 = 3;
const ANDROID_LOG_INFO: i32 = 4;
const ANDROID_LOG_WARN: i32 = 5;
const ANDROID_LOG_ERROR: i32 = 6;

fn priority(level: log::Level) -> i32 {
    match level {
        log::Level::Error => ANDROID_LOG_ERROR,
        log::Level::Warn => ANDROID_LOG_WARN,
        log::Level::Info => ANDROID_LOG_INFO,
        log::Level::Debug => ANDROID_LOG_DEBUG,
        log::Level::Trace => ANDROID_LOG_VERBOSE,
    }
}

/// liblog takes C strings, so interior NULs would silently cut the message short.
fn c_string(s: &str) -> CString {
    CString::new(s.replace('\0', "\\0")).unwrap_or_default()
}

#[cfg(target_os = "android")]
mod android {
    use std::ffi::{c_char, c_int};

    use super::{c_string, priority};

    #[link(name = "log")]
    extern "C" {
        fn __android_log_write(prio: c_int, tag: *const c_char, text: *const c_char) -> c_int;
    }

    struct AndroidLogger;

    static LOGGER: AndroidLogger = AndroidLogger;

    impl log::Log for AndroidLogger {
        fn enabled(&self, metadata: &log::Metadata) -> bool {
            metadata.level() <= log::max_level()
        }

        fn log(&self, record: &log::Record) {
            if !self.enabled(record.metadata()) {
                return;
            }

            let tag = c_string(record.target());
            let text = c_string(&record.args().to_string());

            // Safety: both pointers are NUL-terminated and outlive the call
            unsafe { __android_log_write(priority(record.level()), tag.as_ptr(), text.as_ptr()) };
        }

        fn flush(&self) {}
    }

    pub(super) fn install() {
        if log::set_logger(&LOGGER).is_ok() {
            let level = if cfg!(debug_assertions) {
                log::LevelFilter::Debug
            } else {
                log::LevelFilter::Info
            };
            log::set_max_level(level);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_map_to_logcat_priorities() {
        assert_eq!(priority(log::Level::Warn), ANDROID_LOG_WARN);
        assert_eq!(priority(log::Level::Error), ANDROID_LOG_ERROR);
        assert_eq!(priority(log::Level::Trace), ANDROID_LOG_VERBOSE);
    }

    #[test]
    fn interior_nul_does_not_truncate() {
        let s = c_string("WebPDecode\0: not enough data");
        assert_eq!(s.to_str().unwrap(), "WebPDecode\\0: not enough data");
    }

    #[test]
    fn init_twice_is_harmless() {
        init();
        init();
        log::warn!(target: crate::LOG_TAG, "logger installed");
    }
}
