#![deny(missing_docs)]
//! Logging front end for tubeqa.
//!
//! Every crate logs through the `tubeqa_*` macros. They forward to the `log`
//! facade re-exported below, so a crate that only logs needs no `log`
//! dependency of its own. Installing a real logger is the binary's job.

#[doc(hidden)]
pub use log;

/// `log::trace!` under the tubeqa name.
#[macro_export]
macro_rules! tubeqa_trace {
    ($($arg:tt)*) => {{
        $crate::log::trace!($($arg)*);
    }};
}

/// `log::info!` under the tubeqa name. Request lifecycle goes here.
#[macro_export]
macro_rules! tubeqa_info {
    ($($arg:tt)*) => {{
        $crate::log::info!($($arg)*);
    }};
}

/// `log::debug!` under the tubeqa name. User text such as questions and URLs
/// is only ever logged at this level.
#[macro_export]
macro_rules! tubeqa_debug {
    ($($arg:tt)*) => {{
        $crate::log::debug!($($arg)*);
    }};
}

/// `log::warn!` under the tubeqa name. Failed backend calls and ignored
/// completions.
#[macro_export]
macro_rules! tubeqa_warn {
    ($($arg:tt)*) => {{
        $crate::log::warn!($($arg)*);
    }};
}

/// `log::error!` under the tubeqa name.
#[macro_export]
macro_rules! tubeqa_error {
    ($($arg:tt)*) => {{
        $crate::log::error!($($arg)*);
    }};
}

/// Routes log output to the terminal while tests run. Calling it again, or
/// after some other logger was installed, does nothing.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // A second init returns SetLoggerError; the first logger stays.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
