//! Logging macros used throughout the crate.
//!
//! Everything is routed through the [`log`] facade, so whichever logger the
//! binary installs (`env_logger` for the node) receives the records.

#![allow(unused_macros)]

macro_rules! trace {
    ($($arg:tt)*) => { ::log::trace!($($arg)*) };
}

macro_rules! debug {
    ($($arg:tt)*) => { ::log::debug!($($arg)*) };
}

macro_rules! info {
    ($($arg:tt)*) => { ::log::info!($($arg)*) };
}

macro_rules! warn {
    ($($arg:tt)*) => { ::log::warn!($($arg)*) };
}

macro_rules! error {
    ($($arg:tt)*) => { ::log::error!($($arg)*) };
}

/// Logger which records into a per-thread buffer, so unit tests can assert
/// on exactly what a piece of code logged.
#[cfg(test)]
pub(crate) mod capture {
    use std::cell::RefCell;
    use std::sync::Once;

    thread_local! {
        static RECORDS: RefCell<Vec<(log::Level, String)>> = const { RefCell::new(Vec::new()) };
    }

    struct CaptureLogger;

    impl log::Log for CaptureLogger {
        fn enabled(&self, _metadata: &log::Metadata) -> bool {
            true
        }

        fn log(&self, record: &log::Record) {
            let entry = (record.level(), record.args().to_string());
            RECORDS.with(|records| records.borrow_mut().push(entry));
        }

        fn flush(&self) {}
    }

    static LOGGER: CaptureLogger = CaptureLogger;
    static INIT: Once = Once::new();

    /// Install the capture logger (once per process) and clear this thread's buffer.
    pub fn start() {
        INIT.call_once(|| {
            if log::set_logger(&LOGGER).is_ok() {
                log::set_max_level(log::LevelFilter::Trace);
            }
        });
        RECORDS.with(|records| records.borrow_mut().clear());
    }

    /// Drain everything logged on this thread since the last [`start`] or [`take`].
    pub fn take() -> Vec<(log::Level, String)> {
        RECORDS.with(|records| records.borrow_mut().drain(..).collect())
    }
}
