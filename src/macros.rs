//! Logging macros for ergonomic log message formatting.
//!
//! These macros provide a convenient interface for logging with automatic
//! string formatting, similar to `println!` and `format!`. The call site is
//! the macro invocation, so `add_source` points at your code.
//!
//! # Examples
//!
//! ```
//! use gcp_log_handler::prelude::*;
//! use gcp_log_handler::info;
//!
//! let logger = Logger::gcp(std::io::sink(), HandlerOptions::new()).unwrap();
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! ```

/// Log a message at any level with automatic formatting.
///
/// # Examples
///
/// ```
/// # use gcp_log_handler::prelude::*;
/// # let logger = Logger::gcp(std::io::sink(), HandlerOptions::new()).unwrap();
/// use gcp_log_handler::log;
/// log!(logger, Level::INFO, "Simple message");
/// log!(logger, Level::ERROR.offset(1), "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, format!($($arg)+), ::std::iter::empty::<$crate::Attr>())
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::DEBUG, $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use gcp_log_handler::prelude::*;
/// # let logger = Logger::gcp(std::io::sink(), HandlerOptions::new()).unwrap();
/// use gcp_log_handler::info;
/// info!(logger, "Application started");
/// info!(logger, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::INFO, $($arg)+)
    };
}

/// Log a notice-level message.
#[macro_export]
macro_rules! notice {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::NOTICE, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use gcp_log_handler::prelude::*;
/// # let logger = Logger::gcp(std::io::sink(), HandlerOptions::new()).unwrap();
/// use gcp_log_handler::warn;
/// warn!(logger, "Low disk space");
/// warn!(logger, "Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::WARNING, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::ERROR, $($arg)+)
    };
}

/// Log a critical-level message.
#[macro_export]
macro_rules! critical {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::CRITICAL, $($arg)+)
    };
}

/// Log an alert-level message.
#[macro_export]
macro_rules! alert {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::ALERT, $($arg)+)
    };
}

/// Log an emergency-level message.
///
/// # Examples
///
/// ```
/// # use gcp_log_handler::prelude::*;
/// # let logger = Logger::gcp(std::io::sink(), HandlerOptions::new()).unwrap();
/// use gcp_log_handler::emergency;
/// emergency!(logger, "Unable to recover from error: {}", "disk full");
/// ```
#[macro_export]
macro_rules! emergency {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::EMERGENCY, $($arg)+)
    };
}
