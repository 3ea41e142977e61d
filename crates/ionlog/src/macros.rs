//! Call-site macros
//!
//! Every macro captures the caller's package, function, file and line at
//! compile time and accepts `format!` style arguments:
//!
//! ```ignore
//! ionlog::info!(logger, "listening on {}", addr);
//! ionlog::warn_once!(logger, "cache disabled");
//! ionlog::error_on_change!(logger, "upstream state: {:?}", state);
//! ```

/// Log at trace level; written only while trace mode is on
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $logger.trace($crate::caller!(), ::std::format!($($arg)+))
    };
}

#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $logger.debug($crate::caller!(), ::std::format!($($arg)+))
    };
}

#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $logger.info($crate::caller!(), ::std::format!($($arg)+))
    };
}

#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $logger.warn($crate::caller!(), ::std::format!($($arg)+))
    };
}

#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $logger.error($crate::caller!(), ::std::format!($($arg)+))
    };
}

/// Log at debug level the first time this call site runs
#[macro_export]
macro_rules! debug_once {
    ($logger:expr, $($arg:tt)+) => {
        $logger.log_once($crate::Level::Debug, $crate::caller!(), ::std::format!($($arg)+))
    };
}

/// Log at info level the first time this call site runs
#[macro_export]
macro_rules! info_once {
    ($logger:expr, $($arg:tt)+) => {
        $logger.log_once($crate::Level::Info, $crate::caller!(), ::std::format!($($arg)+))
    };
}

/// Log at warn level the first time this call site runs
#[macro_export]
macro_rules! warn_once {
    ($logger:expr, $($arg:tt)+) => {
        $logger.log_once($crate::Level::Warn, $crate::caller!(), ::std::format!($($arg)+))
    };
}

/// Log at error level the first time this call site runs
#[macro_export]
macro_rules! error_once {
    ($logger:expr, $($arg:tt)+) => {
        $logger.log_once($crate::Level::Error, $crate::caller!(), ::std::format!($($arg)+))
    };
}

/// Log at debug level when the message changes at this call site
#[macro_export]
macro_rules! debug_on_change {
    ($logger:expr, $($arg:tt)+) => {
        $logger.log_on_change($crate::Level::Debug, $crate::caller!(), ::std::format!($($arg)+))
    };
}

/// Log at info level when the message changes at this call site
#[macro_export]
macro_rules! info_on_change {
    ($logger:expr, $($arg:tt)+) => {
        $logger.log_on_change($crate::Level::Info, $crate::caller!(), ::std::format!($($arg)+))
    };
}

/// Log at warn level when the message changes at this call site
#[macro_export]
macro_rules! warn_on_change {
    ($logger:expr, $($arg:tt)+) => {
        $logger.log_on_change($crate::Level::Warn, $crate::caller!(), ::std::format!($($arg)+))
    };
}

/// Log at error level when the message changes at this call site
#[macro_export]
macro_rules! error_on_change {
    ($logger:expr, $($arg:tt)+) => {
        $logger.log_on_change($crate::Level::Error, $crate::caller!(), ::std::format!($($arg)+))
    };
}

/// Flush, write a panic record, then panic with the message
#[macro_export]
macro_rules! log_panic {
    ($logger:expr, $($arg:tt)+) => {
        $logger.panic($crate::caller!(), ::std::format!($($arg)+))
    };
}
