//! Internal logging system for HairBridge
//!
//! This module provides the process-wide diagnostic sink:
//! - Customizable logger via Logger trait
//! - Severity levels (Trace, Debug, Info, Warn, Error)
//! - Colored stderr output by default (the platform debug channel)
//! - A callback logger forwarding formatted lines to the host
//! - File and line information for detailed ERROR logs

use colored::*;
use std::cell::RefCell;
use std::sync::{Arc, OnceLock, RwLock};
use std::time::SystemTime;
use chrono::{DateTime, Local};

/// Host log callback, receives one formatted diagnostic line per call
pub type LogCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// Global logger (initialized with DefaultLogger)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

thread_local! {
    /// Entries held back on this thread while a deferred scope is open
    static DEFERRED: RefCell<Option<Vec<LogEntry>>> = const { RefCell::new(None) };
}

/// Logger trait for custom logging implementations
///
/// # Example
///
/// ```no_run
/// use hair_bridge::hairbridge::log::{Logger, LogEntry};
///
/// struct FileLogger {
///     file: std::fs::File,
/// }
///
/// impl Logger for FileLogger {
///     fn log(&self, entry: &LogEntry) {
///         // Write to file...
///     }
/// }
/// ```
pub trait Logger: Send + Sync {
    /// Log an entry
    fn log(&self, entry: &LogEntry);
}

/// Log entry containing all information about a log message
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Severity level
    pub severity: LogSeverity,

    /// Timestamp when the log was created
    pub timestamp: SystemTime,

    /// Source module (e.g., "hairbridge::Context", "hairbridge::legacy")
    pub source: String,

    /// Log message
    pub message: String,

    /// Source file (only for detailed ERROR logs)
    pub file: Option<&'static str>,

    /// Source line (only for detailed ERROR logs)
    pub line: Option<u32>,
}

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogSeverity {
    /// Very verbose debug information
    Trace,

    /// Development/debugging information
    Debug,

    /// Important informational messages
    Info,

    /// Warning messages (potential issues)
    Warn,

    /// Error messages (with file:line details)
    Error,
}

impl LogSeverity {
    /// Fixed-width tag used in formatted output
    pub fn tag(self) -> &'static str {
        match self {
            LogSeverity::Trace => "TRACE",
            LogSeverity::Debug => "DEBUG",
            LogSeverity::Info => "INFO ",
            LogSeverity::Warn => "WARN ",
            LogSeverity::Error => "ERROR",
        }
    }
}

/// Default logger, used while no host callback is registered
///
/// Format:
/// - Normal: `[timestamp] [SEVERITY] [source] message`
/// - Error: `[timestamp] [ERROR] [source] message (file:line)`
pub struct DefaultLogger;

impl Logger for DefaultLogger {
    fn log(&self, entry: &LogEntry) {
        let datetime: DateTime<Local> = entry.timestamp.into();
        let timestamp = datetime.format("%Y-%m-%d %H:%M:%S%.3f").to_string();

        let severity_str = match entry.severity {
            LogSeverity::Trace => entry.severity.tag().bright_black(),
            LogSeverity::Debug => entry.severity.tag().cyan(),
            LogSeverity::Info => entry.severity.tag().green(),
            LogSeverity::Warn => entry.severity.tag().yellow(),
            LogSeverity::Error => entry.severity.tag().red().bold(),
        };

        let source = entry.source.bright_blue();

        if let (Some(file), Some(line)) = (entry.file, entry.line) {
            eprintln!(
                "[{}] [{}] [{}] {} ({}:{})",
                timestamp,
                severity_str,
                source,
                entry.message,
                file,
                line
            );
        } else {
            eprintln!(
                "[{}] [{}] [{}] {}",
                timestamp,
                severity_str,
                source,
                entry.message
            );
        }
    }
}

/// Logger forwarding every entry to the host's registered callback
///
/// Lines are plain text: `[SEVERITY] source: message`.
pub struct CallbackLogger {
    callback: LogCallback,
}

impl CallbackLogger {
    pub fn new(callback: LogCallback) -> Self {
        Self { callback }
    }

    /// Format an entry the way the host receives it
    pub fn format(entry: &LogEntry) -> String {
        format!("[{}] {}: {}", entry.severity.tag().trim_end(), entry.source, entry.message)
    }
}

impl Logger for CallbackLogger {
    fn log(&self, entry: &LogEntry) {
        (self.callback)(&Self::format(entry));
    }
}

// ===== GLOBAL SINK =====

fn logger_lock() -> &'static RwLock<Box<dyn Logger>> {
    LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)))
}

/// Replace the process-wide logger
pub fn set_logger<L: Logger + 'static>(logger: L) {
    if let Ok(mut lock) = logger_lock().write() {
        *lock = Box::new(logger);
    }
}

/// Install (or remove) the host log callback
///
/// `None` falls back to the DefaultLogger.
pub fn set_log_callback(callback: Option<LogCallback>) {
    match callback {
        Some(cb) => set_logger(CallbackLogger::new(cb)),
        None => reset_logger(),
    }
}

/// Reset logger to default (DefaultLogger)
pub fn reset_logger() {
    if let Ok(mut lock) = logger_lock().write() {
        *lock = Box::new(DefaultLogger);
    }
}

/// Run `f` with this thread's log entries held back until it returns
///
/// Host callbacks then never run while `f` holds borrowed state, so a
/// callback may call back into the code that logged. Nested scopes join the
/// outermost one.
pub(crate) fn deferred<R>(f: impl FnOnce() -> R) -> R {
    let _scope = DeferredScope::open();
    f()
}

struct DeferredScope {
    outermost: bool,
}

impl DeferredScope {
    fn open() -> Self {
        let outermost = DEFERRED.with(|held| {
            let mut held = held.borrow_mut();
            if held.is_some() {
                return false;
            }
            *held = Some(Vec::new());
            true
        });
        Self { outermost }
    }
}

impl Drop for DeferredScope {
    fn drop(&mut self) {
        if !self.outermost {
            return;
        }
        let entries = DEFERRED.with(|held| held.borrow_mut().take()).unwrap_or_default();
        for entry in &entries {
            dispatch(entry);
        }
    }
}

fn dispatch(entry: &LogEntry) {
    if let Ok(lock) = logger_lock().read() {
        lock.log(entry);
    }
}

fn emit(entry: LogEntry) {
    let entry = DEFERRED.with(move |held| match held.borrow_mut().as_mut() {
        Some(held) => {
            held.push(entry);
            None
        }
        None => Some(entry),
    });
    if let Some(entry) = entry {
        dispatch(&entry);
    }
}

/// Log without file:line (used by hw_info!, hw_warn!, ...)
pub fn log(severity: LogSeverity, source: &str, message: String) {
    emit(LogEntry {
        severity,
        timestamp: SystemTime::now(),
        source: source.to_string(),
        message,
        file: None,
        line: None,
    });
}

/// Log with file:line information (used by hw_error!)
pub fn log_detailed(
    severity: LogSeverity,
    source: &str,
    message: String,
    file: &'static str,
    line: u32,
) {
    emit(LogEntry {
        severity,
        timestamp: SystemTime::now(),
        source: source.to_string(),
        message,
        file: Some(file),
        line: Some(line),
    });
}

// ===== LOGGING MACROS =====

/// Log a TRACE message
#[macro_export]
macro_rules! hw_trace {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::log(
            $crate::log::LogSeverity::Trace,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a DEBUG message
#[macro_export]
macro_rules! hw_debug {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::log(
            $crate::log::LogSeverity::Debug,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log an INFO message
///
/// # Example
///
/// ```ignore
/// hw_info!("hairbridge::Context", "CreatePixelShader({}) : {} succeeded", path, handle);
/// ```
#[macro_export]
macro_rules! hw_info {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::log(
            $crate::log::LogSeverity::Info,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a WARN message
#[macro_export]
macro_rules! hw_warn {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::log(
            $crate::log::LogSeverity::Warn,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log an ERROR message with file:line information
#[macro_export]
macro_rules! hw_error {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::log_detailed(
            $crate::log::LogSeverity::Error,
            $source,
            format!($($arg)*),
            file!(),
            line!()
        )
    };
}

/// Log an ERROR and evaluate to an `Error::BackendError` carrying the same message
#[macro_export]
macro_rules! hw_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::log::log_detailed(
            $crate::log::LogSeverity::Error,
            $source,
            message.clone(),
            file!(),
            line!()
        );
        $crate::hairbridge::Error::BackendError(message)
    }};
}

/// Log an ERROR and return `Err(Error::BackendError(..))` from the enclosing function
#[macro_export]
macro_rules! hw_bail {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::hw_err!($source, $($arg)*))
    };
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
