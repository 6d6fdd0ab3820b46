//! Opt-in debug logging.
//!
//! The dashboard owns the alternate screen, so diagnostics go to stderr and
//! are silent unless enabled via the `PTOP_DEBUG=1` environment variable.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Global debug mode flag.
static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);

/// Start time stored as millis since UNIX epoch (atomic-safe).
static START_TIME_MS: AtomicU64 = AtomicU64::new(0);

/// Enables debug mode globally.
pub fn enable() {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    START_TIME_MS.store(now, Ordering::SeqCst);
    DEBUG_ENABLED.store(true, Ordering::SeqCst);
}

/// Disables debug mode globally.
pub fn disable() {
    DEBUG_ENABLED.store(false, Ordering::SeqCst);
}

/// Returns true if debug mode is enabled.
#[inline]
pub fn is_enabled() -> bool {
    DEBUG_ENABLED.load(Ordering::Relaxed)
}

/// Enables debug mode when `PTOP_DEBUG=1` is set in the environment.
pub fn init_from_env() {
    if std::env::var("PTOP_DEBUG").as_deref() == Ok("1") {
        enable();
    }
}

/// Gets elapsed time since debug was enabled.
fn elapsed_ms() -> u64 {
    let start = START_TIME_MS.load(Ordering::Relaxed);
    if start == 0 {
        return 0;
    }
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    now.saturating_sub(start)
}

/// Debug log levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Per-tick tracing.
    Trace,
    /// Debug information.
    Debug,
    /// Warnings (recoverable sampling problems).
    Warn,
}

impl Level {
    fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Warn => "WARN",
        }
    }
}

/// Logs a debug message if debug mode is enabled.
pub fn log(level: Level, component: &str, message: &str) {
    if !is_enabled() {
        return;
    }

    // Format: [+0000ms] [LEVEL] [component] message
    let _ = writeln!(
        io::stderr(),
        "[+{:04}ms] [{:5}] [{}] {}",
        elapsed_ms(),
        level.as_str(),
        component,
        message
    );
}

/// Logs with format arguments.
#[macro_export]
macro_rules! debug_log {
    ($level:expr, $component:expr, $($arg:tt)*) => {
        if $crate::debug::is_enabled() {
            $crate::debug::log($level, $component, &format!($($arg)*));
        }
    };
}
