//! Error types for the dashboard.
//!
//! Transient sampling failures (a process vanishing mid-scan, an unreadable
//! `/proc` entry) are handled locally by the collectors and never reach this
//! type; `MonitorError` covers the failures that abort a tick or startup.

use std::io;
use thiserror::Error;

/// Error type for dashboard operations.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Failed to collect a snapshot from a sampler.
    #[error("failed to sample '{sampler}': {message}")]
    SampleFailed {
        /// The sampler that failed.
        sampler: &'static str,
        /// Error message describing the failure.
        message: String,
    },

    /// Configuration file not found.
    #[error("configuration file not found: {0}")]
    ConfigNotFound(String),

    /// Configuration parsing error.
    #[error("configuration error: {0}")]
    ConfigParse(String),

    /// Terminal initialization or rendering error.
    #[error("terminal error: {0}")]
    TerminalError(#[from] io::Error),
}

/// Result type alias for dashboard operations.
pub type Result<T> = std::result::Result<T, MonitorError>;
