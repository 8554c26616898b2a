//! Unified error types for chatstats.
//!
//! This module provides a single [`ChatstatsError`] enum that covers every
//! failure the library can report, from reading an inbox folder to writing a
//! TSV table or rendering a chart.
//!
//! # Error Handling Philosophy
//!
//! - **Library users** get typed errors they can match on
//! - **Application users** get clear, actionable error messages
//! - **Developers** get source error chains for debugging

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for chatstats operations.
///
/// # Example
///
/// ```rust
/// use chatstats::error::Result;
/// use chatstats::Conversation;
///
/// fn load_nothing() -> Result<Vec<Conversation>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, ChatstatsError>;

/// The error type for all chatstats operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChatstatsError {
    /// An I/O error occurred.
    ///
    /// This typically happens when:
    /// - The inbox directory doesn't exist
    /// - Permission denied
    /// - Disk is full (when writing output)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Failed to parse a conversation export file.
    ///
    /// Carries the file path when the data came from disk.
    #[error("Failed to parse export{}: {source}", path.as_ref().map(|p| format!(" (file: {})", p.display())).unwrap_or_default())]
    Parse {
        /// The underlying JSON error
        #[source]
        source: serde_json::Error,
        /// The file path, if available
        path: Option<PathBuf>,
    },

    /// Invalid date format in a date range.
    ///
    /// Date filters expect YYYY-MM-DD format.
    #[error("Invalid date '{input}'. Expected format: {expected}")]
    InvalidDate {
        /// The invalid date string that was provided
        input: String,
        /// Expected format description
        expected: &'static str,
    },

    /// A configuration value is out of range or inconsistent.
    #[error("Invalid configuration for '{field}': {message}")]
    InvalidConfig {
        /// The offending setting
        field: &'static str,
        /// Description of what's wrong
        message: String,
    },

    /// No inbox directory was given and none could be found.
    #[error(
        "No messages directory found at {}. Pass --folder or run from the directory containing messages/inbox",
        .0.display()
    )]
    InboxNotFound(PathBuf),

    /// TSV writing error.
    #[error("TSV error: {0}")]
    Tsv(#[from] csv::Error),

    /// JSON error outside of export parsing (config files).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Chart rendering failed.
    #[error("Failed to render chart {}: {message}", path.display())]
    Chart {
        /// Target image path
        path: PathBuf,
        /// Backend error description
        message: String,
    },
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ChatstatsError {
    /// Creates a parse error for an export file.
    pub fn parse(source: serde_json::Error, path: Option<PathBuf>) -> Self {
        ChatstatsError::Parse { source, path }
    }

    /// Creates an invalid date error.
    pub fn invalid_date(input: impl Into<String>) -> Self {
        ChatstatsError::InvalidDate {
            input: input.into(),
            expected: "YYYY-MM-DD",
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(field: &'static str, message: impl Into<String>) -> Self {
        ChatstatsError::InvalidConfig {
            field,
            message: message.into(),
        }
    }

    /// Creates a chart rendering error.
    pub fn chart(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        ChatstatsError::Chart {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, ChatstatsError::Io(_))
    }

    /// Returns `true` if this is a parse error.
    pub fn is_parse(&self) -> bool {
        matches!(self, ChatstatsError::Parse { .. })
    }

    /// Returns `true` if this is a date-related error.
    pub fn is_invalid_date(&self) -> bool {
        matches!(self, ChatstatsError::InvalidDate { .. })
    }

    /// Returns `true` if this is a configuration error.
    pub fn is_invalid_config(&self) -> bool {
        matches!(self, ChatstatsError::InvalidConfig { .. })
    }
}
