//! Configuration types for loading and analysis.
//!
//! This module provides plain configuration structs for library usage,
//! without any CLI framework dependencies.
//!
//! - [`InboxConfig`] - how conversation folders are discovered and parsed
//! - [`AnalysisConfig`] - thresholds, ranking and output settings
//!
//! Both derive `Serialize`/`Deserialize`, so a run can be described by a JSON
//! file and loaded with [`AnalysisConfig::from_json_file`].
//!
//! # Example
//!
//! ```rust
//! use chatstats::config::{AnalysisConfig, SortKey};
//!
//! let config = AnalysisConfig::new()
//!     .with_min_messages(100)
//!     .with_sort_by(SortKey::Chars)
//!     .with_interval_days(14);
//!
//! assert!(config.validate().is_ok());
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::filter::FilterConfig;
use crate::error::{ChatstatsError, Result};

/// Milliseconds in one day.
pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// Configuration for inbox discovery and export parsing.
///
/// # Example
///
/// ```rust
/// use chatstats::config::InboxConfig;
///
/// let config = InboxConfig::new()
///     .with_filter("alice")
///     .with_skip_invalid(false);
/// assert_eq!(config.filters, vec!["alice"]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InboxConfig {
    /// Repair Meta's Latin-1 Mojibake in names and text (default: true)
    pub fix_encoding: bool,

    /// Skip conversations whose files fail to parse instead of aborting (default: true)
    pub skip_invalid: bool,

    /// Substrings that must all appear in a folder name for it to be included
    pub filters: Vec<String>,
}

impl Default for InboxConfig {
    fn default() -> Self {
        Self {
            fix_encoding: true,
            skip_invalid: true,
            filters: Vec::new(),
        }
    }
}

impl InboxConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables the Mojibake repair.
    #[must_use]
    pub fn with_fix_encoding(mut self, enabled: bool) -> Self {
        self.fix_encoding = enabled;
        self
    }

    /// Sets whether to skip conversations that fail to parse.
    #[must_use]
    pub fn with_skip_invalid(mut self, skip: bool) -> Self {
        self.skip_invalid = skip;
        self
    }

    /// Adds a folder-name substring filter.
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filters.push(filter.into());
        self
    }

    /// Returns `true` if `folder` contains every filter substring.
    pub fn matches(&self, folder: &str) -> bool {
        self.filters.iter().all(|f| folder.contains(f.as_str()))
    }
}

/// Size measure used to rank chats and bin conversation sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Number of messages
    #[default]
    Count,
    /// Number of text characters
    Chars,
}

impl SortKey {
    /// Plural noun used in chart labels.
    pub fn noun(&self) -> &'static str {
        match self {
            SortKey::Count => "messages",
            SortKey::Chars => "characters",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Count => write!(f, "count"),
            SortKey::Chars => write!(f, "chars"),
        }
    }
}

impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "count" => Ok(SortKey::Count),
            "chars" | "characters" => Ok(SortKey::Chars),
            _ => Err(format!("Unknown sort key: '{}'. Expected one of: count, chars", s)),
        }
    }
}

/// Settings shared by all analyses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Conversations with fewer messages are left out (default: 500)
    pub min_messages: usize,

    /// Ranking key for largest chats (default: count)
    pub sort_by: SortKey,

    /// Number of conversations shown in the largest-chats chart (default: 10)
    pub top_n: usize,

    /// Number of conversations listed per interval over time (default: 5)
    pub top_per_interval: usize,

    /// Interval length in days for the over-time analysis (default: 30)
    pub interval_days: u32,

    /// Only count messages on or after this date
    pub start_date: Option<NaiveDate>,

    /// Only count messages on or before this date (inclusive)
    pub end_date: Option<NaiveDate>,

    /// Root output directory (default: `output`)
    pub output_dir: PathBuf,

    /// Render PNG charts next to the TSV tables (default: true)
    pub charts: bool,

    /// Inbox loading settings
    pub inbox: InboxConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_messages: 500,
            sort_by: SortKey::Count,
            top_n: 10,
            top_per_interval: 5,
            interval_days: 30,
            start_date: None,
            end_date: None,
            output_dir: PathBuf::from("output"),
            charts: true,
            inbox: InboxConfig::default(),
        }
    }
}

impl AnalysisConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a configuration from a JSON file. Missing keys take defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the minimum message count.
    #[must_use]
    pub fn with_min_messages(mut self, min: usize) -> Self {
        self.min_messages = min;
        self
    }

    /// Sets the ranking key.
    #[must_use]
    pub fn with_sort_by(mut self, key: SortKey) -> Self {
        self.sort_by = key;
        self
    }

    /// Sets how many conversations the largest-chats chart shows.
    #[must_use]
    pub fn with_top_n(mut self, n: usize) -> Self {
        self.top_n = n;
        self
    }

    /// Sets how many conversations are listed per interval.
    #[must_use]
    pub fn with_top_per_interval(mut self, n: usize) -> Self {
        self.top_per_interval = n;
        self
    }

    /// Sets the over-time interval length in days.
    #[must_use]
    pub fn with_interval_days(mut self, days: u32) -> Self {
        self.interval_days = days;
        self
    }

    /// Sets the start date from a `YYYY-MM-DD` string.
    pub fn with_start_date(mut self, date: &str) -> Result<Self> {
        self.start_date = Some(parse_date(date)?);
        Ok(self)
    }

    /// Sets the inclusive end date from a `YYYY-MM-DD` string.
    pub fn with_end_date(mut self, date: &str) -> Result<Self> {
        self.end_date = Some(parse_date(date)?);
        Ok(self)
    }

    /// Sets the output directory.
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Enables or disables chart rendering.
    #[must_use]
    pub fn with_charts(mut self, enabled: bool) -> Self {
        self.charts = enabled;
        self
    }

    /// Sets the inbox loading configuration.
    #[must_use]
    pub fn with_inbox(mut self, inbox: InboxConfig) -> Self {
        self.inbox = inbox;
        self
    }

    /// Interval length in milliseconds.
    pub fn interval_ms(&self) -> i64 {
        i64::from(self.interval_days) * MILLIS_PER_DAY
    }

    /// Builds the message filter for the configured date range.
    pub fn date_filter(&self) -> FilterConfig {
        let mut filter = FilterConfig::new();
        if let Some(start) = self.start_date {
            filter = filter.with_start(start);
        }
        if let Some(end) = self.end_date {
            filter = filter.with_end(end);
        }
        filter
    }

    /// Checks that values are usable.
    pub fn validate(&self) -> Result<()> {
        if self.interval_days == 0 {
            return Err(ChatstatsError::invalid_config(
                "interval_days",
                "must be at least 1",
            ));
        }
        if self.top_n == 0 {
            return Err(ChatstatsError::invalid_config("top_n", "must be at least 1"));
        }
        if self.top_per_interval == 0 {
            return Err(ChatstatsError::invalid_config(
                "top_per_interval",
                "must be at least 1",
            ));
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(ChatstatsError::invalid_config(
                    "start_date",
                    format!("{start} is after end date {end}"),
                ));
            }
        }
        Ok(())
    }
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(date: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| ChatstatsError::invalid_date(date))
}
