//! Filter messages by date range.
//!
//! This module provides [`FilterConfig`] for defining a time window and
//! [`apply_filters`] / [`filter_conversation`] for applying it.
//!
//! # Examples
//!
//! ```
//! use chatstats::core::filter::{FilterConfig, apply_filters};
//! use chatstats::Message;
//!
//! # fn main() -> chatstats::Result<()> {
//! let messages = vec![
//!     Message::new("Alice", 1_704_110_400_000), // 2024-01-01 12:00 UTC
//!     Message::new("Alice", 1_718_452_800_000), // 2024-06-15 12:00 UTC
//! ];
//!
//! let config = FilterConfig::new()
//!     .with_date_from("2024-06-01")?
//!     .with_date_to("2024-12-31")?;
//!
//! let filtered = apply_filters(messages, &config);
//! assert_eq!(filtered.len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! # Behavior Notes
//!
//! - Both bounds are inclusive; an end date covers the whole day
//! - Dates are interpreted in UTC

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

use crate::Conversation;
use crate::Message;
use crate::config::parse_date;
use crate::error::ChatstatsError;

/// Time window for messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterConfig {
    /// Include only messages on or after this timestamp.
    pub after: Option<DateTime<Utc>>,

    /// Include only messages on or before this timestamp.
    pub before: Option<DateTime<Utc>>,
}

impl FilterConfig {
    /// Creates a new empty filter configuration.
    ///
    /// No filters are active by default; all messages pass through.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the start date filter (inclusive) from `YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// Returns [`ChatstatsError::InvalidDate`] if the format is invalid.
    pub fn with_date_from(self, date_str: &str) -> Result<Self, ChatstatsError> {
        Ok(self.with_start(parse_date(date_str)?))
    }

    /// Sets the end date filter (inclusive) from `YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// Returns [`ChatstatsError::InvalidDate`] if the format is invalid.
    pub fn with_date_to(self, date_str: &str) -> Result<Self, ChatstatsError> {
        Ok(self.with_end(parse_date(date_str)?))
    }

    /// Sets the start to the first millisecond of `date`.
    #[must_use]
    pub fn with_start(mut self, date: NaiveDate) -> Self {
        self.after = Some(start_of_day(date));
        self
    }

    /// Sets the end to the last millisecond of `date`.
    #[must_use]
    pub fn with_end(mut self, date: NaiveDate) -> Self {
        self.before = Some(match date.succ_opt() {
            Some(next) => start_of_day(next) - Duration::milliseconds(1),
            None => DateTime::<Utc>::MAX_UTC,
        });
        self
    }

    /// Sets the start timestamp directly.
    #[must_use]
    pub fn with_after(mut self, dt: DateTime<Utc>) -> Self {
        self.after = Some(dt);
        self
    }

    /// Sets the end timestamp directly.
    #[must_use]
    pub fn with_before(mut self, dt: DateTime<Utc>) -> Self {
        self.before = Some(dt);
        self
    }

    /// Returns `true` if any bound is set.
    pub fn is_active(&self) -> bool {
        self.after.is_some() || self.before.is_some()
    }

    /// Returns `true` if a millisecond timestamp lies inside the window.
    pub fn contains_ms(&self, timestamp_ms: i64) -> bool {
        if self.after.is_some_and(|after| timestamp_ms < after.timestamp_millis()) {
            return false;
        }
        if self.before.is_some_and(|before| timestamp_ms > before.timestamp_millis()) {
            return false;
        }
        true
    }

    /// Returns `true` if the message lies inside the window.
    pub fn matches(&self, msg: &Message) -> bool {
        self.contains_ms(msg.timestamp_ms)
    }
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::default()).and_utc()
}

/// Keeps only the messages inside the window.
///
/// If no bound is set, returns the original messages unchanged.
pub fn apply_filters(messages: Vec<Message>, config: &FilterConfig) -> Vec<Message> {
    if !config.is_active() {
        return messages;
    }

    messages
        .into_iter()
        .filter(|msg| config.matches(msg))
        .collect()
}

/// Returns the conversation with messages outside the window removed.
pub fn filter_conversation(mut conversation: Conversation, config: &FilterConfig) -> Conversation {
    conversation.messages = apply_filters(conversation.messages, config);
    conversation
}
