//! Message rate over the lifetime of a conversation.

use serde::Serialize;

use crate::Conversation;
use crate::analysis::bucket::{Histogram, histogram};
use crate::config::{AnalysisConfig, MILLIS_PER_DAY};
use crate::core::filter::FilterConfig;

/// Leading messages dropped from every series. Messenger opens new chats
/// with automatic "you are now connected" entries.
pub const INTRO_MESSAGES: usize = 2;

/// Bins per 30-day month, giving roughly half-month bins.
pub const BINS_PER_MONTH: usize = 2;

const MONTH_MS: i64 = 30 * MILLIS_PER_DAY;

/// Message frequency of one conversation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeries {
    pub folder: String,
    pub title: String,
    /// Sorted timestamps, introduction messages removed.
    pub timestamps: Vec<i64>,
    /// Messages per bin over the conversation's lifetime.
    pub histogram: Histogram,
}

impl TimeSeries {
    /// Bin midpoints as milliseconds since epoch.
    pub fn centers_ms(&self) -> Vec<i64> {
        self.histogram
            .centers()
            .into_iter()
            .map(|c| c.round() as i64)
            .collect()
    }

    /// Running message total per bin.
    pub fn cumulative(&self) -> Vec<usize> {
        self.histogram.cumulative()
    }
}

/// Number of histogram bins for a span: two per started 30-day month.
pub fn bin_count(first_ms: i64, last_ms: i64) -> usize {
    let months = (last_ms - first_ms).max(0) / MONTH_MS + 1;
    usize::try_from(months).unwrap_or(1) * BINS_PER_MONTH
}

/// Sorted timestamps of `conversation` inside the window.
///
/// The introduction messages are the conversation's first two, so they are
/// removed before the window applies, and only when at least three exist.
pub fn series_timestamps(conversation: &Conversation, filter: &FilterConfig) -> Vec<i64> {
    let mut times = conversation.timestamps();
    if times.len() > INTRO_MESSAGES {
        times.drain(..INTRO_MESSAGES);
    }
    times.retain(|&t| filter.contains_ms(t));
    times
}

/// Builds the series of one conversation, or `None` when it has fewer than
/// `min_messages` timestamps or none at all.
pub fn conversation_time_series(
    conversation: &Conversation,
    filter: &FilterConfig,
    min_messages: usize,
) -> Option<TimeSeries> {
    let timestamps = series_timestamps(conversation, filter);
    if timestamps.is_empty() || timestamps.len() < min_messages {
        return None;
    }
    let bins = bin_count(timestamps[0], timestamps[timestamps.len() - 1]);
    let histogram = histogram(&timestamps, bins);
    Some(TimeSeries {
        folder: conversation.folder.clone(),
        title: conversation.display_title().to_string(),
        timestamps,
        histogram,
    })
}

/// Series for every conversation that meets the minimum size.
pub fn time_series(conversations: &[Conversation], config: &AnalysisConfig) -> Vec<TimeSeries> {
    let filter = config.date_filter();
    conversations
        .iter()
        .filter_map(|c| conversation_time_series(c, &filter, config.min_messages))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Message;

    fn conv(times: &[i64]) -> Conversation {
        Conversation::new("chat").with_messages(times.iter().map(|&t| Message::new("A", t)).collect())
    }

    #[test]
    fn test_bin_count() {
        assert_eq!(bin_count(0, 0), 2);
        assert_eq!(bin_count(0, MONTH_MS - 1), 2);
        assert_eq!(bin_count(0, MONTH_MS), 4);
        assert_eq!(bin_count(0, 5 * MONTH_MS + 17), 12);
    }

    #[test]
    fn test_intro_messages_dropped() {
        let c = conv(&[50, 10, 20, 40, 30]);
        assert_eq!(series_timestamps(&c, &FilterConfig::new()), vec![30, 40, 50]);
    }

    #[test]
    fn test_short_series_kept_whole() {
        let c = conv(&[20, 10]);
        assert_eq!(series_timestamps(&c, &FilterConfig::new()), vec![10, 20]);
    }

    #[test]
    fn test_intro_messages_outside_window() {
        let day = MILLIS_PER_DAY;
        let intro = [100 * day, 101 * day];
        let real: Vec<i64> = (0..5).map(|i| (800 + i) * day).collect();
        let times: Vec<i64> = intro.iter().chain(&real).copied().collect();
        let filter = FilterConfig::new().with_after(chrono::DateTime::from_timestamp_millis(700 * day).unwrap());

        assert_eq!(series_timestamps(&conv(&times), &filter), real);
        let series = conversation_time_series(&conv(&times), &filter, 0).unwrap();
        assert_eq!(series.histogram.total(), 5);
    }

    #[test]
    fn test_window_after_intro_drop() {
        // The first real message falls before the window
        let c = conv(&[10, 20, 30, 40, 50]);
        let filter = FilterConfig::new()
            .with_after(chrono::DateTime::from_timestamp_millis(35).unwrap());
        assert_eq!(series_timestamps(&c, &filter), vec![40, 50]);
    }

    #[test]
    fn test_series_histogram_covers_all() {
        let day = MILLIS_PER_DAY;
        let times: Vec<i64> = (0..50).map(|i| i * 3 * day).collect();
        let series = conversation_time_series(&conv(&times), &FilterConfig::new(), 0).unwrap();

        assert_eq!(series.timestamps.len(), 48);
        assert_eq!(series.histogram.total(), 48);
        assert_eq!(series.cumulative().last(), Some(&48));
        assert_eq!(series.centers_ms().len(), series.histogram.counts.len());
    }

    #[test]
    fn test_min_messages_skips() {
        let c = conv(&[1, 2, 3, 4]);
        assert!(conversation_time_series(&c, &FilterConfig::new(), 3).is_none());
        assert!(conversation_time_series(&c, &FilterConfig::new(), 2).is_some());
    }

    #[test]
    fn test_empty_conversation() {
        assert!(conversation_time_series(&conv(&[]), &FilterConfig::new(), 0).is_none());
        assert!(time_series(&[conv(&[])], &AnalysisConfig::new().with_min_messages(0)).is_empty());
    }
}
