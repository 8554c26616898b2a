//! Most active conversations per time interval.

use serde::Serialize;

use crate::Conversation;
use crate::analysis::bucket::bucket_entities;
use crate::config::AnalysisConfig;

/// Label of the all-conversations row.
pub const TOTAL_TITLE: &str = "Total";

/// A conversation's message count inside one interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedChat {
    pub folder: String,
    pub title: String,
    pub count: usize,
}

/// One interval with its busiest conversations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntervalRanking {
    /// Inclusive start (ms since epoch).
    pub start_ms: i64,
    /// Exclusive end, `None` for the final open-ended interval.
    pub end_ms: Option<i64>,
    /// Messages over all conversations.
    pub total: usize,
    /// Busiest conversations, largest first.
    pub top: Vec<RankedChat>,
}

/// Interval rankings across the whole inbox timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatsOverTime {
    pub interval_days: u32,
    pub intervals: Vec<IntervalRanking>,
}

impl ChatsOverTime {
    /// Total message count per interval.
    pub fn totals(&self) -> Vec<usize> {
        self.intervals.iter().map(|i| i.total).collect()
    }
}

/// Buckets every conversation into `interval_days`-long intervals spanning
/// the earliest to the latest message of the inbox, and keeps the
/// `top_per_interval` busiest conversations of each.
///
/// The date window applies; the minimum conversation size does not, since
/// every message contributes to the totals.
pub fn largest_chats_over_time(
    conversations: &[Conversation],
    config: &AnalysisConfig,
) -> ChatsOverTime {
    let filter = config.date_filter();
    let counts = bucket_entities(
        conversations.iter().enumerate().map(|(idx, c)| {
            let times = c
                .messages
                .iter()
                .map(|m| m.timestamp_ms)
                .filter(|&t| filter.contains_ms(t))
                .collect();
            (idx, times)
        }),
        config.interval_ms(),
    );

    let intervals = counts
        .starts
        .iter()
        .enumerate()
        .map(|(i, &start_ms)| {
            let mut top: Vec<RankedChat> = counts.per_entity[i]
                .iter()
                .map(|(&idx, &count)| RankedChat {
                    folder: conversations[idx].folder.clone(),
                    title: conversations[idx].display_title().to_string(),
                    count,
                })
                .collect();
            top.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.title.cmp(&b.title)));
            top.truncate(config.top_per_interval);

            IntervalRanking {
                start_ms,
                end_ms: counts.starts.get(i + 1).copied(),
                total: counts.totals[i],
                top,
            }
        })
        .collect();

    ChatsOverTime {
        interval_days: config.interval_days,
        intervals,
    }
}
