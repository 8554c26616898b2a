//! Statistics computed over loaded conversations.
//!
//! Each analysis is a pure function from `&[Conversation]` and an
//! [`AnalysisConfig`](crate::config::AnalysisConfig) to a report struct:
//!
//! - [`largest`] - conversations ranked by message or character count
//! - [`over_time`] - busiest conversations per fixed-length interval
//! - [`reacts`] - reactions received and given per participant
//! - [`time_series`] - message rate over a conversation's lifetime
//! - [`sizes`] - histogram of conversation sizes
//!
//! [`bucket`] holds the interval counting and histogram kernels they share.

pub mod bucket;
pub mod largest;
pub mod over_time;
pub mod reacts;
pub mod sizes;
pub mod time_series;

pub use largest::{ConversationSummary, LargestChats, PersonStats, largest_chats};
pub use over_time::{ChatsOverTime, IntervalRanking, RankedChat, largest_chats_over_time};
pub use reacts::{ConversationReacts, PersonReacts, ReactCounts, conversation_reacts, reacts_stats};
pub use sizes::{ConversationSize, ConversationSizes, conversation_sizes};
pub use time_series::{TimeSeries, conversation_time_series, time_series};
