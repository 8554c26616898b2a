//! Largest conversations ranking.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::Conversation;
use crate::config::{AnalysisConfig, SortKey};
use crate::core::filter::FilterConfig;

/// Message and character totals of one person.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PersonStats {
    pub messages: usize,
    pub chars: usize,
}

/// Size of one conversation within the date window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationSummary {
    pub folder: String,
    pub title: String,
    /// Number of messages.
    pub count: usize,
    /// Number of text characters.
    pub chars: usize,
    /// Per-sender breakdown, keyed by sender name.
    pub people: BTreeMap<String, PersonStats>,
}

impl ConversationSummary {
    /// Summarizes the messages of `conversation` that pass `filter`.
    pub fn from_conversation(conversation: &Conversation, filter: &FilterConfig) -> Self {
        let mut summary = Self {
            folder: conversation.folder.clone(),
            title: conversation.display_title().to_string(),
            count: 0,
            chars: 0,
            people: BTreeMap::new(),
        };
        for msg in conversation.messages.iter().filter(|m| filter.matches(m)) {
            let chars = msg.char_count();
            summary.count += 1;
            summary.chars += chars;
            let person = summary.people.entry(msg.sender.clone()).or_default();
            person.messages += 1;
            person.chars += chars;
        }
        summary
    }

    /// Value of the ranking key.
    pub fn key(&self, sort_by: SortKey) -> usize {
        match sort_by {
            SortKey::Count => self.count,
            SortKey::Chars => self.chars,
        }
    }
}

/// Ranked conversations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LargestChats {
    /// Conversations at or above the minimum size, largest first.
    pub conversations: Vec<ConversationSummary>,
    /// Messages in the date window over all conversations, including those
    /// below the minimum size.
    pub total_messages: usize,
    /// Key the ranking is sorted by.
    pub sort_by: SortKey,
}

impl LargestChats {
    /// The first `n` conversations of the ranking.
    pub fn top(&self, n: usize) -> &[ConversationSummary] {
        &self.conversations[..n.min(self.conversations.len())]
    }
}

/// Ranks conversations by size.
///
/// Messages outside the configured date range are ignored. Conversations
/// with fewer than `min_messages` remaining messages are dropped. Ties are
/// ordered by title.
pub fn largest_chats(conversations: &[Conversation], config: &AnalysisConfig) -> LargestChats {
    let filter = config.date_filter();
    let summaries: Vec<ConversationSummary> = conversations
        .iter()
        .map(|c| ConversationSummary::from_conversation(c, &filter))
        .collect();

    let total_messages = summaries.iter().map(|s| s.count).sum();

    let mut ranked: Vec<ConversationSummary> = summaries
        .into_iter()
        .filter(|s| s.count >= config.min_messages)
        .collect();
    ranked.sort_by(|a, b| {
        b.key(config.sort_by)
            .cmp(&a.key(config.sort_by))
            .then_with(|| a.title.cmp(&b.title))
    });

    LargestChats {
        conversations: ranked,
        total_messages,
        sort_by: config.sort_by,
    }
}
