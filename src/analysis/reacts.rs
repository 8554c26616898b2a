//! Per-person reaction, message and character tallies of a conversation.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::Conversation;
use crate::config::AnalysisConfig;
use crate::core::filter::filter_conversation;
use crate::reaction::ReactionKind;

/// Reaction category → count.
pub type ReactCounts = BTreeMap<ReactionKind, usize>;

/// Statistics of one participant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PersonReacts {
    pub name: String,
    /// Reactions other people placed on this person's messages.
    pub received: ReactCounts,
    /// Reactions this person placed on messages of participants.
    pub given: ReactCounts,
    pub messages: usize,
    pub chars: usize,
}

impl PersonReacts {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Received reactions of one kind.
    pub fn received_count(&self, kind: ReactionKind) -> usize {
        self.received.get(&kind).copied().unwrap_or(0)
    }

    /// Given reactions of one kind.
    pub fn given_count(&self, kind: ReactionKind) -> usize {
        self.given.get(&kind).copied().unwrap_or(0)
    }
}

/// Reaction statistics of one conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationReacts {
    pub folder: String,
    pub title: String,
    /// All messages, including those from people who left.
    pub total_messages: usize,
    /// One entry per participant, in participant order.
    pub people: Vec<PersonReacts>,
}

/// Tallies reactions, messages and characters per participant.
///
/// Messages from senders no longer in the participant list are skipped
/// entirely, and reactions given by non-participants are not credited to
/// anyone as given (they still count as received by the sender).
pub fn conversation_reacts(conversation: &Conversation) -> ConversationReacts {
    let mut people: Vec<PersonReacts> = conversation
        .participants
        .iter()
        .map(|name| PersonReacts::new(name))
        .collect();
    let index: HashMap<&str, usize> = conversation
        .participants
        .iter()
        .enumerate()
        .map(|(i, name)| (name.as_str(), i))
        .collect();

    for msg in &conversation.messages {
        let Some(&sender) = index.get(msg.sender()) else {
            continue;
        };
        for reaction in msg.reactions() {
            let kind = ReactionKind::from_emoji(&reaction.emoji);
            *people[sender].received.entry(kind).or_insert(0) += 1;
            if let Some(&actor) = index.get(reaction.actor.as_str()) {
                *people[actor].given.entry(kind).or_insert(0) += 1;
            }
        }
        people[sender].messages += 1;
        people[sender].chars += msg.char_count();
    }

    ConversationReacts {
        folder: conversation.folder.clone(),
        title: conversation.display_title().to_string(),
        total_messages: conversation.message_count(),
        people,
    }
}

/// Reaction statistics for every conversation that, within the date window,
/// has at least `min_messages` messages.
pub fn reacts_stats(conversations: &[Conversation], config: &AnalysisConfig) -> Vec<ConversationReacts> {
    let filter = config.date_filter();
    conversations
        .iter()
        .map(|c| conversation_reacts(&filter_conversation(c.clone(), &filter)))
        .filter(|r| r.total_messages >= config.min_messages)
        .collect()
}
