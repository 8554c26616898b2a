//! A loaded conversation.

use serde::{Deserialize, Serialize};

use crate::Message;

/// Title used when neither the export nor the folder provides one.
pub const TITLE_MISSING: &str = "TITLE MISSING";

/// One conversation of an inbox: its folder, title, participants and
/// messages sorted by timestamp ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    /// Folder name inside the inbox directory.
    pub folder: String,

    /// Title from the export, if it had a non-empty one.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub title: Option<String>,

    /// Names of the current participants.
    #[serde(default)]
    pub participants: Vec<String>,

    /// Messages, oldest first.
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl Conversation {
    /// Creates an empty conversation for `folder`.
    pub fn new(folder: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
            title: None,
            participants: Vec::new(),
            messages: Vec::new(),
        }
    }

    /// Builder method to set the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Builder method to set the participants.
    #[must_use]
    pub fn with_participants<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.participants = names.into_iter().map(Into::into).collect();
        self
    }

    /// Builder method to set the messages. They are sorted by timestamp.
    #[must_use]
    pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = messages;
        self.sort_messages();
        self
    }

    /// Sorts messages oldest first. The sort is stable, so messages sharing
    /// a timestamp keep their relative order.
    pub fn sort_messages(&mut self) {
        self.messages.sort_by_key(|m| m.timestamp_ms);
    }

    /// Title to show in reports: the export title, else the folder name,
    /// else [`TITLE_MISSING`].
    ///
    /// ```
    /// use chatstats::Conversation;
    ///
    /// assert_eq!(Conversation::new("bob_x1").display_title(), "bob_x1");
    /// assert_eq!(Conversation::new("bob_x1").with_title("Bob").display_title(), "Bob");
    /// assert_eq!(Conversation::new("").display_title(), "TITLE MISSING");
    /// ```
    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(title) => title,
            None if !self.folder.is_empty() => &self.folder,
            None => TITLE_MISSING,
        }
    }

    /// Number of messages.
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Total characters of text content across all messages.
    pub fn char_count(&self) -> usize {
        self.messages.iter().map(Message::char_count).sum()
    }

    /// Returns `true` if `name` is a current participant.
    pub fn is_participant(&self, name: &str) -> bool {
        self.participants.iter().any(|p| p == name)
    }

    /// Sorted timestamps of all messages.
    pub fn timestamps(&self) -> Vec<i64> {
        let mut times: Vec<i64> = self.messages.iter().map(|m| m.timestamp_ms).collect();
        times.sort_unstable();
        times
    }

    /// First and last timestamp, or `None` for an empty conversation.
    pub fn time_span(&self) -> Option<(i64, i64)> {
        let first = self.messages.iter().map(|m| m.timestamp_ms).min()?;
        let last = self.messages.iter().map(|m| m.timestamp_ms).max()?;
        Some((first, last))
    }
}
