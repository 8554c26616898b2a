//! Message and reaction types.
//!
//! [`Message`] is the normalized form of one entry of a conversation export.
//! Loaders convert the raw export structure into this type after repairing
//! text encoding, so analyses never see the raw format.
//!
//! # Examples
//!
//! ```
//! use chatstats::{Message, Reaction};
//!
//! let msg = Message::new("Alice", 1_600_000_000_000)
//!     .with_content("Hello, world!")
//!     .with_reaction(Reaction::new("👍", "Bob"));
//!
//! assert_eq!(msg.sender(), "Alice");
//! assert_eq!(msg.char_count(), 13);
//! assert_eq!(msg.reactions().len(), 1);
//! ```

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A single reaction placed on a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    /// The emoji as it appears in the export (after encoding repair).
    pub emoji: String,
    /// Name of the person who reacted.
    pub actor: String,
}

impl Reaction {
    /// Creates a new reaction.
    pub fn new(emoji: impl Into<String>, actor: impl Into<String>) -> Self {
        Self {
            emoji: emoji.into(),
            actor: actor.into(),
        }
    }
}

/// One message of a conversation.
///
/// # Fields
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | `sender` | `String` | Display name of the author |
/// | `timestamp_ms` | `i64` | Milliseconds since the Unix epoch |
/// | `content` | `Option<String>` | Text body, absent for photos, stickers, calls |
/// | `reactions` | `Vec<Reaction>` | Reactions other people placed on it |
/// | `call_duration` | `Option<u64>` | Call length in seconds, for call entries |
/// | `sticker` | `Option<String>` | Sticker image URI |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Display name of the message author.
    pub sender: String,

    /// Milliseconds since the Unix epoch.
    pub timestamp_ms: i64,

    /// Text content, if the message had any.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub content: Option<String>,

    /// Reactions placed on this message.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub reactions: Vec<Reaction>,

    /// Duration of a call in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub call_duration: Option<u64>,

    /// URI of a sticker image.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub sticker: Option<String>,
}

impl Message {
    /// Creates a message with only a sender and a timestamp.
    pub fn new(sender: impl Into<String>, timestamp_ms: i64) -> Self {
        Self {
            sender: sender.into(),
            timestamp_ms,
            content: None,
            reactions: Vec::new(),
            call_duration: None,
            sticker: None,
        }
    }

    // =========================================================================
    // Builder methods
    // =========================================================================

    /// Builder method to set the text content.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Builder method to add a reaction.
    #[must_use]
    pub fn with_reaction(mut self, reaction: Reaction) -> Self {
        self.reactions.push(reaction);
        self
    }

    /// Builder method to set the call duration in seconds.
    #[must_use]
    pub fn with_call_duration(mut self, seconds: u64) -> Self {
        self.call_duration = Some(seconds);
        self
    }

    /// Builder method to set the sticker URI.
    #[must_use]
    pub fn with_sticker(mut self, uri: impl Into<String>) -> Self {
        self.sticker = Some(uri.into());
        self
    }

    // =========================================================================
    // Accessor methods
    // =========================================================================

    /// Returns the sender name.
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Returns the text content, if any.
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Returns the reactions placed on this message.
    pub fn reactions(&self) -> &[Reaction] {
        &self.reactions
    }

    /// Returns the timestamp as a UTC date-time.
    ///
    /// Returns `None` for values outside chrono's representable range.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp_ms).single()
    }

    /// Number of characters (Unicode scalar values) of the text content.
    ///
    /// Messages without text count as zero.
    pub fn char_count(&self) -> usize {
        self.content.as_deref().map_or(0, |c| c.chars().count())
    }

    /// Returns `true` if this entry records a call.
    pub fn is_call(&self) -> bool {
        self.call_duration.is_some()
    }
}
