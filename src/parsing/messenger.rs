//! Messenger JSON export format.
//!
//! Raw deserialization types for one `message_N.json` file, and the
//! conversion into [`Message`] values.
//!
//! Meta exports UTF-8 text encoded as ISO-8859-1, so names, message bodies
//! and reaction emoji all arrive as Mojibake unless repaired.

use serde::Deserialize;

use crate::message::{Message, Reaction};

/// One export file of a conversation.
#[derive(Debug, Deserialize)]
pub struct MessengerExport {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub participants: Vec<MessengerParticipant>,
    pub messages: Vec<MessengerRawMessage>,
}

/// Participant entry.
#[derive(Debug, Deserialize)]
pub struct MessengerParticipant {
    pub name: String,
}

/// Raw message structure for deserialization.
#[derive(Debug, Deserialize)]
pub struct MessengerRawMessage {
    pub sender_name: String,
    pub timestamp_ms: i64,
    pub content: Option<String>,
    #[serde(default)]
    pub reactions: Vec<MessengerReaction>,
    pub call_duration: Option<u64>,
    pub sticker: Option<MessengerSticker>,
}

/// Reaction entry.
#[derive(Debug, Deserialize)]
pub struct MessengerReaction {
    pub reaction: String,
    pub actor: String,
}

/// Sticker attachment.
#[derive(Debug, Deserialize)]
pub struct MessengerSticker {
    pub uri: Option<String>,
}

/// Fix Meta's broken encoding (Mojibake).
///
/// Each UTF-8 byte of the original text is stored as a separate code point.
/// Example: "Привет" becomes "ÐŸÑ€Ð¸Ð²ÐµÑ‚".
///
/// Strings containing code points above U+00FF cannot be Mojibake and are
/// returned unchanged, as are byte sequences that do not form valid UTF-8.
///
/// ```
/// use chatstats::parsing::messenger::fix_mojibake_encoding;
///
/// assert_eq!(fix_mojibake_encoding("Hello"), "Hello");
/// assert_eq!(fix_mojibake_encoding("\u{f0}\u{9f}\u{98}\u{86}"), "😆");
/// assert_eq!(fix_mojibake_encoding("😆"), "😆");
/// ```
pub fn fix_mojibake_encoding(s: &str) -> String {
    if s.chars().any(|c| u32::from(c) > 0xFF) {
        return s.to_string();
    }
    let bytes: Vec<u8> = s.chars().map(|c| c as u8).collect();
    String::from_utf8(bytes).unwrap_or_else(|_| s.to_string())
}

fn repair(s: &str, fix_encoding: bool) -> String {
    if fix_encoding {
        fix_mojibake_encoding(s)
    } else {
        s.to_string()
    }
}

impl MessengerExport {
    /// Participant names, repaired if requested.
    pub fn participant_names(&self, fix_encoding: bool) -> Vec<String> {
        self.participants
            .iter()
            .map(|p| repair(&p.name, fix_encoding))
            .collect()
    }

    /// The title, if present and non-empty.
    pub fn title(&self, fix_encoding: bool) -> Option<String> {
        self.title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .map(|t| repair(t, fix_encoding))
    }
}

/// Converts a raw message into a [`Message`].
///
/// Unlike text-oriented exporters, nothing is dropped here: photos, calls and
/// stickers without text still count as messages.
pub fn parse_messenger_message(msg: &MessengerRawMessage, fix_encoding: bool) -> Message {
    Message {
        sender: repair(&msg.sender_name, fix_encoding),
        timestamp_ms: msg.timestamp_ms,
        content: msg.content.as_deref().map(|c| repair(c, fix_encoding)),
        reactions: msg
            .reactions
            .iter()
            .map(|r| {
                Reaction::new(
                    repair(&r.reaction, fix_encoding),
                    repair(&r.actor, fix_encoding),
                )
            })
            .collect(),
        call_duration: msg.call_duration,
        sticker: msg.sticker.as_ref().and_then(|s| s.uri.clone()),
    }
}
