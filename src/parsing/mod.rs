//! Export format parsing.
//!
//! Raw serde types for the on-disk export and their conversion into the
//! crate's [`Message`](crate::Message) type.

pub mod messenger;

pub use messenger::{MessengerExport, fix_mojibake_encoding, parse_messenger_message};
