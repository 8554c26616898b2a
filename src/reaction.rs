//! Named reaction categories.
//!
//! Messenger exports store reactions as raw emoji. The statistics only track
//! the seven classic reactions; everything else is folded into
//! [`ReactionKind::Other`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::parsing::messenger::fix_mojibake_encoding;

/// A reaction category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactionKind {
    ThumbsUp,
    ThumbsDown,
    Laughing,
    HeartEyes,
    Angry,
    Cry,
    Wow,
    Other,
}

impl ReactionKind {
    /// The seven tracked reactions, in report column order.
    pub const TRACKED: [ReactionKind; 7] = [
        ReactionKind::ThumbsUp,
        ReactionKind::ThumbsDown,
        ReactionKind::Laughing,
        ReactionKind::HeartEyes,
        ReactionKind::Angry,
        ReactionKind::Cry,
        ReactionKind::Wow,
    ];

    /// Maps an emoji to its category.
    ///
    /// Accepts both correctly decoded emoji and the mojibake form found in
    /// unrepaired exports.
    ///
    /// ```
    /// use chatstats::ReactionKind;
    ///
    /// assert_eq!(ReactionKind::from_emoji("👍"), ReactionKind::ThumbsUp);
    /// assert_eq!(ReactionKind::from_emoji("\u{f0}\u{9f}\u{91}\u{8d}"), ReactionKind::ThumbsUp);
    /// assert_eq!(ReactionKind::from_emoji("🎉"), ReactionKind::Other);
    /// ```
    pub fn from_emoji(emoji: &str) -> Self {
        match Self::from_decoded(emoji) {
            ReactionKind::Other => Self::from_decoded(&fix_mojibake_encoding(emoji)),
            kind => kind,
        }
    }

    fn from_decoded(emoji: &str) -> Self {
        // Strip variation selectors so "😮\u{fe0f}" still matches
        match emoji.trim_end_matches('\u{fe0f}') {
            "👍" => ReactionKind::ThumbsUp,
            "👎" => ReactionKind::ThumbsDown,
            "😆" => ReactionKind::Laughing,
            "😍" => ReactionKind::HeartEyes,
            "😠" => ReactionKind::Angry,
            "😢" => ReactionKind::Cry,
            "😮" => ReactionKind::Wow,
            _ => ReactionKind::Other,
        }
    }

    /// Human-readable label used in chart legends.
    pub fn label(&self) -> &'static str {
        match self {
            ReactionKind::ThumbsUp => "Thumbs Up",
            ReactionKind::ThumbsDown => "Thumbs Down",
            ReactionKind::Laughing => "Laughing",
            ReactionKind::HeartEyes => "Heart Eyes",
            ReactionKind::Angry => "Angry",
            ReactionKind::Cry => "Cry",
            ReactionKind::Wow => "Wow",
            ReactionKind::Other => "Other",
        }
    }

    /// Column name used in TSV headers.
    pub fn column(&self) -> &'static str {
        match self {
            ReactionKind::ThumbsUp => "thumbs_up",
            ReactionKind::ThumbsDown => "thumbs_down",
            ReactionKind::Laughing => "laughing",
            ReactionKind::HeartEyes => "heart_eyes",
            ReactionKind::Angry => "angry",
            ReactionKind::Cry => "cry",
            ReactionKind::Wow => "wow",
            ReactionKind::Other => "other",
        }
    }
}

impl fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
