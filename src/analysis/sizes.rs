//! Distribution of conversation sizes.

use serde::Serialize;

use crate::Conversation;
use crate::analysis::bucket::{Histogram, histogram};
use crate::config::{AnalysisConfig, SortKey};

/// Number of histogram bins.
pub const SIZE_BINS: usize = 10;

/// Message and character count of one conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationSize {
    pub folder: String,
    pub title: String,
    pub count: usize,
    pub chars: usize,
}

impl ConversationSize {
    /// Size measured by `sort_by`.
    pub fn key(&self, sort_by: SortKey) -> usize {
        match sort_by {
            SortKey::Count => self.count,
            SortKey::Chars => self.chars,
        }
    }
}

/// Sizes of every conversation plus their histogram.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationSizes {
    /// Largest first by `sort_by`, ties by title.
    pub sizes: Vec<ConversationSize>,
    /// Histogram of the `sort_by` sizes.
    pub histogram: Histogram,
    pub sort_by: SortKey,
}

/// Measures each conversation inside the date window and bins the sizes
/// into [`SIZE_BINS`] equal-width bins, by messages or characters as
/// `config.sort_by` selects.
///
/// Conversations without messages in the window are omitted. The minimum size
/// threshold is not applied, so the histogram shows the whole distribution.
pub fn conversation_sizes(conversations: &[Conversation], config: &AnalysisConfig) -> ConversationSizes {
    let filter = config.date_filter();
    let sort_by = config.sort_by;
    let mut sizes: Vec<ConversationSize> = conversations
        .iter()
        .map(|c| {
            let (count, chars) = c
                .messages
                .iter()
                .filter(|m| filter.matches(m))
                .fold((0, 0), |(n, chars), m| (n + 1, chars + m.char_count()));
            ConversationSize {
                folder: c.folder.clone(),
                title: c.display_title().to_string(),
                count,
                chars,
            }
        })
        .filter(|s| s.count > 0)
        .collect();
    sizes.sort_by(|a, b| {
        b.key(sort_by)
            .cmp(&a.key(sort_by))
            .then_with(|| a.title.cmp(&b.title))
    });

    let values: Vec<i64> = sizes
        .iter()
        .map(|s| i64::try_from(s.key(sort_by)).unwrap_or(i64::MAX))
        .collect();

    ConversationSizes {
        histogram: histogram(&values, SIZE_BINS),
        sizes,
        sort_by,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Message;

    fn conv(folder: &str, n: i64) -> Conversation {
        Conversation::new(folder).with_messages((0..n).map(|t| Message::new("A", t)).collect())
    }

    fn wordy(folder: &str, n: i64, text: &str) -> Conversation {
        Conversation::new(folder)
            .with_messages((0..n).map(|t| Message::new("A", t).with_content(text)).collect())
    }

    #[test]
    fn test_sizes_sorted() {
        let convs = vec![conv("a", 3), conv("b", 10), conv("c", 1)];
        let result = conversation_sizes(&convs, &AnalysisConfig::new());

        let order: Vec<(&str, usize)> = result.sizes.iter().map(|s| (s.folder.as_str(), s.count)).collect();
        assert_eq!(order, vec![("b", 10), ("a", 3), ("c", 1)]);
    }

    #[test]
    fn test_histogram_covers_every_conversation() {
        let convs: Vec<Conversation> = (1..=25).map(|n| conv(&format!("c{n}"), n)).collect();
        let result = conversation_sizes(&convs, &AnalysisConfig::new());

        assert_eq!(result.histogram.counts.len(), SIZE_BINS);
        assert_eq!(result.histogram.total(), 25);
        assert_eq!(result.histogram.edges.first(), Some(&1.0));
        assert_eq!(result.histogram.edges.last(), Some(&25.0));
    }

    #[test]
    fn test_empty_conversations_omitted() {
        let result = conversation_sizes(&[conv("empty", 0), conv("one", 1)], &AnalysisConfig::new());
        assert_eq!(result.sizes.len(), 1);
        assert_eq!(result.histogram.total(), 1);
    }

    #[test]
    fn test_sizes_by_chars() {
        // Fewer messages but more text
        let convs = vec![wordy("chatty", 10, "ok"), wordy("essays", 2, &"x".repeat(100))];
        let by_count = conversation_sizes(&convs, &AnalysisConfig::new());
        let by_chars = conversation_sizes(&convs, &AnalysisConfig::new().with_sort_by(SortKey::Chars));

        assert_eq!(by_count.sizes[0].folder, "chatty");
        assert_eq!(by_chars.sizes[0].folder, "essays");
        assert_eq!(by_chars.sizes[0].chars, 200);
        assert_eq!(by_chars.histogram.edges.first(), Some(&20.0));
        assert_eq!(by_chars.histogram.edges.last(), Some(&200.0));
        assert_eq!(by_chars.sort_by, SortKey::Chars);
    }
}
