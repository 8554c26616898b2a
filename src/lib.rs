//! # Chatstats
//!
//! A Rust library for descriptive statistics over Messenger-style chat
//! export archives: one folder per conversation, each holding
//! `message_1.json`, `message_2.json`, … with participants, messages,
//! reactions and timestamps.
//!
//! ## Overview
//!
//! Chatstats loads an inbox, then computes:
//! - **Largest chats** — conversations ranked by message or character count
//! - **Largest chats over time** — the busiest conversations per interval
//! - **Conversation stats** — reactions received/given, messages and
//!   characters per participant
//! - **Time series** — message rate over a conversation's lifetime
//! - **Conversation sizes** — a histogram of message counts
//!
//! Every report is written as TSV, and as a PNG chart with the `charts`
//! feature.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chatstats::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let inbox = InboxReader::new("messages/inbox").load_all()?;
//!     let config = AnalysisConfig::new().with_min_messages(100);
//!
//!     let largest = largest_chats(&inbox.conversations, &config);
//!     for chat in largest.top(10) {
//!         println!("{}: {}", chat.title, chat.count);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Or run everything and write reports under `output/`:
//!
//! ```rust,no_run
//! use chatstats::prelude::*;
//! use std::path::Path;
//!
//! let summary = run(Analysis::All, Path::new("messages/inbox"), &AnalysisConfig::new())?;
//! println!("{} files written", summary.files_written());
//! # Ok::<(), chatstats::ChatstatsError>(())
//! ```
//!
//! ## Module Structure
//!
//! - [`inbox`] — folder discovery and loading ([`InboxReader`](inbox::InboxReader))
//! - [`parsing`] — raw export types and encoding repair
//! - [`config`] — [`AnalysisConfig`](config::AnalysisConfig), [`InboxConfig`](config::InboxConfig)
//! - [`core`] — date filtering and TSV/chart writers
//! - [`analysis`] — the statistics themselves
//! - [`report`] — runs analyses into an output directory
//! - [`cli`] — CLI types (feature `cli`)
//! - [`error`] — Unified error types ([`ChatstatsError`], [`Result`])
//! - [`prelude`] — Convenient re-exports

pub mod analysis;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod conversation;
pub mod core;
pub mod error;
pub mod inbox;
pub mod message;
pub mod parsing;
pub mod reaction;
pub mod report;

// Re-export the main types at the crate root for convenience
pub use conversation::Conversation;
pub use error::{ChatstatsError, Result};
pub use message::{Message, Reaction};
pub use reaction::ReactionKind;

/// Convenient re-exports for common usage.
///
/// Import everything you need with a single line:
///
/// ```rust
/// use chatstats::prelude::*;
/// ```
pub mod prelude {
    // Data types
    pub use crate::{Conversation, Message, Reaction, ReactionKind};

    // Error types
    pub use crate::error::{ChatstatsError, Result};

    // Configuration
    pub use crate::config::{AnalysisConfig, InboxConfig, SortKey};

    // Loading
    pub use crate::inbox::{Inbox, InboxReader};

    // Filtering
    pub use crate::core::filter::{FilterConfig, apply_filters};

    // Analyses
    pub use crate::analysis::{
        conversation_reacts, conversation_sizes, largest_chats, largest_chats_over_time,
        reacts_stats, time_series,
    };

    // Output
    pub use crate::core::output::{TsvTable, to_tsv, write_tsv};
    pub use crate::report::{Analysis, RunSummary, run, run_on};
}
