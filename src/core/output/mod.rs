//! Report writers.
//!
//! - [`tsv`] - tab-separated tables, one per report file
//! - [`chart`] - chart descriptions, rendered to PNG with the `charts` feature
//!
//! # Example
//!
//! ```rust
//! # fn main() -> chatstats::Result<()> {
//! use chatstats::analysis::largest_chats;
//! use chatstats::config::AnalysisConfig;
//! use chatstats::core::output::to_tsv;
//! use chatstats::{Conversation, Message};
//!
//! let chat = Conversation::new("alice_1")
//!     .with_title("Alice")
//!     .with_messages(vec![Message::new("Alice", 0).with_content("hi")]);
//! let config = AnalysisConfig::new().with_min_messages(0);
//!
//! let tsv = to_tsv(&largest_chats(&[chat], &config))?;
//! assert!(tsv.starts_with("rank\ttitle\tfolder\tcount\tchars\n1\tAlice"));
//! # Ok(())
//! # }
//! ```

pub mod chart;
pub mod tsv;

pub use tsv::{PeopleTable, RateTable, ReactDirection, ReactsTable, TsvTable, to_tsv, write_tsv};
