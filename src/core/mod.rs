//! Core processing shared by every analysis.
//!
//! This module contains:
//! - [`filter`] - Message filtering by date range
//! - [`output`] - TSV and chart writers

pub mod filter;
pub mod output;

pub use filter::{FilterConfig, apply_filters, filter_conversation};
pub use output::{TsvTable, to_tsv, write_tsv};
