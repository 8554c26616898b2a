//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - CLI argument structure (for use with clap)
//! - [`AnalysisArg`] - Which analysis to run
//! - [`SortBy`] - Ranking key for largest chats
//!
//! Flags left unset keep the value from `--config` (or the built-in
//! default), so a config file can hold the usual settings and the command
//! line only the changes.

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::{AnalysisConfig, SortKey, parse_date};
use crate::error::Result;
use crate::report::Analysis;

/// Statistics, TSV tables and charts for a Messenger inbox export.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatstats")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    chatstats
    chatstats largest -f ~/facebook/messages/inbox -m 100
    chatstats over-time --interval-days 7 -d 2020-01-01 -e 2020-12-31
    chatstats reacts --filter alice -o reports
    chatstats sizes --no-charts")]
pub struct Args {
    /// Analysis to run
    #[arg(value_enum, default_value = "all")]
    pub analysis: AnalysisArg,

    /// Inbox directory (default: ./messages/inbox)
    #[arg(short, long, value_name = "FOLDER")]
    pub folder: Option<PathBuf>,

    /// Only count messages on or after this date (YYYY-MM-DD)
    #[arg(short = 'd', long = "start-date", value_name = "DATE")]
    pub start_date: Option<String>,

    /// Only count messages on or before this date (YYYY-MM-DD)
    #[arg(short = 'e', long = "end-date", value_name = "DATE")]
    pub end_date: Option<String>,

    /// Skip conversations with fewer messages [default: 500]
    #[arg(short = 'm', long = "min", value_name = "N")]
    pub min_messages: Option<usize>,

    /// Ranking key for largest chats [default: count]
    #[arg(short = 's', long = "sort", value_enum)]
    pub sort_by: Option<SortBy>,

    /// Output directory [default: output]
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Only load conversation folders containing this text (repeatable)
    #[arg(long = "filter", value_name = "SUBSTR")]
    pub filters: Vec<String>,

    /// Conversations shown in the largest-chats chart [default: 10]
    #[arg(long = "top", value_name = "N")]
    pub top_n: Option<usize>,

    /// Conversations listed per interval over time [default: 5]
    #[arg(long = "top-per-interval", value_name = "N")]
    pub top_per_interval: Option<usize>,

    /// Interval length in days for the over-time analysis [default: 30]
    #[arg(long, value_name = "DAYS")]
    pub interval_days: Option<u32>,

    /// JSON configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write TSV tables only
    #[arg(long)]
    pub no_charts: bool,

    /// Keep text exactly as stored instead of repairing its encoding
    #[arg(long)]
    pub raw_encoding: bool,

    /// Abort on the first unreadable conversation instead of skipping it
    #[arg(long)]
    pub strict: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Builds the analysis configuration: the `--config` file (or defaults)
    /// with every given flag applied on top.
    pub fn to_config(&self) -> Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::from_json_file(path)?,
            None => AnalysisConfig::default(),
        };

        if let Some(date) = &self.start_date {
            config.start_date = Some(parse_date(date)?);
        }
        if let Some(date) = &self.end_date {
            config.end_date = Some(parse_date(date)?);
        }
        if let Some(min) = self.min_messages {
            config.min_messages = min;
        }
        if let Some(sort_by) = self.sort_by {
            config.sort_by = sort_by.into();
        }
        if let Some(dir) = &self.output {
            config.output_dir.clone_from(dir);
        }
        if let Some(n) = self.top_n {
            config.top_n = n;
        }
        if let Some(n) = self.top_per_interval {
            config.top_per_interval = n;
        }
        if let Some(days) = self.interval_days {
            config.interval_days = days;
        }
        if self.no_charts {
            config.charts = false;
        }
        if self.raw_encoding {
            config.inbox.fix_encoding = false;
        }
        if self.strict {
            config.inbox.skip_invalid = false;
        }
        config.inbox.filters.extend(self.filters.iter().cloned());

        config.validate()?;
        Ok(config)
    }

    /// Default log directive for the `-v`/`-q` flags.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }
}

/// Which analysis to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnalysisArg {
    /// Every analysis below
    #[default]
    All,

    /// Conversations ranked by size
    #[value(alias = "largest-chats")]
    Largest,

    /// Busiest conversations per interval
    #[value(alias = "largest-chats-over-time")]
    OverTime,

    /// Reactions, messages and characters per participant
    #[value(alias = "conversation-stats")]
    Reacts,

    /// Message rate over each conversation's lifetime
    TimeSeries,

    /// Histogram of conversation sizes
    #[value(alias = "conversation-sizes")]
    Sizes,
}

impl From<AnalysisArg> for Analysis {
    fn from(arg: AnalysisArg) -> Analysis {
        match arg {
            AnalysisArg::All => Analysis::All,
            AnalysisArg::Largest => Analysis::Largest,
            AnalysisArg::OverTime => Analysis::OverTime,
            AnalysisArg::Reacts => Analysis::Reacts,
            AnalysisArg::TimeSeries => Analysis::TimeSeries,
            AnalysisArg::Sizes => Analysis::Sizes,
        }
    }
}

/// Ranking key for largest chats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// Number of messages
    #[default]
    Count,

    /// Number of text characters
    #[value(alias = "characters")]
    Chars,
}

impl From<SortBy> for SortKey {
    fn from(sort_by: SortBy) -> SortKey {
        match sort_by {
            SortBy::Count => SortKey::Count,
            SortBy::Chars => SortKey::Chars,
        }
    }
}
