//! Runs analyses and writes their reports to disk.
//!
//! Each analysis owns one sub-directory of the output directory, which is
//! removed and recreated on every run:
//!
//! | Analysis | Directory |
//! |---|---|
//! | [`Analysis::Largest`] | `largest_chats/` |
//! | [`Analysis::OverTime`] | `largest_chats_over_time/` |
//! | [`Analysis::Reacts`] | `conversation_stats/<folder>/` |
//! | [`Analysis::TimeSeries`] | `time_series/<folder>/` |
//! | [`Analysis::Sizes`] | `conversation_sizes/` |
//!
//! TSV tables are always written. Charts are best effort: a chart that fails
//! to render is logged and counted, and the run continues.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::Conversation;
use crate::analysis::{
    conversation_sizes, largest_chats, largest_chats_over_time, reacts_stats, time_series,
};
use crate::config::AnalysisConfig;
use crate::core::output::chart::{
    BarChart, Chart, GroupedBarChart, HistogramChart, LineChart, charts_available, render,
};
use crate::core::output::{PeopleTable, RateTable, ReactDirection, ReactsTable, TsvTable, write_tsv};
use crate::error::Result;
use crate::inbox::InboxReader;

/// One of the available analyses, or all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Analysis {
    #[default]
    All,
    Largest,
    OverTime,
    Reacts,
    TimeSeries,
    Sizes,
}

impl Analysis {
    /// Every individual analysis, in run order.
    pub const EACH: [Analysis; 5] = [
        Analysis::Largest,
        Analysis::OverTime,
        Analysis::Reacts,
        Analysis::TimeSeries,
        Analysis::Sizes,
    ];

    /// The individual analyses this selection runs.
    pub fn expand(self) -> Vec<Analysis> {
        match self {
            Analysis::All => Self::EACH.to_vec(),
            single => vec![single],
        }
    }

    /// Output sub-directory name.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Analysis::All => "",
            Analysis::Largest => "largest_chats",
            Analysis::OverTime => "largest_chats_over_time",
            Analysis::Reacts => "conversation_stats",
            Analysis::TimeSeries => "time_series",
            Analysis::Sizes => "conversation_sizes",
        }
    }
}

impl fmt::Display for Analysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Analysis::All => write!(f, "all"),
            Analysis::Largest => write!(f, "largest"),
            Analysis::OverTime => write!(f, "over-time"),
            Analysis::Reacts => write!(f, "reacts"),
            Analysis::TimeSeries => write!(f, "time-series"),
            Analysis::Sizes => write!(f, "sizes"),
        }
    }
}

impl FromStr for Analysis {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "all" => Ok(Analysis::All),
            "largest" | "largest-chats" => Ok(Analysis::Largest),
            "over-time" | "largest-chats-over-time" => Ok(Analysis::OverTime),
            "reacts" | "conversation-stats" => Ok(Analysis::Reacts),
            "time-series" => Ok(Analysis::TimeSeries),
            "sizes" | "conversation-sizes" => Ok(Analysis::Sizes),
            _ => Err(format!(
                "Unknown analysis: '{}'. Expected one of: all, largest, over-time, reacts, time-series, sizes",
                s
            )),
        }
    }
}

/// Files produced by one analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisOutput {
    pub analysis: Analysis,
    pub dir: PathBuf,
    pub tables: Vec<PathBuf>,
    pub charts: Vec<PathBuf>,
    /// Charts that failed to render.
    pub chart_failures: usize,
}

/// Outcome of a full run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub conversations: usize,
    /// Folders that could not be loaded.
    pub skipped: Vec<String>,
    pub total_messages: usize,
    /// Largest conversations as `(title, key value)`, when that analysis ran.
    pub top_chats: Vec<(String, usize)>,
    pub outputs: Vec<AnalysisOutput>,
}

impl RunSummary {
    /// Number of files written across all analyses.
    pub fn files_written(&self) -> usize {
        self.outputs
            .iter()
            .map(|o| o.tables.len() + o.charts.len())
            .sum()
    }

    /// Number of charts that failed to render.
    pub fn chart_failures(&self) -> usize {
        self.outputs.iter().map(|o| o.chart_failures).sum()
    }
}

/// Removes `dir` if present and creates it empty.
pub fn prepare_output_directory(dir: &Path) -> Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir)?;
    }
    fs::create_dir_all(dir)?;
    Ok(())
}

/// Directory name for a conversation folder inside a per-conversation report.
fn conversation_dir_name(folder: &str) -> String {
    let name: String = folder
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    match name.as_str() {
        "" | "." | ".." => "_".to_string(),
        _ => name,
    }
}

/// Loads the inbox at `inbox_dir` and runs `analysis` on it.
pub fn run(analysis: Analysis, inbox_dir: &Path, config: &AnalysisConfig) -> Result<RunSummary> {
    config.validate()?;

    let reader = InboxReader::new(inbox_dir).with_config(config.inbox.clone());
    let inbox = reader.load_all()?;
    info!(
        inbox = %inbox_dir.display(),
        conversations = inbox.conversations.len(),
        skipped = inbox.skipped.len(),
        "inbox loaded"
    );

    let mut summary = run_on(analysis, &inbox.conversations, config)?;
    summary.skipped = inbox.skipped.into_iter().map(|s| s.folder).collect();
    Ok(summary)
}

/// Runs `analysis` on already loaded conversations.
pub fn run_on(
    analysis: Analysis,
    conversations: &[Conversation],
    config: &AnalysisConfig,
) -> Result<RunSummary> {
    config.validate()?;

    let mut summary = RunSummary {
        conversations: conversations.len(),
        total_messages: conversations.iter().map(Conversation::message_count).sum(),
        ..RunSummary::default()
    };

    for single in analysis.expand() {
        let dir = config.output_dir.join(single.dir_name());
        prepare_output_directory(&dir)?;

        let mut writer = ReportWriter::new(single, dir, config.charts);
        match single {
            Analysis::Largest => {
                summary.top_chats = write_largest(&mut writer, conversations, config)?;
            }
            Analysis::OverTime => write_over_time(&mut writer, conversations, config)?,
            Analysis::Reacts => write_reacts(&mut writer, conversations, config)?,
            Analysis::TimeSeries => write_time_series(&mut writer, conversations, config)?,
            Analysis::Sizes => write_sizes(&mut writer, conversations, config)?,
            Analysis::All => {}
        }

        info!(
            analysis = %single,
            tables = writer.output.tables.len(),
            charts = writer.output.charts.len(),
            "analysis written"
        );
        summary.outputs.push(writer.output);
    }

    Ok(summary)
}

/// Collects the files of one analysis.
struct ReportWriter {
    output: AnalysisOutput,
    charts: bool,
}

impl ReportWriter {
    fn new(analysis: Analysis, dir: PathBuf, charts: bool) -> Self {
        if charts && !charts_available() {
            debug!("chart rendering not compiled in, writing tables only");
        }
        Self {
            output: AnalysisOutput {
                analysis,
                dir,
                ..AnalysisOutput::default()
            },
            charts: charts && charts_available(),
        }
    }

    /// Creates `name` under the analysis directory.
    fn subdir(&self, name: &str) -> Result<PathBuf> {
        let dir = self.output.dir.join(conversation_dir_name(name));
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    fn table<T: TsvTable + ?Sized>(&mut self, table: &T, path: PathBuf) -> Result<()> {
        write_tsv(table, &path)?;
        self.output.tables.push(path);
        Ok(())
    }

    fn chart(&mut self, chart: impl Into<Chart>, path: PathBuf) {
        if !self.charts {
            return;
        }
        match render(&chart.into(), &path) {
            Ok(()) => self.output.charts.push(path),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "chart rendering failed");
                self.output.chart_failures += 1;
            }
        }
    }
}

fn write_largest(
    writer: &mut ReportWriter,
    conversations: &[Conversation],
    config: &AnalysisConfig,
) -> Result<Vec<(String, usize)>> {
    let largest = largest_chats(conversations, config);
    let dir = writer.output.dir.clone();

    writer.table(&largest, dir.join("data.tsv"))?;
    writer.table(&PeopleTable(&largest), dir.join("people.tsv"))?;
    writer.chart(BarChart::top_chats(&largest, config.top_n), dir.join("top_chats.png"));

    Ok(largest
        .top(config.top_n)
        .iter()
        .map(|s| (s.title.clone(), s.key(largest.sort_by)))
        .collect())
}

fn write_over_time(
    writer: &mut ReportWriter,
    conversations: &[Conversation],
    config: &AnalysisConfig,
) -> Result<()> {
    let over_time = largest_chats_over_time(conversations, config);
    let dir = writer.output.dir.clone();

    writer.table(&over_time, dir.join("data.tsv"))?;
    writer.chart(LineChart::over_time_totals(&over_time), dir.join("total_messages.png"));
    Ok(())
}

fn write_reacts(
    writer: &mut ReportWriter,
    conversations: &[Conversation],
    config: &AnalysisConfig,
) -> Result<()> {
    for reacts in reacts_stats(conversations, config) {
        let dir = writer.subdir(&reacts.folder)?;
        for direction in [ReactDirection::Received, ReactDirection::Given] {
            let table = ReactsTable {
                reacts: &reacts,
                direction,
            };
            let stem = direction.file_stem();
            writer.table(&table, dir.join(format!("{stem}.tsv")))?;
            writer.chart(
                GroupedBarChart::reacts(&reacts, direction),
                dir.join(format!("{stem}.png")),
            );
        }
    }
    Ok(())
}

fn write_time_series(
    writer: &mut ReportWriter,
    conversations: &[Conversation],
    config: &AnalysisConfig,
) -> Result<()> {
    for series in time_series(conversations, config) {
        let dir = writer.subdir(&series.folder)?;
        writer.table(&series, dir.join("data.tsv"))?;
        writer.table(&RateTable(&series), dir.join("rate.tsv"))?;
        writer.chart(
            LineChart::message_rate(&series),
            dir.join("messages_rate_over_time.png"),
        );
        writer.chart(
            LineChart::total_messages(&series),
            dir.join("total_messages_over_time.png"),
        );
    }
    Ok(())
}

fn write_sizes(
    writer: &mut ReportWriter,
    conversations: &[Conversation],
    config: &AnalysisConfig,
) -> Result<()> {
    let sizes = conversation_sizes(conversations, config);
    let dir = writer.output.dir.clone();

    writer.table(&sizes, dir.join("data.tsv"))?;
    writer.chart(HistogramChart::sizes(&sizes), dir.join("histogram.png"));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Message, Reaction};
    use tempfile::tempdir;

    fn chat(folder: &str, n: i64) -> Conversation {
        Conversation::new(folder)
            .with_participants(["A", "B"])
            .with_messages(
                (0..n)
                    .map(|i| {
                        Message::new(if i % 2 == 0 { "A" } else { "B" }, i * 3_600_000)
                            .with_content("msg")
                            .with_reaction(Reaction::new("👍", "A"))
                    })
                    .collect(),
            )
    }

    #[test]
    fn test_analysis_parse_and_display() {
        for analysis in Analysis::EACH {
            assert_eq!(analysis.to_string().parse::<Analysis>(), Ok(analysis));
        }
        assert_eq!("time_series".parse::<Analysis>(), Ok(Analysis::TimeSeries));
        assert!("bogus".parse::<Analysis>().is_err());
        assert_eq!(Analysis::All.expand().len(), 5);
        assert_eq!(Analysis::Sizes.expand(), vec![Analysis::Sizes]);
    }

    #[test]
    fn test_conversation_dir_name() {
        assert_eq!(conversation_dir_name("alice_1"), "alice_1");
        assert_eq!(conversation_dir_name("a/b"), "a_b");
        assert_eq!(conversation_dir_name(""), "_");
        assert_eq!(conversation_dir_name(".."), "_");
    }

    #[test]
    fn test_prepare_output_directory_clears() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("largest_chats");
        fs::create_dir_all(&target).unwrap();
        fs::write(target.join("stale.tsv"), "old").unwrap();

        prepare_output_directory(&target).unwrap();
        assert!(target.is_dir());
        assert!(!target.join("stale.tsv").exists());
    }

    #[test]
    fn test_run_all_writes_tables() {
        let dir = tempdir().unwrap();
        let config = AnalysisConfig::new()
            .with_min_messages(3)
            .with_charts(false)
            .with_output_dir(dir.path());
        let convs = vec![chat("big", 10), chat("small", 2)];

        let summary = run_on(Analysis::All, &convs, &config).unwrap();
        let out = dir.path();

        assert_eq!(summary.outputs.len(), 5);
        assert_eq!(summary.total_messages, 12);
        assert_eq!(summary.top_chats, vec![("big".to_string(), 10)]);
        assert!(out.join("largest_chats/data.tsv").is_file());
        assert!(out.join("largest_chats/people.tsv").is_file());
        assert!(out.join("largest_chats_over_time/data.tsv").is_file());
        assert!(out.join("conversation_stats/big/reacts_received.tsv").is_file());
        assert!(out.join("conversation_stats/big/reacts_given.tsv").is_file());
        assert!(!out.join("conversation_stats/small").exists());
        assert!(out.join("time_series/big/data.tsv").is_file());
        assert!(out.join("time_series/big/rate.tsv").is_file());
        assert!(out.join("conversation_sizes/data.tsv").is_file());
        assert_eq!(summary.chart_failures(), 0);
        assert!(summary.outputs.iter().all(|o| o.charts.is_empty()));
    }

    #[test]
    fn test_single_analysis_leaves_others() {
        let dir = tempdir().unwrap();
        let config = AnalysisConfig::new()
            .with_min_messages(0)
            .with_charts(false)
            .with_output_dir(dir.path());

        let summary = run_on(Analysis::Sizes, &[chat("a", 4)], &config).unwrap();
        assert_eq!(summary.outputs.len(), 1);
        assert_eq!(summary.files_written(), 1);
        assert!(dir.path().join("conversation_sizes/data.tsv").is_file());
        assert!(!dir.path().join("largest_chats").exists());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = AnalysisConfig::new().with_interval_days(0);
        let err = run_on(Analysis::OverTime, &[], &config).unwrap_err();
        assert!(err.is_invalid_config());
    }
}
