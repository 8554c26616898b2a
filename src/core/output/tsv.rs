//! TSV table writers.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use chrono::DateTime;

use crate::analysis::{
    ChatsOverTime, ConversationReacts, ConversationSizes, LargestChats, PersonReacts, TimeSeries,
};
use crate::analysis::over_time::TOTAL_TITLE;
use crate::error::{ChatstatsError, Result};
use crate::reaction::ReactionKind;

/// A report that can be rendered as a tab-separated table.
pub trait TsvTable {
    /// Column names.
    fn header(&self) -> Vec<String>;

    /// Data rows, each as long as the header.
    fn rows(&self) -> Vec<Vec<String>>;
}

/// Formats a millisecond timestamp as `YYYY-MM-DD` (UTC).
pub fn format_date(timestamp_ms: i64) -> String {
    DateTime::from_timestamp_millis(timestamp_ms)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn write_records<T, W>(table: &T, writer: W) -> Result<W>
where
    T: TsvTable + ?Sized,
    W: Write,
{
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(writer);

    writer.write_record(table.header())?;
    for row in table.rows() {
        writer.write_record(&row)?;
    }

    writer.flush()?;
    writer
        .into_inner()
        .map_err(|e| ChatstatsError::Io(e.into_error()))
}

/// Writes `table` to `path`, replacing any existing file.
pub fn write_tsv<T: TsvTable + ?Sized>(table: &T, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    write_records(table, file)?;
    Ok(())
}

/// Renders `table` to a string.
pub fn to_tsv<T: TsvTable + ?Sized>(table: &T) -> Result<String> {
    let bytes = write_records(table, Vec::new())?;
    String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
}

fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| (*s).to_string()).collect()
}

/// `largest_chats/data.tsv`
impl TsvTable for LargestChats {
    fn header(&self) -> Vec<String> {
        columns(&["rank", "title", "folder", "count", "chars"])
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.conversations
            .iter()
            .enumerate()
            .map(|(i, s)| {
                vec![
                    (i + 1).to_string(),
                    s.title.clone(),
                    s.folder.clone(),
                    s.count.to_string(),
                    s.chars.to_string(),
                ]
            })
            .collect()
    }
}

/// Per-person breakdown of the ranked conversations (`largest_chats/people.tsv`).
pub struct PeopleTable<'a>(pub &'a LargestChats);

impl TsvTable for PeopleTable<'_> {
    fn header(&self) -> Vec<String> {
        columns(&["title", "person", "messages", "chars"])
    }

    fn rows(&self) -> Vec<Vec<String>> {
        let mut rows = Vec::new();
        for summary in &self.0.conversations {
            let mut people: Vec<_> = summary.people.iter().collect();
            people.sort_by(|a, b| b.1.messages.cmp(&a.1.messages).then_with(|| a.0.cmp(b.0)));
            for (name, stats) in people {
                rows.push(vec![
                    summary.title.clone(),
                    name.clone(),
                    stats.messages.to_string(),
                    stats.chars.to_string(),
                ]);
            }
        }
        rows
    }
}

/// `largest_chats_over_time/data.tsv`, one `Total` row (rank 0) followed by
/// the ranked conversations for every interval.
impl TsvTable for ChatsOverTime {
    fn header(&self) -> Vec<String> {
        columns(&["interval_start_ms", "lower", "upper", "rank", "title", "count"])
    }

    fn rows(&self) -> Vec<Vec<String>> {
        let mut rows = Vec::new();
        for interval in &self.intervals {
            let start = interval.start_ms.to_string();
            let lower = format_date(interval.start_ms);
            let upper = interval.end_ms.map(format_date).unwrap_or_default();

            rows.push(vec![
                start.clone(),
                lower.clone(),
                upper.clone(),
                "0".to_string(),
                TOTAL_TITLE.to_string(),
                interval.total.to_string(),
            ]);
            for (i, chat) in interval.top.iter().enumerate() {
                rows.push(vec![
                    start.clone(),
                    lower.clone(),
                    upper.clone(),
                    (i + 1).to_string(),
                    chat.title.clone(),
                    chat.count.to_string(),
                ]);
            }
        }
        rows
    }
}

/// Which side of the reaction tallies a [`ReactsTable`] shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactDirection {
    Received,
    Given,
}

impl ReactDirection {
    /// File stem used for this direction's outputs.
    pub fn file_stem(&self) -> &'static str {
        match self {
            ReactDirection::Received => "reacts_received",
            ReactDirection::Given => "reacts_given",
        }
    }

    /// Chart title.
    pub fn title(&self) -> &'static str {
        match self {
            ReactDirection::Received => "Reacts Received",
            ReactDirection::Given => "Reacts Given",
        }
    }

    /// Count of `kind` for `person` in this direction.
    pub fn count(&self, person: &PersonReacts, kind: ReactionKind) -> usize {
        match self {
            ReactDirection::Received => person.received_count(kind),
            ReactDirection::Given => person.given_count(kind),
        }
    }
}

/// `conversation_stats/<folder>/reacts_{received,given}.tsv`
pub struct ReactsTable<'a> {
    pub reacts: &'a ConversationReacts,
    pub direction: ReactDirection,
}

impl<'a> ReactsTable<'a> {
    pub fn received(reacts: &'a ConversationReacts) -> Self {
        Self {
            reacts,
            direction: ReactDirection::Received,
        }
    }

    pub fn given(reacts: &'a ConversationReacts) -> Self {
        Self {
            reacts,
            direction: ReactDirection::Given,
        }
    }
}

impl TsvTable for ReactsTable<'_> {
    fn header(&self) -> Vec<String> {
        let mut header = vec!["person".to_string()];
        header.extend(ReactionKind::TRACKED.iter().map(|k| k.column().to_string()));
        header.push("message_count".to_string());
        header.push("char_count".to_string());
        header
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.reacts
            .people
            .iter()
            .map(|person| {
                let mut row = vec![person.name.clone()];
                row.extend(
                    ReactionKind::TRACKED
                        .iter()
                        .map(|&k| self.direction.count(person, k).to_string()),
                );
                row.push(person.messages.to_string());
                row.push(person.chars.to_string());
                row
            })
            .collect()
    }
}

/// `time_series/<folder>/data.tsv`: the timestamps the series is built from.
impl TsvTable for TimeSeries {
    fn header(&self) -> Vec<String> {
        columns(&["timestamp_ms"])
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.timestamps.iter().map(|t| vec![t.to_string()]).collect()
    }
}

/// Binned rate of a [`TimeSeries`] (`time_series/<folder>/rate.tsv`).
pub struct RateTable<'a>(pub &'a TimeSeries);

impl TsvTable for RateTable<'_> {
    fn header(&self) -> Vec<String> {
        columns(&["bin_center_ms", "date", "messages", "cumulative"])
    }

    fn rows(&self) -> Vec<Vec<String>> {
        let series = self.0;
        series
            .centers_ms()
            .into_iter()
            .zip(&series.histogram.counts)
            .zip(series.cumulative())
            .map(|((center, count), total)| {
                vec![
                    center.to_string(),
                    format_date(center),
                    count.to_string(),
                    total.to_string(),
                ]
            })
            .collect()
    }
}

/// `conversation_sizes/data.tsv`
impl TsvTable for ConversationSizes {
    fn header(&self) -> Vec<String> {
        columns(&["title", "folder", "count", "chars"])
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.sizes
            .iter()
            .map(|s| {
                vec![
                    s.title.clone(),
                    s.folder.clone(),
                    s.count.to_string(),
                    s.chars.to_string(),
                ]
            })
            .collect()
    }
}
