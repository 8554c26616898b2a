//! PNG charts for the analysis reports.
//!
//! Every chart is first described by a plain data struct ([`BarChart`],
//! [`GroupedBarChart`], [`LineChart`], [`HistogramChart`]) built from an
//! analysis result. Rendering those descriptions with `plotters` requires
//! the `charts` feature.

use std::path::Path;

use crate::analysis::{ChatsOverTime, ConversationReacts, ConversationSizes, LargestChats, TimeSeries};
use crate::core::output::tsv::ReactDirection;
use crate::error::{ChatstatsError, Result};
use crate::reaction::ReactionKind;

/// Bars with one label each.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub title: String,
    pub y_desc: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl BarChart {
    /// The `top_n` largest conversations by the ranking key.
    pub fn top_chats(largest: &LargestChats, top_n: usize) -> Self {
        let top = largest.top(top_n);
        Self {
            title: format!("Top {} Chats", top.len()),
            y_desc: format!("Number of {}", largest.sort_by.noun()),
            labels: top.iter().map(|s| s.title.clone()).collect(),
            values: top.iter().map(|s| s.key(largest.sort_by) as f64).collect(),
        }
    }
}

/// Groups of bars, one group per category and one bar per series.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedBarChart {
    pub title: String,
    pub categories: Vec<String>,
    /// `(legend label, one value per category)`.
    pub series: Vec<(String, Vec<f64>)>,
}

impl GroupedBarChart {
    /// Tracked reactions per participant.
    pub fn reacts(reacts: &ConversationReacts, direction: ReactDirection) -> Self {
        let series = ReactionKind::TRACKED
            .iter()
            .map(|&kind| {
                let values = reacts
                    .people
                    .iter()
                    .map(|p| direction.count(p, kind) as f64)
                    .collect();
                (kind.label().to_string(), values)
            })
            .collect();
        Self {
            title: direction.title().to_string(),
            categories: reacts.people.iter().map(|p| p.name.clone()).collect(),
            series,
        }
    }
}

/// A single line over a date axis.
#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    pub title: String,
    pub y_desc: String,
    /// `(timestamp ms, value)`, ascending by timestamp.
    pub points: Vec<(i64, f64)>,
}

impl LineChart {
    /// Messages per interval over the whole inbox.
    pub fn over_time_totals(over_time: &ChatsOverTime) -> Self {
        Self {
            title: "Total Messages over Time".to_string(),
            y_desc: "Messages per Interval".to_string(),
            points: over_time
                .intervals
                .iter()
                .map(|i| (i.start_ms, i.total as f64))
                .collect(),
        }
    }

    /// Messages per histogram bin of one conversation.
    pub fn message_rate(series: &TimeSeries) -> Self {
        Self {
            title: "Messages Rate Over Time".to_string(),
            y_desc: "Messages per Interval (roughly half month)".to_string(),
            points: series
                .centers_ms()
                .into_iter()
                .zip(&series.histogram.counts)
                .map(|(x, &c)| (x, c as f64))
                .collect(),
        }
    }

    /// Running message total of one conversation.
    pub fn total_messages(series: &TimeSeries) -> Self {
        Self {
            title: "Total Messages over Time".to_string(),
            y_desc: "Message Count".to_string(),
            points: series
                .centers_ms()
                .into_iter()
                .zip(series.cumulative())
                .map(|(x, c)| (x, c as f64))
                .collect(),
        }
    }
}

/// Bars over contiguous numeric bins.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramChart {
    pub title: String,
    pub x_desc: String,
    pub y_desc: String,
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl HistogramChart {
    pub fn sizes(sizes: &ConversationSizes) -> Self {
        Self {
            title: "Conversation Sizes Histogram".to_string(),
            x_desc: format!("Conversation Size (number of {})", sizes.sort_by.noun()),
            y_desc: "Number of Conversations".to_string(),
            edges: sizes.histogram.edges.clone(),
            counts: sizes.histogram.counts.clone(),
        }
    }
}

/// Any chart a report can produce.
#[derive(Debug, Clone, PartialEq)]
pub enum Chart {
    Bar(BarChart),
    GroupedBar(GroupedBarChart),
    Line(LineChart),
    Histogram(HistogramChart),
}

impl Chart {
    pub fn title(&self) -> &str {
        match self {
            Chart::Bar(c) => &c.title,
            Chart::GroupedBar(c) => &c.title,
            Chart::Line(c) => &c.title,
            Chart::Histogram(c) => &c.title,
        }
    }
}

impl From<BarChart> for Chart {
    fn from(chart: BarChart) -> Self {
        Chart::Bar(chart)
    }
}

impl From<GroupedBarChart> for Chart {
    fn from(chart: GroupedBarChart) -> Self {
        Chart::GroupedBar(chart)
    }
}

impl From<LineChart> for Chart {
    fn from(chart: LineChart) -> Self {
        Chart::Line(chart)
    }
}

impl From<HistogramChart> for Chart {
    fn from(chart: HistogramChart) -> Self {
        Chart::Histogram(chart)
    }
}

/// Returns `true` if this build can render charts.
pub const fn charts_available() -> bool {
    cfg!(feature = "charts")
}

/// Renders `chart` as a PNG at `path`.
#[cfg(feature = "charts")]
pub fn render(chart: &Chart, path: &Path) -> Result<()> {
    match chart {
        Chart::Bar(c) => render_bar(c, path),
        Chart::GroupedBar(c) => render_grouped_bar(c, path),
        Chart::Line(c) => render_line(c, path),
        Chart::Histogram(c) => render_histogram(c, path),
    }
}

/// Always fails: this build has no chart backend.
#[cfg(not(feature = "charts"))]
pub fn render(chart: &Chart, path: &Path) -> Result<()> {
    Err(ChatstatsError::chart(
        path,
        format!("cannot render '{}': built without the `charts` feature", chart.title()),
    ))
}

/// Upper end of a value axis with some headroom.
#[cfg_attr(not(feature = "charts"), allow(dead_code))]
fn axis_max(values: impl IntoIterator<Item = f64>) -> f64 {
    let max = values.into_iter().fold(0.0_f64, f64::max);
    if max <= 0.0 { 1.0 } else { max * 1.1 }
}

#[cfg(feature = "charts")]
pub use render::{render_bar, render_grouped_bar, render_histogram, render_line};

#[cfg(feature = "charts")]
mod render {
    use std::error::Error;
    use std::path::Path;

    use plotters::prelude::*;

    use super::{BarChart, ChatstatsError, GroupedBarChart, HistogramChart, LineChart, Result, axis_max};
    use crate::core::output::tsv::format_date;

    type DrawResult = std::result::Result<(), Box<dyn Error>>;

    const SIZE: (u32, u32) = (1280, 720);
    const WIDE: (u32, u32) = (1400, 650);
    const FONT: &str = "sans-serif";

    fn finish(path: &Path, result: DrawResult) -> Result<()> {
        result.map_err(|e| ChatstatsError::chart(path, e))
    }

    /// Renders `chart` as a PNG at `path`.
    pub fn render_bar(chart: &BarChart, path: &Path) -> Result<()> {
        finish(path, draw_bar(chart, path))
    }

    fn draw_bar(spec: &BarChart, path: &Path) -> DrawResult {
        let root = BitMapBackend::new(path, SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let n = spec.values.len().max(1) as i32;
        let mut chart = ChartBuilder::on(&root)
            .caption(&spec.title, (FONT, 30))
            .margin(10)
            .x_label_area_size(60)
            .y_label_area_size(70)
            .build_cartesian_2d((0..n).into_segmented(), 0f64..axis_max(spec.values.iter().copied()))?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(spec.labels.len().max(1))
            .x_label_formatter(&|v| match v {
                SegmentValue::CenterOf(i) => spec.labels.get(*i as usize).cloned().unwrap_or_default(),
                _ => String::new(),
            })
            .y_desc(spec.y_desc.as_str())
            .draw()?;

        chart.draw_series(spec.values.iter().enumerate().map(|(i, &v)| {
            let i = i as i32;
            let mut bar = Rectangle::new(
                [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), v)],
                BLUE.filled(),
            );
            bar.set_margin(0, 0, 8, 8);
            bar
        }))?;

        root.present()?;
        Ok(())
    }

    /// Renders `chart` as a PNG at `path`, with a legend for the series.
    pub fn render_grouped_bar(chart: &GroupedBarChart, path: &Path) -> Result<()> {
        finish(path, draw_grouped_bar(chart, path))
    }

    fn draw_grouped_bar(spec: &GroupedBarChart, path: &Path) -> DrawResult {
        let root = BitMapBackend::new(path, WIDE).into_drawing_area();
        root.fill(&WHITE)?;

        // Each category takes one slot per series plus a gap slot.
        let per_group = spec.series.len() as i32 + 1;
        let slots = (spec.categories.len() as i32 * per_group).max(1);
        let label_slot = (per_group - 1) / 2;
        let y_max = axis_max(spec.series.iter().flat_map(|(_, v)| v.iter().copied()));

        let mut chart = ChartBuilder::on(&root)
            .caption(&spec.title, (FONT, 30))
            .margin(10)
            .x_label_area_size(60)
            .y_label_area_size(60)
            .build_cartesian_2d((0..slots).into_segmented(), 0f64..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(slots as usize)
            .x_label_formatter(&|v| match v {
                SegmentValue::CenterOf(i) if i % per_group == label_slot => spec
                    .categories
                    .get((i / per_group) as usize)
                    .cloned()
                    .unwrap_or_default(),
                _ => String::new(),
            })
            .draw()?;

        for (s, (label, values)) in spec.series.iter().enumerate() {
            let color = Palette99::pick(s);
            let offset = s as i32;
            chart
                .draw_series(values.iter().enumerate().map(|(g, &v)| {
                    let x = g as i32 * per_group + offset;
                    Rectangle::new(
                        [(SegmentValue::Exact(x), 0.0), (SegmentValue::Exact(x + 1), v)],
                        color.filled(),
                    )
                }))?
                .label(label.as_str())
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], Palette99::pick(s).filled()));
        }

        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;

        root.present()?;
        Ok(())
    }

    /// Renders `chart` as a PNG at `path` with dates on the x axis.
    pub fn render_line(chart: &LineChart, path: &Path) -> Result<()> {
        finish(path, draw_line(chart, path))
    }

    fn draw_line(spec: &LineChart, path: &Path) -> DrawResult {
        let root = BitMapBackend::new(path, SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let x_min = spec.points.first().map_or(0, |p| p.0);
        let mut x_max = spec.points.last().map_or(0, |p| p.0);
        if x_max <= x_min {
            x_max = x_min + crate::config::MILLIS_PER_DAY;
        }

        let mut chart = ChartBuilder::on(&root)
            .caption(&spec.title, (FONT, 30))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(70)
            .build_cartesian_2d(x_min..x_max, 0f64..axis_max(spec.points.iter().map(|p| p.1)))?;

        chart
            .configure_mesh()
            .x_labels(8)
            .x_label_formatter(&|x| format_date(*x))
            .x_desc("Date")
            .y_desc(spec.y_desc.as_str())
            .draw()?;

        chart.draw_series(LineSeries::new(spec.points.iter().copied(), &BLUE))?;
        chart.draw_series(
            spec.points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 3, BLUE.filled())),
        )?;

        root.present()?;
        Ok(())
    }

    /// Renders `chart` as a PNG at `path`.
    pub fn render_histogram(chart: &HistogramChart, path: &Path) -> Result<()> {
        finish(path, draw_histogram(chart, path))
    }

    fn draw_histogram(spec: &HistogramChart, path: &Path) -> DrawResult {
        let root = BitMapBackend::new(path, SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let x_min = spec.edges.first().copied().unwrap_or(0.0);
        let x_max = spec.edges.last().copied().unwrap_or(1.0);

        let mut chart = ChartBuilder::on(&root)
            .caption(&spec.title, (FONT, 30))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_min..x_max, 0f64..axis_max(spec.counts.iter().map(|&c| c as f64)))?;

        chart
            .configure_mesh()
            .x_desc(spec.x_desc.as_str())
            .y_desc(spec.y_desc.as_str())
            .draw()?;

        chart.draw_series(spec.edges.windows(2).zip(&spec.counts).map(|(edge, &count)| {
            Rectangle::new([(edge[0], 0.0), (edge[1], count as f64)], BLUE.mix(0.7).filled())
        }))?;

        root.present()?;
        Ok(())
    }
}
