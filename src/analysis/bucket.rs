//! Interval bucketing over sorted timestamp sequences.
//!
//! Every "over time" analysis reduces to the same step: split the timeline
//! into contiguous half-open intervals and count how many timestamps fall in
//! each, locating interval boundaries with a lower-bound binary search.
//!
//! ```
//! use chatstats::analysis::bucket::{count_in_intervals, interval_starts};
//!
//! let times = [0, 5, 9, 10, 25];
//! let starts = interval_starts(0, 25, 10);
//! assert_eq!(starts, vec![0, 10, 20]);
//! // the last interval is open-ended
//! assert_eq!(count_in_intervals(&times, &starts), vec![3, 1, 1]);
//! ```

use std::collections::BTreeMap;

use serde::Serialize;

/// Start points `begin, begin + step, …` strictly below `end`.
///
/// When `begin >= end` the timeline collapses to one interval starting at
/// `begin`. The last interval always extends to +∞. Non-positive steps are
/// treated as one millisecond.
pub fn interval_starts(begin: i64, end: i64, interval_ms: i64) -> Vec<i64> {
    if begin >= end {
        return vec![begin];
    }
    let step = usize::try_from(interval_ms.max(1)).unwrap_or(usize::MAX);
    (begin..end).step_by(step).collect()
}

/// Index of the first timestamp `>= bound` (bisect-left).
fn lower_bound(sorted: &[i64], bound: i64) -> usize {
    sorted.partition_point(|&t| t < bound)
}

/// Counts sorted timestamps per interval.
///
/// Interval `i` is `[starts[i], starts[i + 1])`; the last one is
/// `[starts[last], +∞)`. Timestamps before `starts[0]` are not counted.
pub fn count_in_intervals(sorted: &[i64], starts: &[i64]) -> Vec<usize> {
    debug_assert!(sorted.windows(2).all(|w| w[0] <= w[1]));
    starts
        .iter()
        .enumerate()
        .map(|(i, &lower)| {
            let lo = lower_bound(sorted, lower);
            let hi = starts
                .get(i + 1)
                .map_or(sorted.len(), |&upper| lower_bound(sorted, upper));
            hi - lo
        })
        .collect()
}

/// Per-entity and total counts for a shared set of intervals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalCounts<K> {
    /// Interval start timestamps (ms).
    pub starts: Vec<i64>,
    /// For each interval, the entities with a non-zero count.
    pub per_entity: Vec<BTreeMap<K, usize>>,
    /// For each interval, the count summed over all entities.
    pub totals: Vec<usize>,
}

impl<K> IntervalCounts<K> {
    /// Returns `true` if there are no intervals.
    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }

    /// Number of intervals.
    pub fn len(&self) -> usize {
        self.starts.len()
    }

    /// Sum of all totals.
    pub fn grand_total(&self) -> usize {
        self.totals.iter().sum()
    }
}

/// Buckets several entities' timestamps into one shared set of intervals.
///
/// The timeline runs from the global minimum to the global maximum over all
/// entities. Each list is sorted before counting, so the result does not
/// depend on input order. Entities with no timestamps are ignored.
pub fn bucket_entities<K, I>(entities: I, interval_ms: i64) -> IntervalCounts<K>
where
    K: Ord + Clone,
    I: IntoIterator<Item = (K, Vec<i64>)>,
{
    let mut series: Vec<(K, Vec<i64>)> = entities
        .into_iter()
        .filter(|(_, times)| !times.is_empty())
        .collect();
    for (_, times) in &mut series {
        times.sort_unstable();
    }

    let begin = series.iter().map(|(_, t)| t[0]).min();
    let end = series.iter().map(|(_, t)| t[t.len() - 1]).max();
    let (Some(begin), Some(end)) = (begin, end) else {
        return IntervalCounts {
            starts: Vec::new(),
            per_entity: Vec::new(),
            totals: Vec::new(),
        };
    };

    let starts = interval_starts(begin, end, interval_ms);
    let mut per_entity = vec![BTreeMap::new(); starts.len()];
    let mut totals = vec![0; starts.len()];

    for (key, times) in &series {
        for (i, count) in count_in_intervals(times, &starts).into_iter().enumerate() {
            if count != 0 {
                per_entity[i].insert(key.clone(), count);
            }
            totals[i] += count;
        }
    }

    IntervalCounts {
        starts,
        per_entity,
        totals,
    }
}

/// Equal-width histogram.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    /// `bins + 1` bin edges.
    pub edges: Vec<f64>,
    /// Count per bin.
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Midpoint of each bin.
    pub fn centers(&self) -> Vec<f64> {
        self.edges.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect()
    }

    /// Running totals of the bin counts.
    pub fn cumulative(&self) -> Vec<usize> {
        cumulative(&self.counts)
    }

    /// Sum of all bin counts.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Builds an equal-width histogram over `[min, max]` of `values`.
///
/// Bins are half-open except the last, which also includes `max`. When all
/// values are equal the range is widened to `value ± 0.5`; an empty input
/// spans `[0, 1]`. At least one bin is always produced.
pub fn histogram(values: &[i64], bins: usize) -> Histogram {
    let bins = bins.max(1);
    let mut sorted = values.to_vec();
    sorted.sort_unstable();

    let (lo, hi) = match (sorted.first(), sorted.last()) {
        (Some(&first), Some(&last)) if first < last => (first as f64, last as f64),
        (Some(&first), Some(_)) => (first as f64 - 0.5, first as f64 + 0.5),
        _ => (0.0, 1.0),
    };

    let width = (hi - lo) / bins as f64;
    let mut edges: Vec<f64> = (0..bins).map(|i| lo + width * i as f64).collect();
    edges.push(hi);

    let counts = (0..bins)
        .map(|i| {
            let start = sorted.partition_point(|&v| (v as f64) < edges[i]);
            let stop = if i + 1 == bins {
                sorted.partition_point(|&v| (v as f64) <= edges[i + 1])
            } else {
                sorted.partition_point(|&v| (v as f64) < edges[i + 1])
            };
            stop - start
        })
        .collect();

    Histogram { edges, counts }
}

/// Running totals of `counts`.
pub fn cumulative(counts: &[usize]) -> Vec<usize> {
    counts
        .iter()
        .scan(0, |total, &c| {
            *total += c;
            Some(*total)
        })
        .collect()
}
