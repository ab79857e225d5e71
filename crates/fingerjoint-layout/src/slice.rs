//! Intervals along the joint axis.

use serde::{Deserialize, Serialize};

/// A stretch of the local z axis: `[offset, offset + length)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    /// Start position along the axis.
    pub offset: f64,
    /// Extent along the axis.
    pub length: f64,
}

impl Interval {
    /// Create an interval.
    pub fn new(offset: f64, length: f64) -> Self {
        Self { offset, length }
    }

    /// End position along the axis.
    pub fn end(&self) -> f64 {
        self.offset + self.length
    }

    /// Center position along the axis.
    pub fn midpoint(&self) -> f64 {
        self.offset + self.length / 2.0
    }

    /// True if the two intervals share more than a boundary point.
    pub fn overlaps(&self, other: &Interval, eps: f64) -> bool {
        self.offset < other.end() - eps && other.offset < self.end() - eps
    }
}

/// An ordered list of non-overlapping intervals; one slab is cut per entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SliceSet {
    intervals: Vec<Interval>,
}

impl SliceSet {
    /// Wrap an ordered list of intervals.
    pub fn new(intervals: Vec<Interval>) -> Self {
        Self { intervals }
    }

    /// Number of intervals.
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// True if there are no intervals.
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Iterate over the intervals in axis order.
    pub fn iter(&self) -> std::slice::Iter<'_, Interval> {
        self.intervals.iter()
    }

    /// The intervals as a slice.
    pub fn as_slice(&self) -> &[Interval] {
        &self.intervals
    }

    /// Sum of all interval lengths.
    pub fn total_length(&self) -> f64 {
        self.intervals.iter().map(|i| i.length).sum()
    }

    /// True if no two intervals overlap by more than `eps`.
    pub fn is_disjoint(&self, eps: f64) -> bool {
        self.intervals
            .iter()
            .enumerate()
            .all(|(i, a)| self.intervals[i + 1..].iter().all(|b| !a.overlaps(b, eps)))
    }

    /// Start of the first interval and end of the last one.
    pub fn span(&self) -> Option<(f64, f64)> {
        let first = self.intervals.first()?;
        let last = self.intervals.last()?;
        Some((first.offset, last.end()))
    }
}

impl<'a> IntoIterator for &'a SliceSet {
    type Item = &'a Interval;
    type IntoIter = std::slice::Iter<'a, Interval>;

    fn into_iter(self) -> Self::IntoIter {
        self.intervals.iter()
    }
}
