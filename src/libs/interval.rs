//! Closed coordinate intervals and the merge passes built on them.
//!
//! Two overlap predicates are in use and both are named here:
//!
//! * [`Boundary::Inclusive`] - intervals sharing any coordinate overlap, so `[10, 20]` and
//!   `[20, 30]` overlap. Used when calls are grouped, joined and resolved to canonical IDs.
//! * [`Boundary::Strict`] - the earlier interval must end *after* the later one starts, so
//!   touching intervals are left apart. Used by the final adjacent merge pass.

use serde::{Deserialize, Serialize};
use std::fmt;

/// `[start, end]`, both ends included. Serialized as a two-element array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "[u64; 2]", into = "[u64; 2]")]
pub struct Interval {
    pub start: u64,
    pub end: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// `a.start <= b.end && b.start <= a.end`
    Inclusive,
    /// For `lo <= hi` in `(start, end)` order: `lo.end > hi.start`
    Strict,
}

impl Interval {
    /// ```
    /// use cnehg::libs::interval::Interval;
    /// assert!(Interval::new(10, 20).is_some());
    /// assert!(Interval::new(20, 10).is_none());
    /// ```
    pub fn new(start: u64, end: u64) -> Option<Self> {
        if start <= end {
            Some(Self { start, end })
        } else {
            None
        }
    }

    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, other: &Interval) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn envelope_with(&self, other: &Interval) -> Interval {
        Interval {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl TryFrom<[u64; 2]> for Interval {
    type Error = String;

    fn try_from(pair: [u64; 2]) -> Result<Self, Self::Error> {
        Interval::new(pair[0], pair[1])
            .ok_or_else(|| format!("interval start {} is after end {}", pair[0], pair[1]))
    }
}

impl From<Interval> for [u64; 2] {
    fn from(iv: Interval) -> Self {
        [iv.start, iv.end]
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Touch-inclusive overlap, the predicate shared by grouping, joining and ID resolution.
///
/// ```
/// use cnehg::libs::interval::{overlaps, Interval};
/// let a = Interval::new(10, 20).unwrap();
/// let b = Interval::new(20, 30).unwrap();
/// let c = Interval::new(21, 30).unwrap();
/// assert!(overlaps(&a, &b));
/// assert!(!overlaps(&a, &c));
/// ```
pub fn overlaps(a: &Interval, b: &Interval) -> bool {
    overlaps_with(a, b, Boundary::Inclusive)
}

pub fn overlaps_with(a: &Interval, b: &Interval, boundary: Boundary) -> bool {
    match boundary {
        Boundary::Inclusive => a.start <= b.end && b.start <= a.end,
        Boundary::Strict => {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            lo.end > hi.start
        }
    }
}

/// `[min(starts), max(ends)]`, or `None` for an empty slice.
pub fn merge_envelope(intervals: &[Interval]) -> Option<Interval> {
    let (first, rest) = intervals.split_first()?;
    Some(rest.iter().fold(*first, |acc, iv| acc.envelope_with(iv)))
}

/// Sorts by `(start, end)` and collapses adjacent intervals overlapping under `boundary`.
///
/// A merged pair keeps growing while the next interval still overlaps it, which is the
/// same as rescanning from the merged position. The result is a fixed point: running
/// it again with the same `boundary` changes nothing.
pub fn merge_sorted(mut intervals: Vec<Interval>, boundary: Boundary) -> Vec<Interval> {
    intervals.sort_unstable();

    let mut merged: Vec<Interval> = Vec::with_capacity(intervals.len());
    for iv in intervals {
        match merged.last_mut() {
            Some(last) if overlaps_with(last, &iv, boundary) => {
                // nested intervals must not shrink the envelope
                last.end = last.end.max(iv.end);
            }
            _ => merged.push(iv),
        }
    }

    merged
}

/// The final pass over group envelopes, strict boundary.
pub fn recursive_merge(intervals: Vec<Interval>) -> Vec<Interval> {
    merge_sorted(intervals, Boundary::Strict)
}

/// True when no two intervals overlap under `boundary`.
pub fn is_disjoint(intervals: &[Interval], boundary: Boundary) -> bool {
    let mut sorted = intervals.to_vec();
    sorted.sort_unstable();
    sorted
        .windows(2)
        .all(|w| !overlaps_with(&w[0], &w[1], boundary))
}
