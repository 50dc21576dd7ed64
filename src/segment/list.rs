// src/segment/list.rs

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::segment::span::Segment;

/// An ordered, non-overlapping, coalesced sequence of [`Segment`]s for one
/// data source.
///
/// Invariant: segments are sorted by start time and any two segments
/// separated by a zero gap are merged into one. All constructors and set
/// operations preserve this, so two adjacent segments `[0, 10)` and
/// `[10, 20)` can never coexist in a list; they become `[0, 20)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentList(Vec<Segment>);

impl SegmentList {
    /// An empty list.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Build a list from arbitrary segments, sorting and coalescing.
    pub fn from_segments(segments: impl IntoIterator<Item = Segment>) -> Self {
        let mut segs: Vec<Segment> = segments.into_iter().collect();
        segs.sort();

        let mut coalesced: Vec<Segment> = Vec::with_capacity(segs.len());
        for seg in segs {
            match coalesced.last_mut() {
                Some(last) if last.end() >= seg.start() => {
                    if seg.end() > last.end() {
                        // Safe: start < end holds for the widened interval.
                        *last = Segment::new(last.start(), seg.end())
                            .expect("coalesced segment widens a valid one");
                    }
                }
                _ => coalesced.push(seg),
            }
        }

        Self(coalesced)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Segment> {
        self.0.iter()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    /// Sum of all segment durations in seconds.
    pub fn total_duration(&self) -> i64 {
        self.0.iter().map(Segment::duration).sum()
    }

    /// The smallest single segment covering the whole list, or `None` when
    /// the list is empty.
    pub fn extent(&self) -> Option<Segment> {
        let first = self.0.first()?;
        let last = self.0.last()?;
        Segment::new(first.start(), last.end()).ok()
    }

    /// Union of two lists; result is sorted and coalesced.
    pub fn union(&self, other: &SegmentList) -> SegmentList {
        SegmentList::from_segments(self.0.iter().chain(other.0.iter()).copied())
    }

    /// Overlap of two lists; result is sorted and coalesced. Commutative.
    pub fn intersect(&self, other: &SegmentList) -> SegmentList {
        let mut out = Vec::new();
        let (mut i, mut j) = (0, 0);

        // Both inputs are sorted; walk them together.
        while i < self.0.len() && j < other.0.len() {
            let (a, b) = (&self.0[i], &other.0[j]);
            if let Some(overlap) = a.intersection(b) {
                out.push(overlap);
            }
            if a.end() <= b.end() {
                i += 1;
            } else {
                j += 1;
            }
        }

        SegmentList::from_segments(out)
    }

    /// Time in `self` not covered by `other`.
    pub fn difference(&self, other: &SegmentList) -> SegmentList {
        let mut out = Vec::new();

        for seg in &self.0 {
            let mut cursor = seg.start();
            for cover in &other.0 {
                if cover.end() <= cursor {
                    continue;
                }
                if cover.start() >= seg.end() {
                    break;
                }
                if cover.start() > cursor {
                    if let Ok(gap) = Segment::new(cursor, cover.start().min(seg.end())) {
                        out.push(gap);
                    }
                }
                cursor = cursor.max(cover.end());
                if cursor >= seg.end() {
                    break;
                }
            }
            if cursor < seg.end() {
                if let Ok(tail) = Segment::new(cursor, seg.end()) {
                    out.push(tail);
                }
            }
        }

        SegmentList::from_segments(out)
    }

    /// Drop segments shorter than `min_length` seconds.
    ///
    /// Used to discard slivers too short to analyse.
    pub fn filter_min_length(&self, min_length: i64) -> SegmentList {
        SegmentList(
            self.0
                .iter()
                .filter(|s| s.duration() >= min_length)
                .copied()
                .collect(),
        )
    }

    /// Segments overlapping the query segment (trimmed to it).
    pub fn restrict_to(&self, window: &Segment) -> SegmentList {
        SegmentList::from_segments(self.0.iter().filter_map(|s| s.intersection(window)))
    }
}

impl FromIterator<Segment> for SegmentList {
    fn from_iter<T: IntoIterator<Item = Segment>>(iter: T) -> Self {
        SegmentList::from_segments(iter)
    }
}

impl fmt::Display for SegmentList {
    /// Display as `[[0, 10), [20, 30)]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (idx, seg) in self.0.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{seg}")?;
        }
        write!(f, "]")
    }
}
