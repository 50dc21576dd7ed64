// src/segment/span.rs

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, WorkflowError};

/// A half-open interval `[start, end)` of integer seconds.
///
/// Segments describe when data is available from a source. A segment is
/// validated at construction: `start >= end` is rejected, never silently
/// dropped, so downstream algebra can assume every segment is non-empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Segment {
    start: i64,
    end: i64,
}

impl Segment {
    /// Construct a segment, rejecting malformed intervals.
    pub fn new(start: i64, end: i64) -> Result<Self> {
        if start >= end {
            return Err(WorkflowError::InvalidSegment { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    /// Length of the segment in seconds.
    pub fn duration(&self) -> i64 {
        self.end - self.start
    }

    /// True if the two half-open intervals share any time.
    pub fn intersects(&self, other: &Segment) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// True if `time` falls inside `[start, end)`.
    pub fn contains(&self, time: i64) -> bool {
        self.start <= time && time < self.end
    }

    /// Overlap of two segments, or `None` when they are disjoint.
    pub fn intersection(&self, other: &Segment) -> Option<Segment> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        if start < end {
            Some(Segment { start, end })
        } else {
            None
        }
    }

    /// True if `other` ends exactly where `self` begins, or vice versa.
    ///
    /// Abutting segments must always be merged by [`super::SegmentList`];
    /// consumers never see a false boundary between them.
    pub fn abuts(&self, other: &Segment) -> bool {
        self.end == other.start || other.end == self.start
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}
