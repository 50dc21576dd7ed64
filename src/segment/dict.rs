// src/segment/dict.rs

use std::collections::BTreeMap;

use crate::segment::list::SegmentList;
use crate::segment::span::Segment;

/// Per-instrument segment lists, keyed by instrument name (e.g. `"H1"`).
///
/// A thin wrapper over a `BTreeMap` so iteration order is deterministic,
/// which keeps workflow construction and reconciliation reports reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentDict(BTreeMap<String, SegmentList>);

impl SegmentDict {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn insert(&mut self, instrument: impl Into<String>, list: SegmentList) {
        self.0.insert(instrument.into(), list);
    }

    pub fn get(&self, instrument: &str) -> Option<&SegmentList> {
        self.0.get(instrument)
    }

    pub fn instruments(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SegmentList)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Restrict every instrument's list to the given analysis window.
    pub fn restrict_to(&self, window: &Segment) -> SegmentDict {
        SegmentDict(
            self.0
                .iter()
                .map(|(k, v)| (k.clone(), v.restrict_to(window)))
                .collect(),
        )
    }

    /// Drop segments shorter than `min_length` from every instrument.
    pub fn filter_min_length(&self, min_length: i64) -> SegmentDict {
        SegmentDict(
            self.0
                .iter()
                .map(|(k, v)| (k.clone(), v.filter_min_length(min_length)))
                .collect(),
        )
    }

    /// Time covered by every instrument at once, or an empty list when the
    /// dict is empty.
    pub fn intersect_all(&self) -> SegmentList {
        let mut lists = self.0.values();
        let Some(first) = lists.next() else {
            return SegmentList::new();
        };
        lists.fold(first.clone(), |acc, l| acc.intersect(l))
    }
}

impl FromIterator<(String, SegmentList)> for SegmentDict {
    fn from_iter<T: IntoIterator<Item = (String, SegmentList)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
