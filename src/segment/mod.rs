// src/segment/mod.rs

//! Time-segment algebra.
//!
//! - [`span`] defines the [`Segment`] interval type.
//! - [`list`] defines [`SegmentList`], an ordered coalesced sequence of
//!   segments for one data source, with set operations over it.
//! - [`dict`] defines [`SegmentDict`], a per-instrument map of segment lists.

pub mod dict;
pub mod list;
pub mod span;

pub use dict::SegmentDict;
pub use list::SegmentList;
pub use span::Segment;
