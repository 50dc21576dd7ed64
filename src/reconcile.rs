// src/reconcile.rs

//! Cross-site reconciliation of data availability.
//!
//! Several sites are queried independently for the same global segment
//! span; this module computes, per instrument, the symmetric difference
//! between each pair of site-specific segment lists, and aggregate coverage
//! (total duration, counts above length thresholds) per site. It is a pure
//! reporting computation over the segment algebra: the result is identical
//! regardless of the order snapshots are passed in, and an instrument with
//! no coverage at one site is an inconsistency warning, never a failure.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::warn;

use crate::segment::{SegmentDict, SegmentList};

/// Length thresholds used by the original coverage report: segments longer
/// than 500 s are usable for most analyses, longer than 2000 s for all.
pub const DEFAULT_THRESHOLDS: &[i64] = &[500, 2000];

/// One site's view of per-instrument availability.
#[derive(Debug, Clone)]
pub struct SiteSnapshot {
    pub site: String,
    pub segments: SegmentDict,
}

impl SiteSnapshot {
    pub fn new(site: impl Into<String>, segments: SegmentDict) -> Self {
        Self {
            site: site.into(),
            segments,
        }
    }
}

/// Coverage above one length threshold.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ThresholdCoverage {
    pub threshold: i64,
    pub seconds: i64,
    pub count: usize,
}

/// Aggregate coverage for one instrument at one site.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CoverageReport {
    pub total_seconds: i64,
    pub segment_count: usize,
    pub long: Vec<ThresholdCoverage>,
}

impl CoverageReport {
    fn of(list: &SegmentList, thresholds: &[i64]) -> Self {
        let long = thresholds
            .iter()
            .map(|&threshold| {
                let filtered = list.filter_min_length(threshold);
                ThresholdCoverage {
                    threshold,
                    seconds: filtered.total_duration(),
                    count: filtered.len(),
                }
            })
            .collect();

        Self {
            total_seconds: list.total_duration(),
            segment_count: list.len(),
            long,
        }
    }
}

/// Segments one site has for an instrument that another site lacks.
#[derive(Debug, Clone)]
pub struct PairDifference {
    pub instrument: String,
    pub site_a: String,
    pub site_b: String,
    /// Time covered at `site_a` but not at `site_b`.
    pub only_at_a: SegmentList,
}

/// Result of comparing several site snapshots.
#[derive(Debug, Clone, Default)]
pub struct SiteComparison {
    /// site -> instrument -> coverage.
    pub coverage: BTreeMap<String, BTreeMap<String, CoverageReport>>,
    /// Every ordered pair of sites, per instrument.
    pub differences: Vec<PairDifference>,
    /// Human-readable notes about instruments covered at one site but with
    /// no coverage at all (missing or empty) at another.
    pub inconsistencies: Vec<String>,
}

/// Compare per-instrument availability across site snapshots.
///
/// Both directions of every site pair are materialised, so the output does
/// not depend on the order of `snapshots`; pairs and instruments are sorted
/// by name.
pub fn compare_sites(snapshots: &[SiteSnapshot], thresholds: &[i64]) -> SiteComparison {
    let mut comparison = SiteComparison::default();

    let instruments: BTreeSet<&str> = snapshots
        .iter()
        .flat_map(|s| s.segments.instruments())
        .collect();

    let mut by_site: BTreeMap<&str, &SegmentDict> = BTreeMap::new();
    for snapshot in snapshots {
        by_site.insert(snapshot.site.as_str(), &snapshot.segments);
    }

    for (&site, &dict) in by_site.iter() {
        let mut per_instrument = BTreeMap::new();
        for &instrument in instruments.iter() {
            let empty = SegmentList::new();
            let list = dict.get(instrument).unwrap_or(&empty);
            per_instrument.insert(instrument.to_string(), CoverageReport::of(list, thresholds));
        }
        comparison.coverage.insert(site.to_string(), per_instrument);
    }

    for (&site_a, &dict_a) in by_site.iter() {
        for (&site_b, &dict_b) in by_site.iter() {
            if site_a == site_b {
                continue;
            }
            for &instrument in instruments.iter() {
                let empty = SegmentList::new();
                let a = dict_a.get(instrument).unwrap_or(&empty);
                let b = dict_b.get(instrument).unwrap_or(&empty);

                // A site whose list was trimmed to nothing is as inconsistent
                // as one that never reported the instrument at all.
                if !a.is_empty() && b.is_empty() {
                    let note = format!(
                        "instrument {instrument} has coverage at site {site_a} \
                         but none at site {site_b}"
                    );
                    warn!("{note}");
                    comparison.inconsistencies.push(note);
                }

                comparison.differences.push(PairDifference {
                    instrument: instrument.to_string(),
                    site_a: site_a.to_string(),
                    site_b: site_b.to_string(),
                    only_at_a: a.difference(b),
                });
            }
        }
    }

    comparison
}

impl SiteComparison {
    /// The A-minus-B list for one (instrument, site pair), if computed.
    pub fn difference(&self, instrument: &str, site_a: &str, site_b: &str) -> Option<&SegmentList> {
        self.differences
            .iter()
            .find(|d| d.instrument == instrument && d.site_a == site_a && d.site_b == site_b)
            .map(|d| &d.only_at_a)
    }

    /// Coverage for one (site, instrument), if computed.
    pub fn coverage_of(&self, site: &str, instrument: &str) -> Option<&CoverageReport> {
        self.coverage.get(site).and_then(|m| m.get(instrument))
    }
}
