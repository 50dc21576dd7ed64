// src/locator.rs

//! The data-location boundary.
//!
//! [`DataLocator`] is the engine's view of an external lookup service:
//! per-instrument availability and frame locations for a time window.
//! Failures from implementations surface as [`WorkflowError::Locator`] and
//! are never retried here — retry policy belongs to the caller.
//!
//! [`StaticLocator`] backs the boundary with `[site.<name>]` configuration
//! sections, which is enough for offline construction runs and for tests.
//! Deployments with a live location service implement the trait directly.

use crate::config::model::SiteConfig;
use crate::config::Config;
use crate::errors::{Result, WorkflowError};
use crate::segment::{Segment, SegmentList};

pub trait DataLocator {
    /// Name of the site this locator answers for.
    fn site(&self) -> &str;

    /// Availability segments for one instrument, restricted to `window`.
    ///
    /// An instrument the site knows nothing about yields an empty list, not
    /// an error; cross-site reconciliation reports that as an inconsistency.
    fn availability(&self, instrument: &str, window: &Segment) -> Result<SegmentList>;

    /// Frame URLs covering the instrument's availability within `window`.
    fn locate_frames(&self, instrument: &str, window: &Segment) -> Result<Vec<String>>;
}

/// Config-backed locator for one `[site.<name>]` section.
pub struct StaticLocator {
    site: String,
    config: SiteConfig,
}

impl StaticLocator {
    pub fn new(site: impl Into<String>, config: SiteConfig) -> Self {
        Self {
            site: site.into(),
            config,
        }
    }

    /// One locator per configured site, in deterministic (name) order.
    pub fn from_config(config: &Config) -> Vec<StaticLocator> {
        config
            .site
            .iter()
            .map(|(name, site)| StaticLocator::new(name.clone(), site.clone()))
            .collect()
    }
}

impl DataLocator for StaticLocator {
    fn site(&self) -> &str {
        &self.site
    }

    fn availability(&self, instrument: &str, window: &Segment) -> Result<SegmentList> {
        let Some(pairs) = self.config.segments.get(instrument) else {
            return Ok(SegmentList::new());
        };

        let mut segments = Vec::with_capacity(pairs.len());
        for &(start, end) in pairs {
            // Config validation already rejected malformed pairs, but the
            // segment constructor stays the single authority.
            segments.push(Segment::new(start, end)?);
        }

        Ok(SegmentList::from_segments(segments).restrict_to(window))
    }

    fn locate_frames(&self, instrument: &str, window: &Segment) -> Result<Vec<String>> {
        let available = self.availability(instrument, window)?;
        if available.is_empty() {
            return Ok(Vec::new());
        }

        let template =
            self.config
                .frames
                .get(instrument)
                .ok_or_else(|| WorkflowError::Locator {
                    instrument: instrument.to_string(),
                    reason: format!(
                        "site '{}' reports data but has no frame URL template",
                        self.site
                    ),
                })?;

        Ok(available
            .iter()
            .map(|seg| {
                template
                    .replace("{start}", &seg.start().to_string())
                    .replace("{duration}", &seg.duration().to_string())
            })
            .collect())
    }
}
