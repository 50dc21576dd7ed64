// src/trigger.rs

//! External-trigger metadata for triggered analyses.
//!
//! A triggered run is anchored to one astrophysical event reported from
//! outside the workflow. [`TriggerRecord`] is that event as a statically
//! declared record: four anchor fields are mandatory as a group, every
//! other field carries a typed default (0 for numbers, the empty string
//! for text), and range checks run at construction rather than when a
//! consumer reads a field. The record materialises into the file catalog
//! like any other pre-existing input, so downstream nodes consume it
//! through the normal PFN machinery.

use serde::Serialize;

use crate::catalog::{File, FileIdentity};
use crate::config::model::WorkflowSection;
use crate::errors::{Result, WorkflowError};
use crate::segment::Segment;

/// One external trigger, fully validated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriggerRecord {
    /// Name of the trigger, e.g. `GRB170817A`. Never empty.
    pub trigger_name: String,
    /// GPS time of the trigger.
    pub trigger_time: i64,
    /// Right ascension in degrees, in `[0, 360)`.
    pub ra: f64,
    /// Declination in degrees, in `[-90, 90]`.
    pub dec: f64,
    /// Sky-localization error radius in degrees; 0 when unknown.
    pub error_radius: f64,
    /// Reporting network; empty when unknown.
    pub network: String,
    /// Event number assigned by the reporting network; 0 when unknown.
    pub event_number: i64,
}

impl TriggerRecord {
    /// Construct a record from the four anchor fields, with every other
    /// field at its default.
    pub fn new(
        trigger_name: impl Into<String>,
        trigger_time: i64,
        ra: f64,
        dec: f64,
    ) -> Result<Self> {
        let trigger_name = trigger_name.into();
        if trigger_name.is_empty() {
            return Err(WorkflowError::Trigger {
                field: "trigger-name".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if !(0.0..360.0).contains(&ra) {
            return Err(WorkflowError::Trigger {
                field: "ra".to_string(),
                reason: format!("{ra} is outside [0, 360) degrees"),
            });
        }
        if !(-90.0..=90.0).contains(&dec) {
            return Err(WorkflowError::Trigger {
                field: "dec".to_string(),
                reason: format!("{dec} is outside [-90, 90] degrees"),
            });
        }
        Ok(Self {
            trigger_name,
            trigger_time,
            ra,
            dec,
            error_radius: 0.0,
            network: String::new(),
            event_number: 0,
        })
    }

    /// Build the record from the `[workflow]` section, if one is declared.
    ///
    /// The anchor fields (`ra`, `dec`, `trigger-time`, `trigger-name`) are
    /// all-or-nothing: all four absent means an untriggered run (`None`),
    /// a partial set is a [`WorkflowError::Trigger`] naming the first
    /// missing field. Completeness is checked here, at construction, so no
    /// consumer ever sees a half-populated record.
    pub fn from_config(wf: &WorkflowSection) -> Result<Option<Self>> {
        let declared = wf.ra.is_some()
            || wf.dec.is_some()
            || wf.trigger_time.is_some()
            || wf.trigger_name.is_some();
        if !declared {
            return Ok(None);
        }

        let mut record = Self::new(
            require(wf.trigger_name.clone(), "trigger-name")?,
            require(wf.trigger_time, "trigger-time")?,
            require(wf.ra, "ra")?,
            require(wf.dec, "dec")?,
        )?;
        record.error_radius = wf.trigger_error_radius;
        record.network = wf.trigger_network.clone();
        record.event_number = wf.trigger_event_number;
        Ok(Some(record))
    }

    /// Materialise the record as a catalogued file.
    ///
    /// The file takes the conventional `trigger{NAME}.xml` name, the given
    /// validity segment, and one local PFN under `output_dir`. Registering
    /// it on a workflow makes it available to nodes like any other
    /// pre-existing input.
    pub fn to_file(&self, sources: &[String], segment: Segment, output_dir: &str) -> File {
        let name = format!("trigger{}.xml", self.trigger_name);
        let identity = FileIdentity::new(sources.to_vec(), name.clone(), segment, Vec::new());
        let mut file = File::new(identity);
        file.add_pfn(format!("file://{output_dir}/{name}"), "local");
        file
    }
}

fn require<T>(value: Option<T>, field: &str) -> Result<T> {
    value.ok_or_else(|| WorkflowError::Trigger {
        field: field.to_string(),
        reason: "required alongside the other trigger fields but missing".to_string(),
    })
}
