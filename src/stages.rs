// src/stages.rs

//! Generator-style pipeline stages.
//!
//! Each function here is one stage of workflow construction: it reads the
//! shared [`Workflow`] context, may create nodes through a job descriptor,
//! and returns the files the next stage consumes. Stages run to completion
//! in a fixed sequence; nothing here suspends or spawns.

use tracing::{info, warn};

use crate::catalog::{resolve_url_to_file, FileAttrs, FileList};
use crate::dag::NodeId;
use crate::errors::Result;
use crate::job::JobDescriptor;
use crate::locator::DataLocator;
use crate::segment::{SegmentDict, SegmentList};
use crate::workflow::Workflow;

/// Query one locator for every instrument's availability within the
/// analysis span, filtered by the configured minimum segment length.
///
/// Pure with respect to the workflow: the caller decides how to combine
/// views from several locators before storing them on the context.
pub fn discover_science_segments(
    workflow: &Workflow,
    locator: &dyn DataLocator,
) -> Result<SegmentDict> {
    let window = workflow.analysis_time();
    let min_length = workflow.config().workflow.min_segment_length;

    let mut dict = SegmentDict::new();
    for instrument in workflow.instruments() {
        let available = locator
            .availability(instrument, &window)?
            .filter_min_length(min_length);
        info!(
            site = locator.site(),
            instrument = %instrument,
            segments = available.len(),
            seconds = available.total_duration(),
            "discovered science segments"
        );
        dict.insert(instrument.clone(), available);
    }

    Ok(dict)
}

/// Resolve frame file locations for the science segments at one site.
///
/// Every located URL becomes a catalogued file registered on the workflow;
/// a frame already known from another site gains an alternate-site PFN
/// instead of a second catalog entry. Returns the located files and the
/// science segments trimmed to what the site can actually serve. Coverage
/// the site is missing is subtracted with a warning, so later stages only
/// analyse data that exists.
pub fn run_datafind(
    workflow: &mut Workflow,
    science: &SegmentDict,
    locator: &dyn DataLocator,
) -> Result<(FileList, SegmentDict)> {
    let site = locator.site().to_string();
    let mut located = FileList::new();
    let mut trimmed = SegmentDict::new();

    for (instrument, wanted) in science.iter() {
        // The site lives on the PFN, never in the identity: the same frame
        // located at two sites must stay one logical file with two replicas.
        let attrs = FileAttrs::new(
            vec![instrument.to_string()],
            "FRAME",
            workflow.analysis_time(),
        )
        .with_site(site.clone());

        let mut served_segments = Vec::new();
        for window in wanted.iter() {
            for url in locator.locate_frames(instrument, window)? {
                let file = resolve_url_to_file(&url, &attrs)?;
                served_segments.push(*file.segment());
                workflow.register_file(file.clone());
                located.push(file);
            }
        }

        let served = SegmentList::from_segments(served_segments);
        let usable = wanted.intersect(&served);
        let missing = wanted.difference(&served);
        if !missing.is_empty() {
            warn!(
                site = %site,
                instrument,
                missing = %missing,
                "site is missing coverage for wanted science segments"
            );
        }

        trimmed.insert(instrument.to_string(), usable);
    }

    info!(
        site = %site,
        files = located.len(),
        "datafind complete"
    );

    Ok((located, trimmed))
}

/// Create one processing node per instrument for the given role.
///
/// Each node consumes the instrument's subset of `inputs`, with validity
/// equal to the extent of those inputs' segments. Instruments with no input
/// files are skipped with a warning — partial results proceed. Returns the
/// created node ids and the declared outputs, which feed the next stage.
pub fn setup_processing_stage(
    workflow: &mut Workflow,
    role: &str,
    required_options: &[&str],
    inputs: &FileList,
    tags: &[String],
) -> Result<(Vec<NodeId>, FileList)> {
    let descriptor = JobDescriptor::new(workflow.config(), role, required_options, tags.to_vec())?;

    let mut node_ids = Vec::new();
    let mut outputs = FileList::new();

    for instrument in workflow.instruments().to_vec() {
        let instrument_inputs = inputs.for_source(&instrument);
        if instrument_inputs.is_empty() {
            warn!(role, instrument = %instrument, "no input files; skipping node");
            continue;
        }

        let extent = instrument_inputs
            .iter()
            .map(|f| *f.segment())
            .collect::<SegmentList>()
            .extent();
        let Some(valid_seg) = extent else {
            continue;
        };

        let (node, node_outputs) = descriptor.create_node(&instrument_inputs, valid_seg, &[])?;
        let id = workflow.add_node(node)?;
        info!(role, instrument = %instrument, node = id, "stage node added");

        node_ids.push(id);
        outputs.extend(node_outputs);
    }

    Ok((node_ids, outputs))
}
