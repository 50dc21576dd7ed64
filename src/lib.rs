// src/lib.rs

pub mod catalog;
pub mod cli;
pub mod config;
pub mod dag;
pub mod errors;
pub mod job;
pub mod locator;
pub mod logging;
pub mod reconcile;
pub mod segment;
pub mod stages;
pub mod trigger;
pub mod workflow;

use std::path::PathBuf;

use anyhow::Result;
use tracing::{info, warn};

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::dag::GraphPlan;
use crate::locator::{DataLocator, StaticLocator};
use crate::reconcile::{compare_sites, SiteComparison, SiteSnapshot, DEFAULT_THRESHOLDS};
use crate::segment::SegmentDict;
use crate::trigger::TriggerRecord;
use crate::workflow::Workflow;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - workflow context construction
/// - external-trigger metadata registration, for triggered runs
/// - segment discovery across the configured sites
/// - per-site datafind + cross-site reconciliation reporting
/// - the configured processing stages
/// - finalization and plan output
pub fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;

    let mut workflow = Workflow::new(cfg)?;
    let locators = StaticLocator::from_config(workflow.config());

    // A triggered analysis anchors to one external event; its metadata
    // record enters the catalog as a pre-existing input for every stage.
    if let Some(record) = TriggerRecord::from_config(&workflow.config().workflow)? {
        let sources = workflow.instruments().to_vec();
        let output_dir = workflow.config().workflow.output_dir.clone();
        let file = record.to_file(&sources, workflow.analysis_time(), &output_dir);
        info!(trigger = %record.trigger_name, "registered external trigger metadata");
        workflow.register_file(file);
    }

    // Science segments: union of what every site claims to have. Each site
    // is then held to that view during datafind, and discrepancies show up
    // in the reconciliation report.
    let mut science = SegmentDict::new();
    for locator in locators.iter() {
        let view = stages::discover_science_segments(&workflow, locator)?;
        for (instrument, list) in view.iter() {
            let merged = match science.get(instrument) {
                Some(existing) => existing.union(list),
                None => list.clone(),
            };
            science.insert(instrument.to_string(), merged);
        }
    }
    workflow.set_science_segments(science.clone());

    // Datafind per site; every site's view of the same frame becomes an
    // alternate-site PFN on one catalogued file in the workflow's catalog.
    let mut snapshots = Vec::new();
    for locator in locators.iter() {
        let (_, trimmed) = stages::run_datafind(&mut workflow, &science, locator)?;
        snapshots.push(SiteSnapshot::new(locator.site(), trimmed));
    }

    let comparison = compare_sites(&snapshots, DEFAULT_THRESHOLDS);
    print_coverage(&comparison);

    // Chain the configured processing stages: each stage's outputs are the
    // next stage's inputs.
    let mut current_inputs = workflow.files().clone();
    let stage_order = workflow.config().workflow.stage_order.clone();
    for role in stage_order {
        let (nodes, outputs) =
            stages::setup_processing_stage(&mut workflow, &role, &[], &current_inputs, &[])?;
        if nodes.is_empty() {
            warn!(role = %role, "stage produced no nodes");
        }
        current_inputs = outputs;
    }

    info!(
        nodes = workflow.node_count(),
        files = workflow.files().len(),
        "workflow construction complete"
    );

    let plan = workflow.finalize()?;

    if args.dry_run {
        print_dry_run(&plan);
        return Ok(());
    }

    plan.write_to(&args.output)?;
    info!(output = %args.output, "graph plan written");
    Ok(())
}

/// Print the cross-site coverage report in the traditional shape: aggregate
/// duration per instrument and site, then pairwise differences.
fn print_coverage(comparison: &SiteComparison) {
    for (site, per_instrument) in comparison.coverage.iter() {
        for (instrument, report) in per_instrument.iter() {
            let mut line = format!(
                "site {site}: instrument {instrument} has {} seconds of data in {} segments",
                report.total_seconds, report.segment_count
            );
            for long in report.long.iter() {
                line.push_str(&format!(
                    ", {} seconds ({} segments) longer than {}s",
                    long.seconds, long.count, long.threshold
                ));
            }
            println!("{line}");
        }
    }

    for diff in comparison.differences.iter() {
        if !diff.only_at_a.is_empty() {
            println!(
                "data present at {} and not at {} for {}: {}",
                diff.site_a, diff.site_b, diff.instrument, diff.only_at_a
            );
        }
    }

    for note in comparison.inconsistencies.iter() {
        println!("inconsistency: {note}");
    }
}

/// Simple dry-run output: jobs, dependencies and commands.
fn print_dry_run(plan: &GraphPlan) {
    println!("segflow dry-run");
    println!("jobs ({}):", plan.jobs.len());
    for job in plan.jobs.iter() {
        println!("  - [{}] {}", job.id, job.role);
        println!("      exe: {}", job.executable);
        println!("      args: {}", job.arguments.join(" "));
        if !job.inputs.is_empty() {
            println!("      inputs: {:?}", job.inputs);
        }
        if !job.outputs.is_empty() {
            println!("      outputs: {:?}", job.outputs);
        }
    }
    println!("edges ({}):", plan.edges.len());
    for (from, to) in plan.edges.iter() {
        println!("  {from} -> {to}");
    }
}
