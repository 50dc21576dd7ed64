// src/workflow.rs

//! The shared workflow construction context.
//!
//! One [`Workflow`] is threaded through every generator-style stage. It owns
//! the DAG assembler and the accumulated file list; all mutation goes
//! through the narrow methods here so the duplicate-output and acyclicity
//! invariants are enforced in one place. Construction is single-threaded by
//! design — there is exactly one logical owner and no internal locking.

use tracing::debug;

use crate::catalog::{File, FileList};
use crate::config::Config;
use crate::dag::{DagAssembler, GraphPlan, NodeId};
use crate::errors::Result;
use crate::job::Node;
use crate::segment::{Segment, SegmentDict};

pub struct Workflow {
    config: Config,
    analysis_time: Segment,
    science_segments: SegmentDict,
    files: FileList,
    dag: DagAssembler,
}

impl Workflow {
    /// Build a fresh context from validated configuration.
    ///
    /// The analysis span comes from `workflow.start-time` / `end-time`; a
    /// malformed span is rejected here (it would already have failed config
    /// validation, but the segment constructor is the single authority).
    pub fn new(config: Config) -> Result<Self> {
        let analysis_time = Segment::new(config.workflow.start_time, config.workflow.end_time)?;
        Ok(Self {
            config,
            analysis_time,
            science_segments: SegmentDict::new(),
            files: FileList::new(),
            dag: DagAssembler::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn analysis_time(&self) -> Segment {
        self.analysis_time
    }

    pub fn instruments(&self) -> &[String] {
        &self.config.workflow.instruments
    }

    pub fn science_segments(&self) -> &SegmentDict {
        &self.science_segments
    }

    pub fn set_science_segments(&mut self, segments: SegmentDict) {
        self.science_segments = segments;
    }

    pub fn files(&self) -> &FileList {
        &self.files
    }

    pub fn node_count(&self) -> usize {
        self.dag.node_count()
    }

    /// Register an externally resolved file with the workflow.
    ///
    /// If a file with the same logical identity is already registered, the
    /// new file's PFNs are appended as alternate-site replicas instead of
    /// adding a second catalog entry — replicas never change identity.
    pub fn register_file(&mut self, file: File) {
        match self.files.find_mut(file.identity()) {
            Some(existing) => {
                // add_pfn is idempotent, so double registration is harmless.
                for pfn in file.pfns() {
                    existing.add_pfn(pfn.url.clone(), pfn.site.clone());
                }
                debug!(name = file.name(), "merged replica PFNs into existing file");
            }
            None => self.files.push(file),
        }
    }

    /// Append a node to the DAG and register its outputs.
    pub fn add_node(&mut self, node: Node) -> Result<NodeId> {
        let outputs = node.outputs().clone();
        let id = self.dag.add_node(node)?;
        for output in outputs {
            self.files.push(output);
        }
        Ok(id)
    }

    /// Withdraw a node inserted earlier in this construction run.
    pub fn withdraw_node(&mut self, id: NodeId) -> Result<Node> {
        let node = self.dag.withdraw(id)?;
        for output in node.outputs().iter() {
            self.files.remove(output.identity());
        }
        Ok(node)
    }

    /// Topologically order the accumulated nodes and emit the submittable
    /// plan. Consumes the workflow; nothing can be appended afterwards.
    pub fn finalize(self) -> Result<GraphPlan> {
        let preferred_site = self.config.workflow.preferred_site;
        self.dag.finalize(&preferred_site)
    }
}
