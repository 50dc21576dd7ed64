// src/dag/plan.rs

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Serialize;

use crate::errors::Result;
use crate::job::Node;

/// One job in the emitted plan: everything the external submit tooling
/// needs to generate a scheduler description for this vertex.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedJob {
    pub id: usize,
    pub role: String,
    pub executable: String,
    pub arguments: Vec<String>,
    /// Input file locations, resolved at the preferred site.
    pub inputs: Vec<String>,
    /// Declared output file locations.
    pub outputs: Vec<String>,
    pub memory_mb: u64,
    pub wallclock_minutes: u64,
}

impl PlannedJob {
    pub(crate) fn from_node(id: usize, node: &Node, preferred_site: &str) -> Result<Self> {
        let mut inputs = Vec::new();
        for file in node.inputs().iter() {
            inputs.push(file.resolve_pfn(preferred_site)?.url.clone());
        }

        let mut outputs = Vec::new();
        for file in node.outputs().iter() {
            outputs.push(file.resolve_pfn(preferred_site)?.url.clone());
        }

        Ok(Self {
            id,
            role: node.role().to_string(),
            executable: node.executable().to_string(),
            arguments: node.arguments().to_vec(),
            inputs,
            outputs,
            memory_mb: node.resource().memory_mb,
            wallclock_minutes: node.resource().wallclock_minutes,
        })
    }
}

/// The finalized, submittable job graph.
///
/// Jobs appear in a valid topological order (producers before consumers,
/// insertion order among unrelated jobs); `edges` is the ordered
/// producer -> consumer list over job ids. The exact on-disk format the
/// batch scheduler consumes is the submit tooling's concern; JSON here is
/// just the interchange encoding.
#[derive(Debug, Clone, Serialize)]
pub struct GraphPlan {
    pub jobs: Vec<PlannedJob>,
    pub edges: Vec<(usize, usize)>,
}

impl GraphPlan {
    pub fn to_json(&self) -> anyhow::Result<String> {
        serde_json::to_string_pretty(self).context("serializing graph plan to JSON")
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        let json = self.to_json()?;
        fs::write(path, json).with_context(|| format!("writing graph plan to {:?}", path))
    }
}
