// src/dag/assembler.rs

use std::collections::HashMap;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use tracing::debug;

use crate::catalog::FileIdentity;
use crate::dag::plan::{GraphPlan, PlannedJob};
use crate::errors::{Result, WorkflowError};
use crate::job::Node;

/// Index of a node within the assembler, in insertion order.
pub type NodeId = usize;

/// Accumulates nodes from independent pipeline stages and infers dependency
/// edges.
///
/// Every output file of an inserted node is recorded in an append-only
/// identity -> producer index. When a later node declares an input whose
/// identity matches that index, a producer -> consumer edge is added
/// automatically; inputs with no known producer are external (pre-existing
/// on disk, no edge).
///
/// Because edges can only point from an earlier insertion to a later one,
/// the graph is acyclic by construction; the one way a caller could break
/// that is by reusing an output identity, which is rejected at insertion
/// before any state changes.
#[derive(Debug, Default)]
pub struct DagAssembler {
    /// `None` marks a withdrawn node; ids stay stable.
    nodes: Vec<Option<Node>>,
    producers: HashMap<FileIdentity, NodeId>,
    edges: Vec<(NodeId, NodeId)>,
}

impl DagAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (non-withdrawn) nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn edges(&self) -> &[(NodeId, NodeId)] {
        &self.edges
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id).and_then(Option::as_ref)
    }

    /// Insert a node, inferring its incoming edges.
    ///
    /// Fails with [`WorkflowError::DuplicateOutput`] if any declared output
    /// identity already has a producer; in that case the graph is left
    /// completely unchanged.
    pub fn add_node(&mut self, node: Node) -> Result<NodeId> {
        // Validate all outputs before mutating anything, so a rejected
        // insertion cannot leave a half-registered node behind.
        for output in node.outputs().iter() {
            if let Some(&producer) = self.producers.get(output.identity()) {
                let producer_role = self
                    .node(producer)
                    .map(|n| n.role().to_string())
                    .unwrap_or_default();
                return Err(WorkflowError::DuplicateOutput {
                    name: output.name().to_string(),
                    producer_role,
                });
            }
        }

        let id = self.nodes.len();

        let mut incoming: Vec<NodeId> = node
            .inputs()
            .iter()
            .filter_map(|input| self.producers.get(input.identity()).copied())
            .collect();
        incoming.sort_unstable();
        incoming.dedup();

        for producer in incoming {
            debug!(producer, consumer = id, "inferred dependency edge");
            self.edges.push((producer, id));
        }

        for output in node.outputs().iter() {
            self.producers.insert(output.identity().clone(), id);
        }

        debug!(id, role = node.role(), "node added to graph");
        self.nodes.push(Some(node));
        Ok(id)
    }

    /// Withdraw a not-yet-submitted node from the graph.
    ///
    /// Refused if another node already consumes one of its outputs, since
    /// removing it would orphan that consumer's input.
    pub fn withdraw(&mut self, id: NodeId) -> Result<Node> {
        let node = self
            .nodes
            .get(id)
            .and_then(Option::as_ref)
            .ok_or(WorkflowError::UnknownNode { id })?;

        if let Some(&(_, consumer)) = self.edges.iter().find(|(from, _)| *from == id) {
            let consumer_role = self
                .node(consumer)
                .map(|n| n.role().to_string())
                .unwrap_or_default();
            let output = node
                .outputs()
                .iter()
                .next()
                .map(|f| f.name().to_string())
                .unwrap_or_default();
            return Err(WorkflowError::OutputConsumed {
                role: node.role().to_string(),
                output,
                consumer_role,
            });
        }

        self.producers.retain(|_, producer| *producer != id);
        self.edges.retain(|(_, to)| *to != id);

        let node = self.nodes[id].take().ok_or(WorkflowError::UnknownNode { id })?;
        debug!(id, role = node.role(), "node withdrawn from graph");
        Ok(node)
    }

    /// Topologically order the graph and emit the executable plan.
    ///
    /// Consuming `self` is what enforces "no further nodes after finalize".
    /// Insertion order is already a topological order (producers are always
    /// inserted before their consumers); the petgraph toposort is kept as a
    /// structural assertion and to fail loudly if that ever stops holding.
    ///
    /// `preferred_site` selects which PFN is written into the plan for each
    /// input/output file.
    pub fn finalize(self, preferred_site: &str) -> Result<GraphPlan> {
        let mut graph: DiGraphMap<NodeId, ()> = DiGraphMap::new();
        for (id, node) in self.nodes.iter().enumerate() {
            if node.is_some() {
                graph.add_node(id);
            }
        }
        for (from, to) in self.edges.iter() {
            graph.add_edge(*from, *to, ());
        }

        if let Err(cycle) = toposort(&graph, None) {
            let role = self
                .node(cycle.node_id())
                .map(|n| n.role().to_string())
                .unwrap_or_default();
            return Err(WorkflowError::Cycle { role });
        }

        // Withdrawn nodes leave holes; renumber compactly while preserving
        // insertion order, which keeps the emitted order stable among
        // unrelated nodes.
        let mut remap: HashMap<NodeId, usize> = HashMap::new();
        let mut jobs = Vec::new();

        for (id, slot) in self.nodes.iter().enumerate() {
            let Some(node) = slot else { continue };
            let plan_id = jobs.len();
            remap.insert(id, plan_id);
            jobs.push(PlannedJob::from_node(plan_id, node, preferred_site)?);
        }

        let mut edges: Vec<(usize, usize)> = self
            .edges
            .iter()
            .map(|(from, to)| (remap[from], remap[to]))
            .collect();
        edges.sort_unstable();
        edges.dedup();

        Ok(GraphPlan { jobs, edges })
    }
}
