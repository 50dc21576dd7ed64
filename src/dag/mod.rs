// src/dag/mod.rs

//! DAG assembly and the emitted graph plan.
//!
//! - [`assembler`] accumulates nodes, infers producer/consumer edges from
//!   file identities, and topologically orders the result.
//! - [`plan`] is the serializable graph description handed to the external
//!   batch scheduler's submit tooling.

pub mod assembler;
pub mod plan;

pub use assembler::{DagAssembler, NodeId};
pub use plan::{GraphPlan, PlannedJob};
