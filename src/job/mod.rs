// src/job/mod.rs

//! Job templates and graph vertices.
//!
//! - [`descriptor`] holds [`JobDescriptor`], the immutable template from
//!   which nodes are instantiated, with fail-fast option validation.
//! - [`node`] holds [`Node`], one fully parameterized job invocation, and
//!   the opaque [`ResourceSpec`] forwarded to the batch system.

pub mod descriptor;
pub mod node;

pub use descriptor::JobDescriptor;
pub use node::{Node, ResourceSpec};
