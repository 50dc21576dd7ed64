// src/job/node.rs

use serde::{Deserialize, Serialize};

use crate::catalog::FileList;

/// Scheduler resource class for one node.
///
/// The engine never interprets these values; they are forwarded untouched to
/// the batch system in the emitted plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSpec {
    pub memory_mb: u64,
    pub wallclock_minutes: u64,
}

/// One vertex of the execution DAG: a resolved executable invocation with
/// its declared input and output files.
///
/// A node carries no dependency edges itself; the assembler infers those
/// from producer/consumer relationships over file identities.
#[derive(Debug, Clone)]
pub struct Node {
    role: String,
    executable: String,
    arguments: Vec<String>,
    inputs: FileList,
    outputs: FileList,
    resource: ResourceSpec,
}

impl Node {
    pub fn new(
        role: impl Into<String>,
        executable: impl Into<String>,
        arguments: Vec<String>,
        inputs: FileList,
        outputs: FileList,
        resource: ResourceSpec,
    ) -> Self {
        Self {
            role: role.into(),
            executable: executable.into(),
            arguments,
            inputs,
            outputs,
            resource,
        }
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn executable(&self) -> &str {
        &self.executable
    }

    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    pub fn inputs(&self) -> &FileList {
        &self.inputs
    }

    pub fn outputs(&self) -> &FileList {
        &self.outputs
    }

    pub fn resource(&self) -> ResourceSpec {
        self.resource
    }
}
