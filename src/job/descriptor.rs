// src/job/descriptor.rs

use std::collections::BTreeMap;

use tracing::debug;

use crate::catalog::{File, FileIdentity, FileList};
use crate::config::Config;
use crate::errors::{Result, WorkflowError};
use crate::job::node::{Node, ResourceSpec};
use crate::segment::Segment;

/// Immutable template for one executable role.
///
/// Construction validates, against the configuration, that every option the
/// executable declares as mandatory is present — failing here rather than at
/// submission time, since a missing option discovered mid-construction would
/// leave a partially built graph.
#[derive(Debug, Clone)]
pub struct JobDescriptor {
    role: String,
    executable: String,
    options: BTreeMap<String, String>,
    tags: Vec<String>,
    resource: ResourceSpec,
    output_extension: String,
    output_dir: String,
    preferred_site: String,
}

impl JobDescriptor {
    /// Build a descriptor for `role` from configuration.
    ///
    /// `required_options` are the option names the wrapped executable cannot
    /// run without; any of them missing from `[executable.<role>.options]`
    /// is an immediate [`WorkflowError::MissingOption`].
    pub fn new(
        config: &Config,
        role: &str,
        required_options: &[&str],
        tags: Vec<String>,
    ) -> Result<Self> {
        let exe = config
            .executable
            .get(role)
            .ok_or_else(|| WorkflowError::UnknownRole {
                role: role.to_string(),
            })?;

        for option in required_options {
            if !exe.options.contains_key(*option) {
                return Err(WorkflowError::MissingOption {
                    role: role.to_string(),
                    option: option.to_string(),
                });
            }
        }

        Ok(Self {
            role: role.to_string(),
            executable: exe.path.clone(),
            options: exe.options.clone(),
            tags,
            resource: ResourceSpec {
                memory_mb: exe.memory_mb,
                wallclock_minutes: exe.wallclock_minutes,
            },
            output_extension: exe.output_extension.clone(),
            output_dir: config.workflow.output_dir.clone(),
            preferred_site: config.workflow.preferred_site.clone(),
        })
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Instantiate a node from this template.
    ///
    /// The output file's logical name is a deterministic function of the
    /// input sources, the role, the tags and the validity segment, so
    /// calling this twice with identical arguments yields outputs with
    /// identical logical identity (and independent PFN lists). That is what
    /// makes re-running workflow construction idempotent.
    ///
    /// Every input must already have at least one PFN; consuming a file that
    /// was never materialised anywhere is a resolution error.
    pub fn create_node(
        &self,
        inputs: &FileList,
        valid_seg: Segment,
        extra_tags: &[String],
    ) -> Result<(Node, FileList)> {
        let mut tags = self.tags.clone();
        tags.extend(extra_tags.iter().cloned());

        let mut sources: Vec<String> = inputs
            .iter()
            .flat_map(|f| f.sources().iter().cloned())
            .collect();
        sources.sort();
        sources.dedup();

        let output_name = self.output_name(&sources, &tags, &valid_seg);
        let identity =
            FileIdentity::new(sources, output_name.clone(), valid_seg, tags.clone());
        let mut output = File::new(identity);
        let output_url = format!("file://{}/{}", self.output_dir, output_name);
        output.add_pfn(output_url, "local");

        let mut arguments: Vec<String> = Vec::new();
        for (opt, value) in self.options.iter() {
            arguments.push(format!("--{opt}"));
            arguments.push(value.clone());
        }
        arguments.push("--gps-start-time".to_string());
        arguments.push(valid_seg.start().to_string());
        arguments.push("--gps-end-time".to_string());
        arguments.push(valid_seg.end().to_string());

        for input in inputs.iter() {
            let pfn = input.resolve_pfn(&self.preferred_site)?;
            arguments.push("--input-file".to_string());
            arguments.push(pfn.url.clone());
        }
        arguments.push("--output-file".to_string());
        arguments.push(output.resolve_pfn(&self.preferred_site)?.url.clone());

        debug!(
            role = %self.role,
            output = %output_name,
            inputs = inputs.len(),
            "created node"
        );

        let mut outputs = FileList::new();
        outputs.push(output);

        let node = Node::new(
            self.role.clone(),
            self.executable.clone(),
            arguments,
            inputs.clone(),
            outputs.clone(),
            self.resource,
        );

        Ok((node, outputs))
    }

    /// `{SOURCES}-{ROLE}{_TAG..}-{start}-{duration}.{ext}`, uppercased in
    /// the conventional product-name style.
    fn output_name(&self, sources: &[String], tags: &[String], seg: &Segment) -> String {
        let source_part = if sources.is_empty() {
            "ALL".to_string()
        } else {
            sources.join("")
        };

        let mut desc = self.role.to_uppercase();
        for tag in tags {
            desc.push('_');
            desc.push_str(&tag.to_uppercase());
        }

        format!(
            "{}-{}-{}-{}.{}",
            source_part,
            desc,
            seg.start(),
            seg.duration(),
            self.output_extension
        )
    }
}
