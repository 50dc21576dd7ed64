// src/errors.rs

//! Structured errors for workflow construction.
//!
//! Three families, kept as distinct variants so callers can tell them apart:
//! - validation errors, raised at the point of construction (a malformed
//!   segment, a missing mandatory option, a duplicate output identity);
//! - resolution errors, raised when a file is actually needed (unsupported
//!   URL scheme, span mismatch, a file with no physical location);
//! - external-boundary errors from the data-location service, which the
//!   engine never retries itself.
//!
//! Every variant names the offending segment / file / node / role, so a
//! failure can be traced back to the pipeline stage that produced it.

use thiserror::Error;

/// Convenience alias used throughout the library.
pub type Result<T, E = WorkflowError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum WorkflowError {
    /// A segment with `start >= end` was handed to a constructor.
    #[error("invalid segment [{start}, {end}): start must be strictly less than end")]
    InvalidSegment { start: i64, end: i64 },

    /// A mandatory option for an executable role is absent from configuration.
    #[error("missing mandatory option '{option}' for executable role '{role}'")]
    MissingOption { role: String, option: String },

    /// No `[executable.<role>]` section exists for the requested role.
    #[error("unknown executable role '{role}': no [executable.{role}] section in configuration")]
    UnknownRole { role: String },

    /// Two nodes claim to produce the same logical output file.
    #[error("duplicate output file '{name}': already produced by node '{producer_role}'")]
    DuplicateOutput { name: String, producer_role: String },

    /// Toposort of the assembled graph failed.
    ///
    /// Edges are only ever inferred from files produced earlier in call
    /// order, so this indicates a bug rather than caller error; it is still
    /// surfaced as an error instead of a panic.
    #[error("cycle detected in job graph at node '{role}'")]
    Cycle { role: String },

    /// A node withdrawal was refused because another node consumes its output.
    #[error("cannot withdraw node '{role}': output '{output}' is consumed by node '{consumer_role}'")]
    OutputConsumed {
        role: String,
        output: String,
        consumer_role: String,
    },

    /// The node id does not refer to a live node in the assembler.
    #[error("no such node id {id} in the graph")]
    UnknownNode { id: usize },

    /// A URL used a scheme the catalog cannot resolve.
    #[error("unsupported URL scheme in '{url}': only file:// and plain paths are resolvable")]
    UnsupportedScheme { url: String },

    /// The time span embedded in a URL does not intersect the requested one.
    #[error(
        "time span [{found_start}, {found_end}) embedded in '{url}' does not \
         intersect requested span [{want_start}, {want_end})"
    )]
    SpanMismatch {
        url: String,
        found_start: i64,
        found_end: i64,
        want_start: i64,
        want_end: i64,
    },

    /// A file with no registered PFN was requested for execution.
    #[error("file '{name}' has no physical file name registered at any site")]
    Unmaterialized { name: String },

    /// External-trigger metadata is incomplete or out of range.
    #[error("invalid external trigger field '{field}': {reason}")]
    Trigger { field: String, reason: String },

    /// Failure reported by the external data-location service.
    ///
    /// Retry policy belongs to the caller; the engine surfaces these as-is.
    #[error("data location lookup failed for instrument '{instrument}': {reason}")]
    Locator { instrument: String, reason: String },
}
