// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [workflow]
/// start-time = 1000000000
/// end-time = 1000086400
/// instruments = ["H1", "L1"]
/// stage-order = ["condition_strain"]
///
/// [executable.condition_strain]
/// path = "/usr/bin/condition_strain"
///
/// [executable.condition_strain.options]
/// sample-rate = "4096"
///
/// [site.CIT.segments]
/// H1 = [[1000000000, 1000040000]]
///
/// [site.CIT.frames]
/// H1 = "file:///data/CIT/H1-FRAME-{start}-{duration}.gwf"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Global analysis settings from `[workflow]`.
    pub workflow: WorkflowSection,

    /// All executables from `[executable.<role>]`, keyed by role name.
    #[serde(default)]
    pub executable: BTreeMap<String, ExecutableConfig>,

    /// Data-location sites from `[site.<name>]`, keyed by site name.
    #[serde(default)]
    pub site: BTreeMap<String, SiteConfig>,
}

/// `[workflow]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct WorkflowSection {
    /// Start of the analysis time span (integer seconds).
    pub start_time: i64,

    /// End of the analysis time span (exclusive).
    pub end_time: i64,

    /// Instruments participating in the analysis, e.g. `["H1", "L1"]`.
    pub instruments: Vec<String>,

    /// Stage roles to chain, in order. Each must have an
    /// `[executable.<role>]` section.
    #[serde(default)]
    pub stage_order: Vec<String>,

    /// Segments shorter than this many seconds are discarded after
    /// discovery.
    #[serde(default)]
    pub min_segment_length: i64,

    /// Site whose PFNs are preferred when resolving file paths for the plan.
    #[serde(default = "default_preferred_site")]
    pub preferred_site: String,

    /// Directory under which declared node outputs are placed.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Right ascension of the external trigger, degrees. Required as a
    /// group with `dec`, `trigger-time` and `trigger-name` for triggered
    /// analyses; omit all four for an untriggered run.
    pub ra: Option<f64>,

    /// Declination of the external trigger, degrees.
    pub dec: Option<f64>,

    /// GPS time of the external trigger.
    pub trigger_time: Option<i64>,

    /// Name of the external trigger, e.g. `GRB170817A`.
    pub trigger_name: Option<String>,

    /// Sky-localization error radius of the trigger, degrees. Defaults to 0
    /// (unknown).
    #[serde(default)]
    pub trigger_error_radius: f64,

    /// Name of the network that reported the trigger. Defaults to the empty
    /// string.
    #[serde(default)]
    pub trigger_network: String,

    /// Event number assigned by the reporting network. Defaults to 0.
    #[serde(default)]
    pub trigger_event_number: i64,
}

fn default_preferred_site() -> String {
    "local".to_string()
}

fn default_output_dir() -> String {
    "output".to_string()
}

/// `[executable.<role>]` section: one wrapped scientific executable.
///
/// The engine treats the executable as opaque; only its path, declared
/// options and resource class matter for graph construction.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ExecutableConfig {
    /// Filesystem path of the executable.
    pub path: String,

    /// Option name -> value, rendered as `--name value` on the command line.
    #[serde(default)]
    pub options: BTreeMap<String, String>,

    /// Memory class forwarded untouched to the batch system.
    #[serde(default = "default_memory_mb")]
    pub memory_mb: u64,

    /// Wall-clock class forwarded untouched to the batch system.
    #[serde(default = "default_wallclock_minutes")]
    pub wallclock_minutes: u64,

    /// Extension for output files declared by this executable's nodes.
    #[serde(default = "default_output_extension")]
    pub output_extension: String,
}

fn default_memory_mb() -> u64 {
    1024
}

fn default_wallclock_minutes() -> u64 {
    60
}

fn default_output_extension() -> String {
    "hdf".to_string()
}

/// `[site.<name>]` section: a static description of one data-location site.
///
/// This backs the `StaticLocator`; deployments talking to a live location
/// service ignore these sections and implement `DataLocator` directly.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SiteConfig {
    /// Instrument -> list of `[start, end]` pairs of available data.
    #[serde(default)]
    pub segments: BTreeMap<String, Vec<(i64, i64)>>,

    /// Instrument -> frame URL template. `{start}` and `{duration}` are
    /// substituted per located segment.
    #[serde(default)]
    pub frames: BTreeMap<String, String>,
}
