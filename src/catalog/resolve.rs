// src/catalog/resolve.rs

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::catalog::file::{File, FileIdentity};
use crate::errors::{Result, WorkflowError};
use crate::segment::Segment;

/// Attributes describing the file a URL is expected to address.
#[derive(Debug, Clone)]
pub struct FileAttrs {
    /// Producing sources (instrument names).
    pub sources: Vec<String>,
    /// Logical name for the product when the URL carries no naming info.
    pub exe_name: String,
    /// Requested validity segment.
    pub segment: Segment,
    /// Tags for repeated-invocation disambiguation.
    pub tags: Vec<String>,
    /// Site to record the resulting PFN under.
    pub site: String,
}

impl FileAttrs {
    pub fn new(sources: Vec<String>, exe_name: impl Into<String>, segment: Segment) -> Self {
        Self {
            sources,
            exe_name: exe_name.into(),
            segment,
            tags: Vec::new(),
            site: "local".to_string(),
        }
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_site(mut self, site: impl Into<String>) -> Self {
        self.site = site.into();
        self
    }
}

/// Resolve an external URL to a catalogued [`File`] with exactly one PFN.
///
/// Supported forms are `file://` URLs and bare filesystem paths; any other
/// scheme is an [`WorkflowError::UnsupportedScheme`] resolution error. When
/// the basename follows the `<name>-<start>-<duration>.<ext>` convention the
/// embedded span must intersect `attrs.segment` and becomes the file's
/// validity segment; otherwise the requested segment is used as-is.
pub fn resolve_url_to_file(url: &str, attrs: &FileAttrs) -> Result<File> {
    let path = local_path_of(url)?;

    let basename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let segment = match parse_embedded_span(&basename) {
        Some(embedded) => {
            if !embedded.intersects(&attrs.segment) {
                return Err(WorkflowError::SpanMismatch {
                    url: url.to_string(),
                    found_start: embedded.start(),
                    found_end: embedded.end(),
                    want_start: attrs.segment.start(),
                    want_end: attrs.segment.end(),
                });
            }
            embedded
        }
        None => attrs.segment,
    };

    let name = if basename.is_empty() {
        attrs.exe_name.clone()
    } else {
        basename
    };

    debug!(%url, %name, %segment, "resolved URL to file");

    let identity = FileIdentity::new(attrs.sources.clone(), name, segment, attrs.tags.clone());
    let mut file = File::new(identity);
    file.add_pfn(url, attrs.site.clone());
    file.set_local_path(path);
    Ok(file)
}

/// Strip a `file://` prefix (with optional `localhost` authority) or accept
/// a bare path; reject anything else.
fn local_path_of(url: &str) -> Result<PathBuf> {
    if let Some(rest) = url.strip_prefix("file://") {
        let path = rest.strip_prefix("localhost").unwrap_or(rest);
        return Ok(PathBuf::from(path));
    }
    if url.contains("://") {
        return Err(WorkflowError::UnsupportedScheme {
            url: url.to_string(),
        });
    }
    Ok(Path::new(url).to_path_buf())
}

/// Parse a trailing `-<start>-<duration>` pair from a basename stem.
///
/// This matches the conventional product naming
/// `{SOURCES}-{NAME}-{start}-{duration}.{ext}`; names that do not follow it
/// simply carry no embedded span.
fn parse_embedded_span(basename: &str) -> Option<Segment> {
    let stem = basename.rsplit_once('.').map_or(basename, |(s, _)| s);
    let (rest, duration) = stem.rsplit_once('-')?;
    let (_, start) = rest.rsplit_once('-')?;

    let start: i64 = start.parse().ok()?;
    let duration: i64 = duration.parse().ok()?;
    Segment::new(start, start + duration).ok()
}
