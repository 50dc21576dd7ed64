// src/catalog/file.rs

use std::collections::HashSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, WorkflowError};
use crate::segment::Segment;

/// One physical location of a file's content: a URL annotated with the site
/// hosting that replica.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pfn {
    pub url: String,
    pub site: String,
}

/// The identity tuple of a logical data product.
///
/// Two [`File`]s are the same logical entity iff these four fields match
/// exactly. Physical replicas never affect identity, so the same product
/// materialised at several sites is still one file to the dependency engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FileIdentity {
    /// Producing sources (instrument names), kept sorted.
    pub sources: Vec<String>,
    /// Logical name, e.g. `H1-CONDITION_STRAIN-1000000000-40000.hdf`.
    pub name: String,
    /// Validity segment of the product.
    pub segment: Segment,
    /// Tags distinguishing products from repeated stage invocations.
    pub tags: Vec<String>,
}

impl FileIdentity {
    pub fn new(
        sources: impl IntoIterator<Item = String>,
        name: impl Into<String>,
        segment: Segment,
        tags: impl IntoIterator<Item = String>,
    ) -> Self {
        let mut sources: Vec<String> = sources.into_iter().collect();
        sources.sort();
        sources.dedup();
        Self {
            sources,
            name: name.into(),
            segment,
            tags: tags.into_iter().collect(),
        }
    }
}

/// One logical data product, possibly replicated at several sites.
///
/// A file is created either by resolving an external URL (a pre-existing
/// input) or as the declared output of a node at graph-construction time,
/// before anything exists on disk. After creation it is never mutated except
/// to append alternate-site PFNs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct File {
    identity: FileIdentity,
    pfns: Vec<Pfn>,
    /// Cached local path, populated when a PFN is known to be on this host.
    local_path: Option<PathBuf>,
}

impl File {
    /// A file with no physical location yet (a declared node output).
    pub fn new(identity: FileIdentity) -> Self {
        Self {
            identity,
            pfns: Vec::new(),
            local_path: None,
        }
    }

    pub fn identity(&self) -> &FileIdentity {
        &self.identity
    }

    pub fn name(&self) -> &str {
        &self.identity.name
    }

    pub fn segment(&self) -> &Segment {
        &self.identity.segment
    }

    pub fn sources(&self) -> &[String] {
        &self.identity.sources
    }

    pub fn tags(&self) -> &[String] {
        &self.identity.tags
    }

    pub fn pfns(&self) -> &[Pfn] {
        &self.pfns
    }

    pub fn local_path(&self) -> Option<&PathBuf> {
        self.local_path.as_ref()
    }

    pub fn set_local_path(&mut self, path: PathBuf) {
        self.local_path = Some(path);
    }

    /// True if the file's producing sources include `source`.
    pub fn has_source(&self, source: &str) -> bool {
        self.identity.sources.iter().any(|s| s == source)
    }

    /// Append an alternate physical location.
    ///
    /// Idempotent: registering the same (url, site) pair twice leaves a
    /// single entry. Replicas are trusted to be byte-identical; the engine
    /// does not verify content.
    pub fn add_pfn(&mut self, url: impl Into<String>, site: impl Into<String>) {
        let pfn = Pfn {
            url: url.into(),
            site: site.into(),
        };
        if !self.pfns.contains(&pfn) {
            self.pfns.push(pfn);
        }
    }

    /// Resolve a concrete location, preferring `preferred_site`.
    ///
    /// Falls back to the first PFN in registration order, so resolution is
    /// deterministic for a given catalog state. A file with no PFN at all is
    /// an error: it was declared but never materialised anywhere.
    pub fn resolve_pfn(&self, preferred_site: &str) -> Result<&Pfn> {
        self.pfns
            .iter()
            .find(|p| p.site == preferred_site)
            .or_else(|| self.pfns.first())
            .ok_or_else(|| WorkflowError::Unmaterialized {
                name: self.identity.name.clone(),
            })
    }
}

/// An ordered sequence of [`File`]s with identity-keyed set operations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileList(Vec<File>);

impl FileList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, file: File) {
        self.0.push(file);
    }

    pub fn extend(&mut self, other: FileList) {
        self.0.extend(other.0);
    }

    pub fn iter(&self) -> impl Iterator<Item = &File> {
        self.0.iter()
    }

    /// Mutable handle to the file with the given identity, if present.
    pub fn find_mut(&mut self, identity: &FileIdentity) -> Option<&mut File> {
        self.0.iter_mut().find(|f| f.identity() == identity)
    }

    /// Drop the file with the given identity, if present.
    pub fn remove(&mut self, identity: &FileIdentity) {
        self.0.retain(|f| f.identity() != identity);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn files(&self) -> &[File] {
        &self.0
    }

    /// Files produced by the given source.
    pub fn for_source(&self, source: &str) -> FileList {
        FileList(
            self.0
                .iter()
                .filter(|f| f.has_source(source))
                .cloned()
                .collect(),
        )
    }

    /// Files carrying the given tag.
    pub fn with_tag(&self, tag: &str) -> FileList {
        FileList(
            self.0
                .iter()
                .filter(|f| f.tags().iter().any(|t| t == tag))
                .cloned()
                .collect(),
        )
    }

    /// Files whose validity segment overlaps the query segment.
    pub fn overlapping(&self, window: &Segment) -> FileList {
        FileList(
            self.0
                .iter()
                .filter(|f| f.segment().intersects(window))
                .cloned()
                .collect(),
        )
    }

    /// Files in `self` whose identity does not appear in `other`.
    pub fn difference(&self, other: &FileList) -> FileList {
        let ids: HashSet<&FileIdentity> = other.0.iter().map(File::identity).collect();
        FileList(
            self.0
                .iter()
                .filter(|f| !ids.contains(f.identity()))
                .cloned()
                .collect(),
        )
    }

    /// Files in `self` whose identity also appears in `other`.
    pub fn intersection(&self, other: &FileList) -> FileList {
        let ids: HashSet<&FileIdentity> = other.0.iter().map(File::identity).collect();
        FileList(
            self.0
                .iter()
                .filter(|f| ids.contains(f.identity()))
                .cloned()
                .collect(),
        )
    }
}

impl FromIterator<File> for FileList {
    fn from_iter<T: IntoIterator<Item = File>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for FileList {
    type Item = File;
    type IntoIter = std::vec::IntoIter<File>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
