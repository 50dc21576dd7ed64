// src/catalog/mod.rs

//! File catalog: logical data products and their physical locations.
//!
//! - [`file`] defines [`File`], its identity tuple, PFNs and [`FileList`].
//! - [`resolve`] turns external URLs into catalogued [`File`]s.

pub mod file;
pub mod resolve;

pub use file::{File, FileIdentity, FileList, Pfn};
pub use resolve::{resolve_url_to_file, FileAttrs};
