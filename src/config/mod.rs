// src/config/mod.rs

//! Configuration loading and validation for segflow.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate basic invariants like time-span sanity and role references
//!   (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path};
pub use model::{Config, ExecutableConfig, SiteConfig, WorkflowSection};
pub use validate::validate_config;
