// src/config/mod.rs

//! Suite file loading, saving and validation.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load and save a suite file (`loader.rs`).
//! - Validate expressions and acyclicity (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, resolve_suite_path, save_to_path};
pub use model::{ConfigSection, RawSuiteFile, SuiteFile};
