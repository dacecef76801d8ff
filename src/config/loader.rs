// src/config/loader.rs

use std::path::{Path, PathBuf};

use crate::config::model::{RawSuiteFile, SuiteFile};
use crate::errors::Result;
use crate::fs::{FileSystem, RealFileSystem};

/// File written by `submit` when no suite file was given.
pub const FALLBACK_SUBMIT_FILE: &str = "submit.toml";

/// Load a suite file from a given path and return the raw `RawSuiteFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation (expression syntax, cycles). Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawSuiteFile> {
    load_with_fs(&RealFileSystem, path.as_ref())
}

/// Same as [`load_from_path`], reading through the given filesystem.
pub fn load_with_fs(fs: &dyn FileSystem, path: &Path) -> Result<RawSuiteFile> {
    let contents = fs.read_to_string(path)?;
    let suite: RawSuiteFile = toml::from_str(&contents)?;
    Ok(suite)
}

/// Load a suite file from path and run validation.
///
/// This is the recommended entry point for the rest of the application:
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks for:
///   - malformed dependency expressions,
///   - dependency cycles,
///   - basic `[config]` sanity.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<SuiteFile> {
    let raw = load_from_path(&path)?;
    SuiteFile::try_from(raw)
}

/// Serialize a suite back to TOML.
pub fn to_toml_string(suite: &SuiteFile) -> Result<String> {
    let raw = RawSuiteFile::from(suite.clone());
    Ok(toml::to_string(&raw)?)
}

/// Write a suite file, `job_ids` included.
pub fn save_to_path(suite: &SuiteFile, path: impl AsRef<Path>) -> Result<()> {
    save_with_fs(&RealFileSystem, suite, path.as_ref())
}

/// Same as [`save_to_path`], writing through the given filesystem.
pub fn save_with_fs(fs: &dyn FileSystem, suite: &SuiteFile, path: &Path) -> Result<()> {
    let text = to_toml_string(suite)?;
    fs.write(path, text.as_bytes())?;
    Ok(())
}

/// Default suite file path, `Slurmdag.toml` in the current directory.
pub fn default_suite_path() -> PathBuf {
    PathBuf::from("Slurmdag.toml")
}

/// Suite file to load: the explicit path if one was given, otherwise
/// [`default_suite_path`] when it exists.
pub fn resolve_suite_path(fs: &dyn FileSystem, explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let default = default_suite_path();
            fs.exists(&default).then_some(default)
        }
    }
}
