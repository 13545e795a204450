//! Shared test fixtures and utilities for integration tests.
//!
//! [`TempWorkspace`] provides a temp directory for registry files, and the
//! `descriptor` helpers build in-memory descriptors without touching disk.

use conduit_interfaces::{MethodDescriptor, MethodStatus};
use rstest::fixture;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A small `conduit.query` response covering every canonical kind.
#[allow(dead_code)]
pub const CONDUIT_QUERY: &str = r#"{
  "user.whoami": {"description": "Retrieve information about the logged-in user.", "params": [], "return": "nonempty dict<string, wild>"},
  "differential.query": {
    "description": "Query Differential revisions.",
    "params": {
      "authors": "optional list<phid>",
      "ids": "optional list<uint>",
      "limit": "optional uint",
      "query": "optional string",
      "paths": "optional list<pair<callsign, path>>"
    },
    "return": "list<dict>"
  },
  "differential.getrevision": {
    "params": {"revision_id": "required id"},
    "status": "deprecated"
  },
  "conduit.connect": {
    "params": {
      "client": "required string",
      "clientVersion": "required int",
      "host": "required string",
      "user": "optional string",
      "authToken": "optional int",
      "authSignature": "optional string"
    }
  }
}"#;

/// A TOML manifest with the same shape as a hand-maintained registry.
#[allow(dead_code)]
pub const MANIFEST: &str = r#"
[[method]]
name = "maniphest.createtask"

[method.params]
title = "required string"
priority = "optional int"
projectPHIDs = "optional list<phid>"
auxiliary = "optional dict"

[[method]]
name = "conduit.ping"
status = "stable"
params = {}
"#;

/// A temporary directory for registry files.
///
/// Cleaned up automatically when dropped.
#[allow(dead_code)] // Methods used across different integration test crates
pub struct TempWorkspace {
    _temp: TempDir,
    root: PathBuf,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl TempWorkspace {
    /// Creates a new empty temporary workspace.
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().to_path_buf();
        Self { _temp: temp, root }
    }

    /// Returns the root path of this workspace.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Creates a directory (and all parent directories) within this workspace.
    ///
    /// # Panics
    /// Panics if directory creation fails.
    pub fn create_dir(&self, path: &str) {
        let full_path = self.root.join(path);
        std::fs::create_dir_all(&full_path)
            .unwrap_or_else(|e| panic!("Failed to create directory '{}': {}", path, e));
    }

    /// Creates a file with the given content within this workspace and
    /// returns its full path.
    ///
    /// Parent directories are created automatically if they don't exist.
    ///
    /// # Panics
    /// Panics if file creation fails.
    pub fn create_file(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.root.join(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).unwrap_or_else(|e| {
                panic!("Failed to create parent directory for '{}': {}", path, e)
            });
        }
        std::fs::write(&full_path, content)
            .unwrap_or_else(|e| panic!("Failed to write file '{}': {}", path, e));
        full_path
    }
}

impl Default for TempWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// Fresh temp workspace for each test.
#[allow(dead_code)]
#[fixture]
pub fn workspace() -> TempWorkspace {
    TempWorkspace::new()
}

/// Builds a stable descriptor from `(name, declaration)` pairs.
///
/// # Panics
/// Panics if a declaration is invalid.
#[allow(dead_code)]
pub fn descriptor(full_name: &str, params: &[(&str, &str)]) -> MethodDescriptor {
    MethodDescriptor::from_declarations(full_name, MethodStatus::Stable, params.iter().copied())
        .unwrap_or_else(|e| panic!("Invalid test descriptor '{}': {}", full_name, e))
}
