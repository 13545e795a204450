//! TOML manifests as a registry source.
//!
//! ```toml
//! [[method]]
//! name = "differential.query"
//! status = "unstable"
//!
//! [method.params]
//! ids = "optional list<uint>"
//! query = "optional string"
//! ```

use super::{MethodDescriptor, MethodStatus};
use crate::error::Result;
use anyhow::Context;
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default)]
    method: Vec<ManifestMethod>,
}

#[derive(Debug, Deserialize)]
struct ManifestMethod {
    name: String,
    #[serde(default)]
    status: MethodStatus,
    params: BTreeMap<String, String>,
}

/// Parses a manifest into descriptors, in declaration order.
pub fn parse_manifest(content: &str) -> Result<Vec<MethodDescriptor>> {
    let manifest: Manifest = toml::from_str(content).context("Invalid manifest")?;

    manifest
        .method
        .into_iter()
        .map(|method| {
            MethodDescriptor::from_declarations(&method.name, method.status, method.params)
                .with_context(|| format!("Invalid parameter declaration in '{}'", method.name))
        })
        .collect()
}
