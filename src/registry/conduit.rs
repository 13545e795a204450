//! `conduit.query` responses as a registry source.
//!
//! Phabricator's `conduit.query` method returns every registered method keyed
//! by full name:
//!
//! ```json
//! {"user.query": {"description": "...", "params": {"limit": "optional int"}, "return": "list<dict>"}}
//! ```
//!
//! Raw HTTP responses are also accepted: the `for(;;);` prefix Conduit emits
//! to defeat JSON hijacking is stripped, and a `{result, error_code,
//! error_info}` envelope is unwrapped.

use super::{MethodDescriptor, MethodStatus};
use crate::error::{RegistryError, Result};
use anyhow::Context;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

const HIJACK_PREFIX: &str = "for(;;);";

#[derive(Debug, Deserialize)]
struct MethodEntry {
    #[serde(default)]
    status: MethodStatus,
    params: Value,
}

/// Parses a `conduit.query` document into method descriptors, ordered by
/// full method name.
pub fn parse_conduit_query(content: &str) -> Result<Vec<MethodDescriptor>> {
    let content = content.trim_start();
    let content = content.strip_prefix(HIJACK_PREFIX).unwrap_or(content);

    let document: Value = serde_json::from_str(content).context("Invalid JSON")?;
    let methods = unwrap_envelope(document)?;

    let entries: BTreeMap<String, MethodEntry> =
        serde_json::from_value(methods).context("Expected an object of method entries")?;

    entries
        .into_iter()
        .map(|(name, entry)| -> Result<MethodDescriptor> {
            let declarations = declarations(&name, entry.params)?;
            let descriptor = MethodDescriptor::from_declarations(&name, entry.status, declarations)
                .with_context(|| format!("Invalid parameter declaration in '{}'", name))?;
            Ok(descriptor)
        })
        .collect()
}

fn unwrap_envelope(document: Value) -> Result<Value> {
    let Value::Object(mut object) = document else {
        return Ok(document);
    };

    if !(object.contains_key("result") && object.contains_key("error_code")) {
        return Ok(Value::Object(object));
    }

    match object.remove("error_code") {
        None | Some(Value::Null) => {}
        Some(code) => {
            let info = object
                .remove("error_info")
                .map(|info| display_value(&info))
                .unwrap_or_default();
            return Err(RegistryError::ConduitError {
                code: display_value(&code),
                info,
            }
            .into());
        }
    }

    Ok(object.remove("result").unwrap_or(Value::Null))
}

/// Extracts `name -> declaration` pairs. PHP encodes an empty map as `[]`.
fn declarations(method: &str, params: Value) -> Result<BTreeMap<String, String>> {
    let invalid = || RegistryError::InvalidParams {
        method: method.to_string(),
    };

    match params {
        Value::Object(map) => map
            .into_iter()
            .map(|(name, declaration)| match declaration {
                Value::String(declaration) => Ok((name, declaration)),
                _ => Err(invalid().into()),
            })
            .collect(),
        Value::Array(items) if items.is_empty() => Ok(BTreeMap::new()),
        _ => Err(invalid().into()),
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
