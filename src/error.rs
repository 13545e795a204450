//! Error handling types and utilities.

use std::path::PathBuf;
use thiserror::Error;

/// A specialized Result type for conduit-interfaces operations.
///
/// This is an alias for `anyhow::Result` with context added via `.context()` and
/// `.with_context()` methods throughout the codebase.
pub type Result<T> = anyhow::Result<T>;

/// Structural violations detected while aggregating method descriptors.
///
/// These indicate a bug in the registry that produced the descriptors, so the
/// whole run fails rather than emitting a partial schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The full method name lacks a `.` separator or has an empty group/action.
    #[error("malformed method name '{name}': expected '<group>.<action>'")]
    MalformedMethodName { name: String },
}

/// Errors raised while reading method descriptors from a registry source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A parameter declaration with no tokens at all.
    #[error("empty declaration for parameter '{param}'")]
    EmptyDeclaration { param: String },

    /// An optionality label that would shadow a per-method constant key.
    #[error("parameter '{param}' uses reserved optionality label '{label}'")]
    ReservedOptionality { param: String, label: String },

    /// The conduit response envelope reported an API error.
    #[error("conduit returned {code}: {info}")]
    ConduitError { code: String, info: String },

    /// A `params` value that is neither an object nor an empty array.
    #[error("method '{method}' has invalid params: expected an object of declarations")]
    InvalidParams { method: String },

    /// A registry file whose extension is not `.json` or `.toml`.
    #[error("unsupported registry source {}: expected a .json or .toml file", path.display())]
    UnsupportedSource { path: PathBuf },
}
