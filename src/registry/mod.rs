//! Method registry: where method descriptors come from.
//!
//! The aggregator only needs plain [`MethodDescriptor`] values. Sources are
//! injected through [`MethodRegistry`]: an in-memory [`StaticRegistry`], or a
//! [`RegistrySource`] read from conduit JSON, a TOML manifest, a directory of
//! either, or stdin.

pub mod conduit;
pub mod discovery;
pub mod manifest;

use crate::error::{RegistryError, Result};
use anyhow::Context;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tokio::io::AsyncReadExt;
use tracing::{debug, info};

pub use discovery::{discover_registry_files, expand_tilde};

/// Labels that would collide with the constant keys of a method object.
const RESERVED_LABELS: [&str; 2] = ["method", "formats"];

/// Whether a parameter must be supplied.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Optionality {
    Required,
    Optional,
    /// Any other leading token, kept verbatim.
    Other(String),
}

impl Optionality {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Required => "required",
            Self::Optional => "optional",
            Self::Other(label) => label,
        }
    }
}

impl From<&str> for Optionality {
    fn from(token: &str) -> Self {
        match token {
            "required" => Self::Required,
            "optional" => Self::Optional,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Optionality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parameter declaration of the form `<optionality> <type-string>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawParamSpec {
    pub optionality: Optionality,
    pub type_string: String,
}

impl RawParamSpec {
    pub fn new(optionality: Optionality, type_string: impl Into<String>) -> Self {
        Self {
            optionality,
            type_string: type_string.into(),
        }
    }

    /// Parses a declaration for `param`.
    ///
    /// The first whitespace-separated token is the optionality and the second
    /// is the type string. A missing type yields an empty type string; any
    /// further tokens (author remarks) are dropped.
    pub fn parse(param: &str, declaration: &str) -> std::result::Result<Self, RegistryError> {
        let mut tokens = declaration.split_whitespace();
        let Some(label) = tokens.next() else {
            return Err(RegistryError::EmptyDeclaration {
                param: param.to_string(),
            });
        };

        if RESERVED_LABELS.contains(&label) {
            return Err(RegistryError::ReservedOptionality {
                param: param.to_string(),
                label: label.to_string(),
            });
        }

        Ok(Self::new(
            Optionality::from(label),
            tokens.next().unwrap_or_default(),
        ))
    }
}

/// Lifecycle status reported by a method.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum MethodStatus {
    #[default]
    Stable,
    Unstable,
    Deprecated,
    Frozen,
    Other(String),
}

impl MethodStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Stable => "stable",
            Self::Unstable => "unstable",
            Self::Deprecated => "deprecated",
            Self::Frozen => "frozen",
            Self::Other(status) => status,
        }
    }
}

impl FromStr for MethodStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "stable" => Self::Stable,
            "unstable" => Self::Unstable,
            "deprecated" => Self::Deprecated,
            "frozen" => Self::Frozen,
            other => Self::Other(other.to_string()),
        })
    }
}

impl<'de> Deserialize<'de> for MethodStatus {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let Ok(status) = s.parse::<Self>();
        Ok(status)
    }
}

impl fmt::Display for MethodStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One callable API method as reported by the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    /// Fully-qualified name, `<group>.<action>`.
    pub full_name: String,
    pub status: MethodStatus,
    pub params: BTreeMap<String, RawParamSpec>,
}

impl MethodDescriptor {
    pub fn new(full_name: impl Into<String>, status: MethodStatus) -> Self {
        Self {
            full_name: full_name.into(),
            status,
            params: BTreeMap::new(),
        }
    }

    /// Builds a descriptor from raw `name -> declaration` strings.
    pub fn from_declarations<I, K, V>(
        full_name: impl Into<String>,
        status: MethodStatus,
        declarations: I,
    ) -> std::result::Result<Self, RegistryError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let mut descriptor = Self::new(full_name, status);
        for (name, declaration) in declarations {
            let name = name.into();
            let spec = RawParamSpec::parse(&name, declaration.as_ref())?;
            descriptor.params.insert(name, spec);
        }
        Ok(descriptor)
    }

    /// Adds a parameter, replacing any previous declaration of the same name.
    pub fn with_param(mut self, name: impl Into<String>, spec: RawParamSpec) -> Self {
        self.params.insert(name.into(), spec);
        self
    }
}

/// A data source that enumerates method descriptors.
#[allow(async_fn_in_trait)]
pub trait MethodRegistry {
    async fn methods(&self) -> Result<Vec<MethodDescriptor>>;
}

/// Descriptors held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    descriptors: Vec<MethodDescriptor>,
}

impl StaticRegistry {
    pub fn new(descriptors: Vec<MethodDescriptor>) -> Self {
        Self { descriptors }
    }
}

impl MethodRegistry for StaticRegistry {
    async fn methods(&self) -> Result<Vec<MethodDescriptor>> {
        Ok(self.descriptors.clone())
    }
}

/// A registry location given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrySource {
    /// A `conduit.query` response saved as JSON.
    ConduitQuery(PathBuf),
    /// A TOML manifest of `[[method]]` tables.
    Manifest(PathBuf),
    /// A directory searched for `.json` and `.toml` registry files.
    Directory(PathBuf),
    /// A `conduit.query` JSON document on standard input.
    Stdin,
}

impl RegistrySource {
    /// Classifies a command-line argument. `-` means stdin; directories are
    /// walked; files are typed by extension.
    pub fn from_arg(arg: &str) -> std::result::Result<Self, RegistryError> {
        if arg == "-" {
            return Ok(Self::Stdin);
        }

        let path = PathBuf::from(expand_tilde(arg).as_ref());
        if path.is_dir() {
            return Ok(Self::Directory(path));
        }
        Self::from_file(path)
    }

    /// Classifies a file by its extension.
    pub fn from_file(path: PathBuf) -> std::result::Result<Self, RegistryError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::ConduitQuery(path)),
            Some("toml") => Ok(Self::Manifest(path)),
            _ => Err(RegistryError::UnsupportedSource { path }),
        }
    }
}

impl fmt::Display for RegistrySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConduitQuery(path) | Self::Manifest(path) | Self::Directory(path) => {
                write!(f, "{}", path.display())
            }
            Self::Stdin => f.write_str("<stdin>"),
        }
    }
}

impl RegistrySource {
    /// Reads the source. Directory walks leave out `exclude`, the file the
    /// schema is being written to, so a previous run's output is not read
    /// back as a registry.
    pub async fn load(&self, exclude: Option<&Path>) -> Result<Vec<MethodDescriptor>> {
        let methods = match self {
            Self::ConduitQuery(path) | Self::Manifest(path) => load_file(self, path).await?,
            Self::Directory(root) => load_directory(root, exclude).await?,
            Self::Stdin => {
                let mut content = String::new();
                tokio::io::stdin()
                    .read_to_string(&mut content)
                    .await
                    .context("Failed to read registry from stdin")?;
                conduit::parse_conduit_query(&content)
                    .context("Failed to parse conduit registry from stdin")?
            }
        };

        info!("Loaded {} methods from {}", methods.len(), self);
        Ok(methods)
    }
}

impl MethodRegistry for RegistrySource {
    async fn methods(&self) -> Result<Vec<MethodDescriptor>> {
        self.load(None).await
    }
}

/// Loads every source in order and concatenates their descriptors.
pub async fn load_all(
    sources: &[RegistrySource],
    exclude: Option<&Path>,
) -> Result<Vec<MethodDescriptor>> {
    let mut methods = Vec::new();
    for source in sources {
        methods.extend(source.load(exclude).await?);
    }
    Ok(methods)
}

async fn load_directory(root: &Path, exclude: Option<&Path>) -> Result<Vec<MethodDescriptor>> {
    let files = discover_registry_files(root, exclude).await?;
    debug!(
        "Discovered {} registry files under {}",
        files.len(),
        root.display()
    );

    let mut methods = Vec::new();
    for file in files {
        let source = RegistrySource::from_file(file.clone())?;
        let loaded = load_file(&source, &file).await?;
        debug!("Loaded {} methods from {}", loaded.len(), file.display());
        methods.extend(loaded);
    }
    Ok(methods)
}

async fn load_file(source: &RegistrySource, path: &Path) -> Result<Vec<MethodDescriptor>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read registry file {}", path.display()))?;

    match source {
        RegistrySource::Manifest(_) => manifest::parse_manifest(&content)
            .with_context(|| format!("Failed to parse manifest {}", path.display())),
        _ => conduit::parse_conduit_query(&content)
            .with_context(|| format!("Failed to parse conduit registry {}", path.display())),
    }
}
