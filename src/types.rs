//! Canonical schema model emitted as `interfaces.json`.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// HTTP verb every Conduit method is invoked with.
pub const TRANSPORT_METHOD: &str = "POST";

/// Response formats every Conduit method supports.
pub const FORMATS: [&str; 2] = ["json", "human"];

/// Normalized parameter type.
///
/// Serializes as `"int"`, `"bool"`, `"str"` or `"dict"`; a list serializes as a
/// one-element array holding its element type, e.g. `["int"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CanonicalType {
    Int,
    Bool,
    Str,
    Dict,
    List(Box<CanonicalType>),
}

impl CanonicalType {
    /// Wraps `inner` in a list.
    pub fn list(inner: Self) -> Self {
        Self::List(Box::new(inner))
    }

    /// Wire name of a scalar kind, or `None` for lists.
    pub const fn scalar_name(&self) -> Option<&'static str> {
        match self {
            Self::Int => Some("int"),
            Self::Bool => Some("bool"),
            Self::Str => Some("str"),
            Self::Dict => Some("dict"),
            Self::List(_) => None,
        }
    }
}

impl fmt::Display for CanonicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List(inner) => write!(f, "list<{}>", inner),
            scalar => f.write_str(scalar.scalar_name().unwrap_or("str")),
        }
    }
}

impl Serialize for CanonicalType {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::List(inner) => {
                let mut seq = serializer.serialize_seq(Some(1))?;
                seq.serialize_element(inner.as_ref())?;
                seq.end()
            }
            scalar => serializer.serialize_str(scalar.scalar_name().unwrap_or("str")),
        }
    }
}

/// Parameter name to canonical type, ordered by name.
pub type ParamMap = BTreeMap<String, CanonicalType>;

/// Schema for a single API method.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodSchema {
    pub required: ParamMap,
    pub optional: ParamMap,
    /// Parameters declared with a label other than `required`/`optional`,
    /// keyed by that label.
    pub other: BTreeMap<String, ParamMap>,
}

impl MethodSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map for the given optionality label, created on first use.
    pub fn params_mut(&mut self, label: &str) -> &mut ParamMap {
        match label {
            "required" => &mut self.required,
            "optional" => &mut self.optional,
            other => self.other.entry(other.to_string()).or_default(),
        }
    }

    /// Number of parameters across all optionality maps.
    pub fn param_count(&self) -> usize {
        self.required.len()
            + self.optional.len()
            + self.other.values().map(BTreeMap::len).sum::<usize>()
    }
}

impl Serialize for MethodSchema {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(4 + self.other.len()))?;
        map.serialize_entry("required", &self.required)?;
        map.serialize_entry("optional", &self.optional)?;
        map.serialize_entry("method", TRANSPORT_METHOD)?;
        map.serialize_entry("formats", &FORMATS)?;
        for (label, params) in &self.other {
            map.serialize_entry(label, params)?;
        }
        map.end()
    }
}

/// Methods of one group, keyed by action name.
pub type GroupSchema = BTreeMap<String, MethodSchema>;

/// The complete API surface, keyed by group name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ApiSchema {
    groups: BTreeMap<String, GroupSchema>,
}

impl ApiSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Group entry, created empty on first sight.
    pub fn group_mut(&mut self, name: &str) -> &mut GroupSchema {
        self.groups.entry(name.to_string()).or_default()
    }

    pub fn group(&self, name: &str) -> Option<&GroupSchema> {
        self.groups.get(name)
    }

    pub fn method(&self, group: &str, action: &str) -> Option<&MethodSchema> {
        self.groups.get(group)?.get(action)
    }

    pub fn groups(&self) -> impl Iterator<Item = (&str, &GroupSchema)> {
        self.groups.iter().map(|(name, group)| (name.as_str(), group))
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn method_count(&self) -> usize {
        self.groups.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Serializes the schema. Key order is fixed, so equal schemas always
    /// produce identical bytes.
    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}
