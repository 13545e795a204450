//! Generates a canonical description of a Conduit API surface.
//!
//! Method descriptors are read from a [`registry`], each parameter's free-form
//! type annotation is normalized by [`type_map::map_type`], and
//! [`schema::build_schema`] groups the results into a sorted [`ApiSchema`]
//! ready for byte-stable JSON serialization.

pub mod cli;
pub mod emit;
pub mod error;
pub mod registry;
pub mod schema;
pub mod tracing;
pub mod type_map;
pub mod types;

pub use error::{RegistryError, Result, SchemaError};
pub use registry::{
    MethodDescriptor, MethodRegistry, MethodStatus, Optionality, RawParamSpec, RegistrySource,
    StaticRegistry,
};
pub use schema::build_schema;
pub use type_map::map_type;
pub use types::{ApiSchema, CanonicalType, GroupSchema, MethodSchema};
