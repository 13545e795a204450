//! Aggregation of method descriptors into the nested [`ApiSchema`].

use crate::error::SchemaError;
use crate::registry::{MethodDescriptor, MethodStatus};
use crate::type_map::map_type;
use crate::types::{ApiSchema, MethodSchema};
use std::collections::BTreeMap;
use tracing::{debug, warn};
use xxhash_rust::xxh3::xxh3_64;

/// Splits `<group>.<action>` into its group and action.
///
/// The group is the text before the first `.` and the action the text after
/// the last one; anything in between is dropped.
pub fn split_method_name(full_name: &str) -> Result<(&str, &str), SchemaError> {
    let malformed = || SchemaError::MalformedMethodName {
        name: full_name.to_string(),
    };

    let (group, _) = full_name.split_once('.').ok_or_else(malformed)?;
    let (_, action) = full_name.rsplit_once('.').ok_or_else(malformed)?;

    if group.is_empty() || action.is_empty() {
        return Err(malformed());
    }
    Ok((group, action))
}

/// Builds the schema for a sequence of descriptors.
///
/// Each parameter's type string is normalized with [`map_type`] and filed
/// under its optionality. Group, action and parameter keys come out sorted. A
/// second descriptor for the same group and action replaces the first.
pub fn build_schema<'a, I>(methods: I) -> Result<ApiSchema, SchemaError>
where
    I: IntoIterator<Item = &'a MethodDescriptor>,
{
    let mut schema = ApiSchema::new();
    let mut statuses: BTreeMap<&str, usize> = BTreeMap::new();

    for descriptor in methods {
        let (group, action) = split_method_name(&descriptor.full_name)?;
        *statuses.entry(descriptor.status.as_str()).or_default() += 1;

        let mut method = MethodSchema::new();
        for (name, spec) in &descriptor.params {
            method
                .params_mut(spec.optionality.as_str())
                .insert(name.clone(), map_type(&spec.type_string));
        }

        if descriptor.status != MethodStatus::Stable {
            debug!("{} is {}", descriptor.full_name, descriptor.status);
        }

        if schema
            .group_mut(group)
            .insert(action.to_string(), method)
            .is_some()
        {
            warn!(
                "Duplicate method {}.{}: keeping the later definition",
                group, action
            );
        }
    }

    debug!("Method status counts: {:?}", statuses);
    Ok(schema)
}

/// xxh3 digest of serialized schema bytes, as 16 lowercase hex characters.
pub fn schema_digest(bytes: &[u8]) -> String {
    format!("{:016x}", xxh3_64(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{Optionality, RawParamSpec};
    use crate::types::CanonicalType;
    use assert2::{check, let_assert};
    use rstest::rstest;

    fn descriptor(name: &str, params: &[(&str, &str)]) -> MethodDescriptor {
        MethodDescriptor::from_declarations(name, MethodStatus::Stable, params.iter().copied())
            .unwrap()
    }

    #[rstest]
    #[case("user.whoami", "user", "whoami")]
    #[case("differential.revision.edit", "differential", "edit")]
    #[case("a.b.c.d", "a", "d")]
    fn test_split_method_name(#[case] name: &str, #[case] group: &str, #[case] action: &str) {
        let_assert!(Ok((g, a)) = split_method_name(name));
        check!(g == group);
        check!(a == action);
    }

    #[rstest]
    #[case("whoami")]
    #[case("")]
    #[case(".whoami")]
    #[case("user.")]
    fn test_split_malformed_method_name(#[case] name: &str) {
        let_assert!(Err(err) = split_method_name(name));
        check!(
            err == SchemaError::MalformedMethodName {
                name: name.to_string()
            }
        );
    }

    #[test]
    fn test_params_partitioned_by_optionality() {
        let methods = [descriptor(
            "differential.query",
            &[
                ("ids", "optional list<uint>"),
                ("query", "required string"),
                ("limit", "optional uint"),
            ],
        )];

        let_assert!(Ok(schema) = build_schema(&methods));
        let_assert!(Some(method) = schema.method("differential", "query"));
        check!(method.required.len() == 1);
        check!(method.required["query"] == CanonicalType::Str);
        check!(method.optional.len() == 2);
        check!(method.optional["ids"] == CanonicalType::list(CanonicalType::Int));
        check!(method.optional["limit"] == CanonicalType::Int);
        check!(method.other.is_empty());
    }

    #[test]
    fn test_unknown_optionality_kept_under_its_label() {
        let methods = [descriptor("user.find", &[("aliases", "nonempty list")])];

        let_assert!(Ok(schema) = build_schema(&methods));
        let_assert!(Some(method) = schema.method("user", "find"));
        check!(method.required.is_empty());
        check!(method.optional.is_empty());
        check!(method.other["nonempty"]["aliases"] == CanonicalType::list(CanonicalType::Str));
    }

    #[test]
    fn test_duplicate_action_last_write_wins() {
        let methods = [
            descriptor("user.query", &[("limit", "optional int")]),
            descriptor("user.query", &[("phids", "required list<phid>")]),
        ];

        let_assert!(Ok(schema) = build_schema(&methods));
        let_assert!(Some(method) = schema.method("user", "query"));
        check!(method.optional.is_empty());
        check!(method.required["phids"] == CanonicalType::list(CanonicalType::Str));
        check!(schema.method_count() == 1);
    }

    #[test]
    fn test_middle_segments_collapse_onto_same_action() {
        let methods = [
            descriptor("project.column.search", &[("a", "optional int")]),
            descriptor("project.search", &[("b", "optional bool")]),
        ];

        let_assert!(Ok(schema) = build_schema(&methods));
        let_assert!(Some(method) = schema.method("project", "search"));
        check!(method.optional.keys().collect::<Vec<_>>() == vec!["b"]);
    }

    #[test]
    fn test_malformed_name_fails_whole_build() {
        let methods = [
            descriptor("user.whoami", &[]),
            MethodDescriptor::new("nodot", MethodStatus::Stable),
        ];

        let_assert!(Err(SchemaError::MalformedMethodName { name }) = build_schema(&methods));
        check!(name == "nodot");
    }

    #[test]
    fn test_status_does_not_filter() {
        let methods = [
            MethodDescriptor::new("user.old", MethodStatus::Deprecated),
            MethodDescriptor::new("user.new", MethodStatus::Unstable).with_param(
                "x",
                RawParamSpec::new(Optionality::Required, "bool"),
            ),
        ];

        let_assert!(Ok(schema) = build_schema(&methods));
        check!(schema.method_count() == 2);
        check!(schema.method("user", "old").is_some());
    }

    #[test]
    fn test_empty_registry_yields_empty_schema() {
        let_assert!(Ok(schema) = build_schema(std::iter::empty::<&MethodDescriptor>()));
        check!(schema.is_empty());
    }

    #[test]
    fn test_schema_digest() {
        let digest = schema_digest(b"{}");
        check!(digest.len() == 16);
        check!(digest == schema_digest(b"{}"));
        check!(digest != schema_digest(b"[]"));
    }
}
