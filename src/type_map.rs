//! Normalization of free-form parameter type annotations.
//!
//! Method authors describe parameter types with loose strings such as `int`,
//! `revision_id`, `list<phid>` or `dict<string, wild>`. These are folded into
//! the closed [`CanonicalType`] set. Anything unrecognized becomes `Str`; the
//! annotations are documentation, not a validated type language, so this
//! function never fails.

use crate::types::CanonicalType;
use regex::Regex;
use std::sync::LazyLock;

static ALPHA_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[[:alpha:]]+").expect("static regex is valid"));

/// Maps a raw type annotation to its canonical type.
///
/// Only the text before the first `<` selects the kind. For `list`, the first
/// alphabetic run after the `<` is mapped as the element type, defaulting to
/// `Str` when there is none.
pub fn map_type(raw: &str) -> CanonicalType {
    let (head, rest) = match raw.split_once('<') {
        Some((head, rest)) => (head, Some(rest)),
        None => (raw, None),
    };

    match head {
        "int" | "uint" | "revisionid" | "revision_id" | "diffid" | "diff_id" | "id" | "enum" => {
            CanonicalType::Int
        }
        "bool" => CanonicalType::Bool,
        "dict" => CanonicalType::Dict,
        "list" => {
            let element = rest
                .and_then(|rest| ALPHA_RUN.find(rest))
                .map_or(CanonicalType::Str, |run| map_type(run.as_str()));
            CanonicalType::list(element)
        }
        _ => CanonicalType::Str,
    }
}
