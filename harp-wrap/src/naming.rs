//! Property-name casing transform

use regex::{Captures, Regex};
use std::sync::LazyLock;

// A run of two or more uppercase letters keeps its first letter; the rest
// of the run is lowercased, except that a run followed by lowercase gives
// its last letter up to start the next word.
static ACRONYM_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("([A-Z])([A-Z]+)($|[A-Z])").expect("valid casing pattern"));

/// Convert a property name to camelCase.
///
/// Underscores are removed, uppercase acronym runs are collapsed
/// (`"HTTPStatus"` becomes `"httpStatus"`), and the first character is
/// lowercased. Pure and deterministic; applied by the engine only to
/// inferred property names on policies with the camel-case flag set.
pub fn to_camel_case(name: &str) -> String {
    let name = name.replace('_', "");
    if name.is_empty() {
        return String::new();
    }

    let name = ACRONYM_RUN.replace_all(&name, |caps: &Captures<'_>| {
        format!("{}{}{}", &caps[1], caps[2].to_lowercase(), &caps[3])
    });

    let mut chars = name.chars();
    let mut out = String::with_capacity(name.len());
    if let Some(first) = chars.next() {
        out.extend(first.to_lowercase());
        out.push_str(chars.as_str());
    }
    out
}
