//! Tag key classification: colon splitting and admission filtering.

use once_cell::sync::Lazy;
use regex::Regex;

/// Tag type assigned to keys without a colon.
pub const DEFAULT_TAG_TYPE: &str = "regular";

/// Characters that cannot appear in a tag key bound for the table schema.
static PROBLEM_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[=\+/&<>;'"\?%#\$@,\. \t\r\n]"#).unwrap());

/// Whether a raw tag key is admissible for emission.
///
/// Keys containing a disallowed character are filtered out entirely; this is
/// a filtering rule, not an error.
pub fn admit(key: &str) -> bool {
    !PROBLEM_CHARS.is_match(key)
}

/// Split a raw tag key into `(type, key)`.
///
/// - no colon: `("regular", key)`
/// - one colon: text before and after the colon
/// - two or more colons: first segment, then the remaining segments with
///   their colons intact (`"addr:street:name"` becomes `("addr", "street:name")`)
pub fn split_key(key: &str) -> (String, String) {
    match key.split_once(':') {
        Some((tag_type, rest)) => (tag_type.to_string(), rest.to_string()),
        None => (DEFAULT_TAG_TYPE.to_string(), key.to_string()),
    }
}
