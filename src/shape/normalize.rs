//! Free-text field normalizers for street names, postal codes and city names.
//!
//! Every lookup table here is immutable configuration discovered by auditing
//! the source data (see [`crate::audit`]), not runtime state.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

/// Abbreviation-to-full-word replacements applied per whitespace token.
///
/// Keyed on the lowercased token so casing variants of an abbreviation all
/// canonicalize in one pass; the canonical outputs never lowercase back onto
/// a key, which is what keeps repeated normalization stable.
static STREET_MAPPING: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("st", "Street"),
        ("rd.", "Road"),
        ("rd", "Road"),
        ("n.", "North"),
        ("n", "North"),
        ("s.", "South"),
        ("blvd", "Boulevard"),
        ("blvd.", "Boulevard"),
        ("expy", "Expressway"),
        ("ln", "Lane"),
        ("ctr", "Center"),
        ("ctr.", "Center"),
        ("5th", "Fifth"),
        ("4th", "Fourth"),
        ("3rd", "Third"),
        ("2nd", "Second"),
        ("1st", "First"),
    ])
});

/// Known-bad whole-string inputs with hand-corrected replacements.
///
/// These are data-quality patches for individual entries in the source data,
/// not general rules, so they match the entire raw value (lowercased, for
/// the same single-pass reason as the token table).
static STREET_PATCHES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("dade", "South Dade Avenue"),
        ("mo-94", "Highway 94"),
    ])
});

/// Prefixes that opt a street name out of normalization entirely.
///
/// Route-numbered roads and suite designators legitimately end in a bare
/// direction letter ("Route N"); running the token mapping over them would
/// corrupt the name.
const PROTECTED_PREFIXES: [&str; 2] = ["route", "suite"];

static POSTCODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\D*(\d{5})").unwrap());

/// City corrections applied per whitespace token.
static CITY_MAPPING: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("St", "Saint"),
        ("St.", "Saint"),
        ("bridgeton", "Bridgeton"),
        ("drive-through", "O'Fallon"),
        ("Bass", "Saint"),
        ("Pro", "Charles"),
        ("Drive", ""),
        ("UNINCORPORATED", "Saint Peters"),
    ])
});

/// Token corrections for city names starting with "o", which the source data
/// writes inconsistently as "O'Fallon" and "O Fallon".
static OFALLON_MAPPING: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| HashMap::from([("O", "O'")]));

/// Canonicalize a street name.
///
/// Tokens are looked up case-insensitively in the abbreviation table and
/// replaced with the canonical word, otherwise title-cased; the result is
/// rejoined with single spaces. Protected-prefix names are returned
/// unchanged, and a handful of known-bad literal inputs map to
/// hand-corrected outputs.
/// Applying the function twice yields the same result as applying it once,
/// except for protected-prefix inputs which are never touched at all.
pub fn normalize_street(name: &str) -> String {
    let lowered = name.to_lowercase();
    if PROTECTED_PREFIXES
        .iter()
        .any(|prefix| lowered.starts_with(prefix))
    {
        return name.to_string();
    }
    if let Some(patched) = STREET_PATCHES.get(lowered.as_str()) {
        return (*patched).to_string();
    }

    name.split_whitespace()
        .map(|token| match STREET_MAPPING.get(token.to_lowercase().as_str()) {
            Some(full) => (*full).to_string(),
            None => title_case(token),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extract the 5-digit postal code from a raw value.
///
/// Leading non-digit noise and anything after the first five digits (plus-4
/// extensions, state suffixes) are discarded. Returns an empty string when
/// no 5-digit run exists; downstream consumers tolerate empty postcodes.
pub fn normalize_postcode(code: &str) -> String {
    POSTCODE_RE
        .captures(code)
        .map(|captures| captures[1].to_string())
        .unwrap_or_default()
}

/// Canonicalize a city name.
///
/// Tokens go through the corrections table, get title-cased and are rejoined
/// with spaces. Inputs whose lowercase form starts with "o" go through the
/// O'Fallon table instead and are joined with no separator, turning
/// "O Fallon" into "O'Fallon". The separator-free join is an intentional,
/// documented divergence from the general rule.
pub fn normalize_city(name: &str) -> String {
    if name.to_lowercase().starts_with('o') {
        name.split_whitespace()
            .map(|token| title_case(OFALLON_MAPPING.get(token).copied().unwrap_or(token)))
            .collect::<String>()
    } else {
        name.split_whitespace()
            .map(|token| title_case(CITY_MAPPING.get(token).copied().unwrap_or(token)))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Uppercase the first letter of each alphabetic run, lowercase the rest.
///
/// Runs restart after any non-letter, so "o'fallon" becomes "O'Fallon".
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_was_letter = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if prev_was_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_was_letter = true;
        } else {
            out.push(ch);
            prev_was_letter = false;
        }
    }
    out
}
