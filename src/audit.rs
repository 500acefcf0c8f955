//! Offline audits of the free-text address fields.
//!
//! The audits exist to discover which abbreviations and misspellings need
//! entries in the normalizer tables; they never run on the write path.
//! Collections are BTree-based so the report is deterministic.

use std::collections::{BTreeMap, BTreeSet};
use std::io::BufRead;

use anyhow::Result;
use serde::Serialize;

use crate::osm::{ElementKind, OsmReader};

/// Street suffixes that need no mapping entry.
pub const EXPECTED_STREET_TYPES: [&str; 12] = [
    "Street", "Avenue", "Boulevard", "Drive", "Court", "Place", "Square", "Lane", "Road",
    "Trail", "Parkway", "Commons",
];

/// Aggregated audit findings over one input file.
#[derive(Debug, Default, Serialize)]
pub struct AuditReport {
    /// Unexpected street suffix -> the full names that carry it.
    pub unexpected_street_types: BTreeMap<String, BTreeSet<String>>,
    /// Raw postcode value -> number of occurrences.
    pub postcode_counts: BTreeMap<String, u64>,
    /// Distinct raw city spellings.
    pub city_spellings: BTreeSet<String>,
}

impl AuditReport {
    pub fn record_street(&mut self, name: &str) {
        if let Some(suffix) = street_type(name) {
            if !EXPECTED_STREET_TYPES.contains(&suffix) {
                self.unexpected_street_types
                    .entry(suffix.to_string())
                    .or_default()
                    .insert(name.to_string());
            }
        }
    }

    pub fn record_postcode(&mut self, code: &str) {
        *self.postcode_counts.entry(code.to_string()).or_insert(0) += 1;
    }

    pub fn record_city(&mut self, name: &str) {
        self.city_spellings.insert(name.to_string());
    }
}

/// Last whitespace-delimited token of a street name, with a single optional
/// trailing period stripped.
pub fn street_type(name: &str) -> Option<&str> {
    let token = name.split_whitespace().last()?;
    Some(token.strip_suffix('.').unwrap_or(token))
}

/// Scan every node and way in the input and collect the audit report.
pub fn audit_osm<R: BufRead>(reader: &mut OsmReader<R>) -> Result<AuditReport> {
    let mut report = AuditReport::default();
    while let Some(element) = reader.read_element()? {
        if !matches!(element.kind, ElementKind::Node | ElementKind::Way) {
            continue;
        }
        for (key, value) in &element.tags {
            match key.as_str() {
                "addr:street" => report.record_street(value),
                "addr:postcode" => report.record_postcode(value),
                "addr:city" => report.record_city(value),
                _ => {}
            }
        }
    }
    Ok(report)
}
