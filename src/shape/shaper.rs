//! The element shaper: one parsed element in, flat records out.

use crate::osm::{ElementKind, RawElement};
use crate::shape::classify;
use crate::shape::normalize::{normalize_city, normalize_postcode, normalize_street};
use crate::shape::types::{
    NodeRecord, ShapeConfig, ShapedElement, TagRecord, WayNodeRecord, WayRecord,
};

/// Converts one raw node or way element into its flat table records.
///
/// The shaper is pure: no I/O, no logging, no state beyond its configuration.
/// Progress reporting belongs to the driver.
pub struct ElementShaper {
    config: ShapeConfig,
}

impl ElementShaper {
    pub fn new(config: ShapeConfig) -> Self {
        ElementShaper { config }
    }

    /// Shape a raw element, or `None` when its kind has no output table.
    pub fn shape(&self, element: &RawElement) -> Option<ShapedElement> {
        match element.kind {
            ElementKind::Node => {
                let record = NodeRecord {
                    id: self.attr_or_sentinel(element, "id"),
                    lat: self.attr_or_sentinel(element, "lat"),
                    lon: self.attr_or_sentinel(element, "lon"),
                    user: self.attr_or_sentinel(element, "user"),
                    uid: self.attr_or_sentinel(element, "uid"),
                    version: self.attr_or_sentinel(element, "version"),
                    changeset: self.attr_or_sentinel(element, "changeset"),
                    timestamp: self.attr_or_sentinel(element, "timestamp"),
                };
                let tags = self.shape_tags(&record.id, element);
                Some(ShapedElement::Node { record, tags })
            }
            ElementKind::Way => {
                let record = WayRecord {
                    id: self.attr_or_sentinel(element, "id"),
                    user: self.attr_or_sentinel(element, "user"),
                    uid: self.attr_or_sentinel(element, "uid"),
                    version: self.attr_or_sentinel(element, "version"),
                    changeset: self.attr_or_sentinel(element, "changeset"),
                    timestamp: self.attr_or_sentinel(element, "timestamp"),
                };
                let tags = self.shape_tags(&record.id, element);
                let node_refs = element
                    .node_refs
                    .iter()
                    .enumerate()
                    .map(|(position, node_id)| WayNodeRecord {
                        id: record.id.clone(),
                        node_id: node_id.clone(),
                        position,
                    })
                    .collect();
                Some(ShapedElement::Way {
                    record,
                    tags,
                    node_refs,
                })
            }
            ElementKind::Relation => None,
        }
    }

    /// Attribute value, or the configured sentinel when absent.
    fn attr_or_sentinel(&self, element: &RawElement, name: &str) -> String {
        element
            .attr(name)
            .map(str::to_string)
            .unwrap_or_else(|| self.config.sentinel.clone())
    }

    /// Shape the element's tag children in document order, dropping keys
    /// with disallowed characters and cleaning address values.
    fn shape_tags(&self, owner_id: &str, element: &RawElement) -> Vec<TagRecord> {
        element
            .tags
            .iter()
            .filter(|(key, _)| classify::admit(key))
            .map(|(key, value)| {
                let (tag_type, short_key) = classify::split_key(key);
                TagRecord {
                    id: owner_id.to_string(),
                    key: short_key,
                    value: clean_value(key, value),
                    tag_type,
                }
            })
            .collect()
    }
}

/// Route address values through the matching normalizer; everything else is
/// stored verbatim.
fn clean_value(raw_key: &str, value: &str) -> String {
    match raw_key {
        "addr:street" => normalize_street(value),
        "addr:postcode" => normalize_postcode(value),
        "addr:city" => normalize_city(value),
        _ => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn node_element(attrs: &[(&str, &str)], tags: &[(&str, &str)]) -> RawElement {
        RawElement {
            kind: ElementKind::Node,
            attrs: to_map(attrs),
            tags: to_tags(tags),
            node_refs: Vec::new(),
        }
    }

    fn way_element(attrs: &[(&str, &str)], tags: &[(&str, &str)], refs: &[&str]) -> RawElement {
        RawElement {
            kind: ElementKind::Way,
            attrs: to_map(attrs),
            tags: to_tags(tags),
            node_refs: refs.iter().map(|r| r.to_string()).collect(),
        }
    }

    fn to_map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn to_tags(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn shaper() -> ElementShaper {
        ElementShaper::new(ShapeConfig::default())
    }

    #[test]
    fn shapes_node_with_classified_tags() {
        let element = node_element(
            &[
                ("id", "757860928"),
                ("user", "uboot"),
                ("uid", "26299"),
                ("version", "2"),
                ("lat", "41.9747374"),
                ("lon", "-87.6920102"),
                ("timestamp", "2010-07-22T16:16:51Z"),
                ("changeset", "5288876"),
            ],
            &[("amenity", "fast_food"), ("addr:housenumber", "12")],
        );

        let shaped = shaper().shape(&element).unwrap();
        match shaped {
            ShapedElement::Node { record, tags } => {
                assert_eq!(record.id, "757860928");
                assert_eq!(record.lat, "41.9747374");
                assert_eq!(
                    tags,
                    vec![
                        TagRecord {
                            id: "757860928".to_string(),
                            key: "amenity".to_string(),
                            value: "fast_food".to_string(),
                            tag_type: "regular".to_string(),
                        },
                        TagRecord {
                            id: "757860928".to_string(),
                            key: "housenumber".to_string(),
                            value: "12".to_string(),
                            tag_type: "addr".to_string(),
                        },
                    ]
                );
            }
            _ => panic!("expected a node"),
        }
    }

    #[test]
    fn missing_attributes_get_the_sentinel() {
        let element = way_element(
            &[
                ("id", "209809850"),
                ("uid", "674454"),
                ("version", "1"),
                ("timestamp", "2013-03-13T15:58:04Z"),
                ("changeset", "15353317"),
            ],
            &[],
            &[],
        );

        let shaped = shaper().shape(&element).unwrap();
        match shaped {
            ShapedElement::Way { record, .. } => {
                assert_eq!(record.user, "9999999");
                assert_eq!(record.id, "209809850");
            }
            _ => panic!("expected a way"),
        }
    }

    #[test]
    fn way_node_positions_are_dense_and_ordered() {
        let element = way_element(
            &[("id", "7")],
            &[],
            &["2199822281", "2199822390", "2199822281"],
        );

        let shaped = shaper().shape(&element).unwrap();
        match shaped {
            ShapedElement::Way { node_refs, .. } => {
                assert_eq!(node_refs.len(), 3);
                for (index, node_ref) in node_refs.iter().enumerate() {
                    assert_eq!(node_ref.position, index);
                    assert_eq!(node_ref.id, "7");
                }
                assert_eq!(node_refs[2].node_id, "2199822281");
            }
            _ => panic!("expected a way"),
        }
    }

    #[test]
    fn problematic_keys_are_dropped_silently() {
        let element = node_element(
            &[("id", "1")],
            &[
                ("good_key", "kept"),
                ("bad key", "dropped"),
                ("also=bad", "dropped"),
            ],
        );

        let shaped = shaper().shape(&element).unwrap();
        assert_eq!(shaped.tags().len(), 1);
        assert_eq!(shaped.tags()[0].key, "good_key");
    }

    #[test]
    fn address_values_are_cleaned() {
        let element = node_element(
            &[("id", "1")],
            &[
                ("addr:street", "N 3rd St"),
                ("addr:postcode", "63301-1234 USA"),
                ("addr:city", "O Fallon"),
            ],
        );

        let shaped = shaper().shape(&element).unwrap();
        let values: Vec<&str> = shaped.tags().iter().map(|t| t.value.as_str()).collect();
        assert_eq!(values, vec!["North Third Street", "63301", "O'Fallon"]);
    }

    #[test]
    fn relations_are_skipped() {
        let element = RawElement {
            kind: ElementKind::Relation,
            attrs: to_map(&[("id", "5")]),
            tags: to_tags(&[("type", "multipolygon")]),
            node_refs: Vec::new(),
        };
        assert!(shaper().shape(&element).is_none());
    }
}
