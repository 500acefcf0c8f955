//! Flat record types for the five output tables.
//!
//! Serde field order on these structs is the table column order; the CSV
//! sinks rely on it matching the header constants below.

use serde::Serialize;

/// Column order of the nodes table.
pub const NODE_FIELDS: [&str; 8] = [
    "id",
    "lat",
    "lon",
    "user",
    "uid",
    "version",
    "changeset",
    "timestamp",
];

/// Column order of the ways table.
pub const WAY_FIELDS: [&str; 6] = ["id", "user", "uid", "version", "changeset", "timestamp"];

/// Column order of both tag tables.
pub const TAG_FIELDS: [&str; 4] = ["id", "key", "value", "type"];

/// Column order of the way-node reference table.
pub const WAY_NODE_FIELDS: [&str; 3] = ["id", "node_id", "position"];

/// One row of the nodes table. Attribute values are carried verbatim as
/// strings; a missing source attribute holds the configured sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeRecord {
    pub id: String,
    pub lat: String,
    pub lon: String,
    pub user: String,
    pub uid: String,
    pub version: String,
    pub changeset: String,
    pub timestamp: String,
}

/// One row of the ways table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WayRecord {
    pub id: String,
    pub user: String,
    pub uid: String,
    pub version: String,
    pub changeset: String,
    pub timestamp: String,
}

/// One row of a tag table. `id` is the owning node or way id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagRecord {
    pub id: String,
    pub key: String,
    pub value: String,
    #[serde(rename = "type")]
    pub tag_type: String,
}

/// One row of the way-node reference table. `position` is the zero-based
/// index of the reference within its way, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WayNodeRecord {
    pub id: String,
    pub node_id: String,
    pub position: usize,
}

/// Everything produced by shaping one top-level element.
///
/// Owned by the driver iteration that produced it and dropped once written.
#[derive(Debug, Clone)]
pub enum ShapedElement {
    Node {
        record: NodeRecord,
        tags: Vec<TagRecord>,
    },
    Way {
        record: WayRecord,
        tags: Vec<TagRecord>,
        node_refs: Vec<WayNodeRecord>,
    },
}

impl ShapedElement {
    /// Id of the owning record.
    pub fn owner_id(&self) -> &str {
        match self {
            ShapedElement::Node { record, .. } => &record.id,
            ShapedElement::Way { record, .. } => &record.id,
        }
    }

    /// Tag records attached to the owning record.
    pub fn tags(&self) -> &[TagRecord] {
        match self {
            ShapedElement::Node { tags, .. } => tags,
            ShapedElement::Way { tags, .. } => tags,
        }
    }

    /// Table-facing name of the element kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ShapedElement::Node { .. } => "node",
            ShapedElement::Way { .. } => "way",
        }
    }
}

/// Configuration for the shaping process.
#[derive(Debug, Clone)]
pub struct ShapeConfig {
    /// Placeholder substituted for a missing required attribute instead of
    /// failing the record.
    pub sentinel: String,
}

impl Default for ShapeConfig {
    fn default() -> Self {
        ShapeConfig {
            sentinel: String::from("9999999"),
        }
    }
}
