//! Ordered-column CSV sinks, one per output table.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::shape::types::{
    ShapedElement, NODE_FIELDS, TAG_FIELDS, WAY_FIELDS, WAY_NODE_FIELDS,
};

pub const NODES_FILE: &str = "nodes.csv";
pub const NODE_TAGS_FILE: &str = "nodes_tags.csv";
pub const WAYS_FILE: &str = "ways.csv";
pub const WAY_NODES_FILE: &str = "ways_nodes.csv";
pub const WAY_TAGS_FILE: &str = "ways_tags.csv";

/// Writes shaped elements to the five output tables.
///
/// Header rows are written up front from the fixed field-order constants, so
/// even an empty table carries its column names.
pub struct TableWriter<W: Write> {
    nodes: csv::Writer<W>,
    node_tags: csv::Writer<W>,
    ways: csv::Writer<W>,
    way_nodes: csv::Writer<W>,
    way_tags: csv::Writer<W>,
}

impl TableWriter<File> {
    /// Create the five CSV files inside `dir`, creating the directory first
    /// if needed.
    pub fn create_in_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create output directory {}", dir.display()))?;

        let create = |name: &str| -> Result<File> {
            File::create(dir.join(name))
                .with_context(|| format!("failed to create {}", dir.join(name).display()))
        };

        TableWriter::from_writers(
            create(NODES_FILE)?,
            create(NODE_TAGS_FILE)?,
            create(WAYS_FILE)?,
            create(WAY_NODES_FILE)?,
            create(WAY_TAGS_FILE)?,
        )
    }
}

impl<W: Write> TableWriter<W> {
    /// Wrap five raw writers; immediately writes each table's header row.
    pub fn from_writers(nodes: W, node_tags: W, ways: W, way_nodes: W, way_tags: W) -> Result<Self> {
        let wrap = |sink: W| {
            csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(sink)
        };
        let mut writer = TableWriter {
            nodes: wrap(nodes),
            node_tags: wrap(node_tags),
            ways: wrap(ways),
            way_nodes: wrap(way_nodes),
            way_tags: wrap(way_tags),
        };
        writer.nodes.write_record(NODE_FIELDS)?;
        writer.node_tags.write_record(TAG_FIELDS)?;
        writer.ways.write_record(WAY_FIELDS)?;
        writer.way_nodes.write_record(WAY_NODE_FIELDS)?;
        writer.way_tags.write_record(TAG_FIELDS)?;
        Ok(writer)
    }

    /// Route one shaped element's records to their tables.
    pub fn write_element(&mut self, element: &ShapedElement) -> Result<()> {
        match element {
            ShapedElement::Node { record, tags } => {
                self.nodes
                    .serialize(record)
                    .context("failed to write node record")?;
                for tag in tags {
                    self.node_tags
                        .serialize(tag)
                        .context("failed to write node tag record")?;
                }
            }
            ShapedElement::Way {
                record,
                tags,
                node_refs,
            } => {
                self.ways
                    .serialize(record)
                    .context("failed to write way record")?;
                for tag in tags {
                    self.way_tags
                        .serialize(tag)
                        .context("failed to write way tag record")?;
                }
                for node_ref in node_refs {
                    self.way_nodes
                        .serialize(node_ref)
                        .context("failed to write way node record")?;
                }
            }
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.nodes.flush().context("failed to flush nodes table")?;
        self.node_tags
            .flush()
            .context("failed to flush node tags table")?;
        self.ways.flush().context("failed to flush ways table")?;
        self.way_nodes
            .flush()
            .context("failed to flush way nodes table")?;
        self.way_tags
            .flush()
            .context("failed to flush way tags table")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::types::{NodeRecord, TagRecord};

    #[test]
    fn headers_are_written_even_for_empty_tables() {
        let mut writer = TableWriter::from_writers(
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
        )
        .unwrap();
        writer.flush().unwrap();

        let nodes = String::from_utf8(writer.nodes.into_inner().unwrap()).unwrap();
        assert_eq!(
            nodes.trim_end(),
            "id,lat,lon,user,uid,version,changeset,timestamp"
        );
        let way_nodes = String::from_utf8(writer.way_nodes.into_inner().unwrap()).unwrap();
        assert_eq!(way_nodes.trim_end(), "id,node_id,position");
    }

    #[test]
    fn node_rows_follow_the_column_order() {
        let mut writer = TableWriter::from_writers(
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
        )
        .unwrap();

        let element = ShapedElement::Node {
            record: NodeRecord {
                id: "1".to_string(),
                lat: "41.9".to_string(),
                lon: "-87.6".to_string(),
                user: "uboot".to_string(),
                uid: "26299".to_string(),
                version: "2".to_string(),
                changeset: "5288876".to_string(),
                timestamp: "2010-07-22T16:16:51Z".to_string(),
            },
            tags: vec![TagRecord {
                id: "1".to_string(),
                key: "amenity".to_string(),
                value: "fast_food".to_string(),
                tag_type: "regular".to_string(),
            }],
        };
        writer.write_element(&element).unwrap();
        writer.flush().unwrap();

        let nodes = String::from_utf8(writer.nodes.into_inner().unwrap()).unwrap();
        let mut lines = nodes.lines();
        assert_eq!(
            lines.next(),
            Some("id,lat,lon,user,uid,version,changeset,timestamp")
        );
        assert_eq!(
            lines.next(),
            Some("1,41.9,-87.6,uboot,26299,2,5288876,2010-07-22T16:16:51Z")
        );

        let node_tags = String::from_utf8(writer.node_tags.into_inner().unwrap()).unwrap();
        assert_eq!(node_tags.lines().nth(1), Some("1,amenity,fast_food,regular"));
    }
}
