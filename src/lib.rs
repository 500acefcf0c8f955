//! # Osmelt - OSM Data Wrangling Toolkit
//!
//! A streaming pipeline that cleans an OpenStreetMap XML export and reshapes
//! it into five flat relational tables (nodes, node tags, ways, way tags,
//! way-node references) ready for bulk loading into a SQL store.
//!
//! ## Modules
//!
//! - **osm**: streaming XML element reader with bounded memory
//! - **shape**: classify, normalize, shape, validate and write records
//! - **audit**: offline diagnostics for discovering new normalizer entries
//!
//! ## Quick Start
//!
//! ```rust
//! use osmelt::osm::OsmReader;
//! use osmelt::shape::{ElementShaper, ShapeConfig, ShapedElement};
//!
//! # fn main() -> anyhow::Result<()> {
//! let xml = r#"<osm>
//!   <node id="757860928" lat="41.9747374" lon="-87.6920102" user="uboot"
//!         uid="26299" version="2" changeset="5288876"
//!         timestamp="2010-07-22T16:16:51Z">
//!     <tag k="amenity" v="fast_food"/>
//!     <tag k="addr:housenumber" v="12"/>
//!   </node>
//! </osm>"#;
//!
//! let mut reader = OsmReader::new(xml.as_bytes());
//! let shaper = ElementShaper::new(ShapeConfig::default());
//!
//! let element = reader.read_element()?.expect("one element");
//! match shaper.shape(&element).expect("nodes are shaped") {
//!     ShapedElement::Node { record, tags } => {
//!         assert_eq!(record.id, "757860928");
//!         assert_eq!(tags[1].key, "housenumber");
//!         assert_eq!(tags[1].tag_type, "addr");
//!     }
//!     _ => unreachable!(),
//! }
//! # Ok(())
//! # }
//! ```

use std::io::BufRead;
use std::path::Path;

use anyhow::Result;

pub mod audit;
pub mod osm;
pub mod shape;

// Re-export commonly used types for convenience
pub use audit::{audit_osm, AuditReport};
pub use osm::{ElementKind, OsmReader, RawElement};
pub use shape::{
    process_osm, ElementShaper, PipelineOptions, ProcessStats, ShapeConfig, ShapedElement,
    TableWriter,
};

/// Main entry point: stream an OSM XML document into the five CSV tables
/// inside `output_dir`.
pub fn shape_to_csv<R: BufRead, P: AsRef<Path>>(
    reader: R,
    output_dir: P,
    options: &PipelineOptions,
) -> Result<ProcessStats> {
    let mut osm_reader = OsmReader::new(reader);
    let mut writer = TableWriter::create_in_dir(output_dir)?;
    process_osm(&mut osm_reader, &mut writer, options, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn shape_to_csv_creates_all_five_tables() {
        let xml = r#"<osm>
            <node id="1" lat="0.0" lon="0.0" user="a" uid="2" version="1"
                  changeset="3" timestamp="2010-07-22T16:16:51Z"/>
        </osm>"#;

        let dir = tempdir().unwrap();
        let stats = shape_to_csv(xml.as_bytes(), dir.path(), &PipelineOptions::default()).unwrap();

        assert_eq!(stats.nodes, 1);
        for name in [
            "nodes.csv",
            "nodes_tags.csv",
            "ways.csv",
            "ways_nodes.csv",
            "ways_tags.csv",
        ] {
            assert!(dir.path().join(name).exists(), "missing {name}");
        }
    }
}
