//! Shaping - clean and flatten OSM elements into relational table records.
//!
//! This module owns the whole write path: classifying tag keys, normalizing
//! free-text address fields, shaping elements into flat records, validating
//! the result and streaming rows into the per-table CSV sinks.

pub mod classify;
pub mod driver;
pub mod normalize;
pub mod shaper;
pub mod types;
pub mod validate;
pub mod writer;

pub use driver::{process_osm, LogProgress, PipelineOptions, ProcessStats, ProgressObserver};
pub use shaper::ElementShaper;
pub use types::{
    NodeRecord, ShapeConfig, ShapedElement, TagRecord, WayNodeRecord, WayRecord,
};
pub use validate::{validate, ValidationError};
pub use writer::TableWriter;
