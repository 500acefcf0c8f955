//! The streaming driver: read, shape, validate, write, one element at a time.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use log::info;

use crate::osm::OsmReader;
use crate::shape::shaper::ElementShaper;
use crate::shape::types::{ShapeConfig, ShapedElement};
use crate::shape::validate::validate;
use crate::shape::writer::TableWriter;

/// Counters advanced as the driver walks the input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessStats {
    /// Top-level elements pulled from the input, shaped or not.
    pub elements: u64,
    pub nodes: u64,
    pub ways: u64,
    pub node_tags: u64,
    pub way_tags: u64,
    pub way_nodes: u64,
    /// Elements whose kind has no output table (relations).
    pub skipped: u64,
}

/// Diagnostic hook invoked by the driver after each input element.
///
/// Observers live outside the data path; the shaper itself never reports.
pub trait ProgressObserver {
    fn element_processed(&mut self, stats: &ProcessStats);
}

/// Observer that logs running counters every `every` elements.
pub struct LogProgress {
    every: u64,
}

impl LogProgress {
    pub fn new(every: u64) -> Self {
        LogProgress { every }
    }
}

impl ProgressObserver for LogProgress {
    fn element_processed(&mut self, stats: &ProcessStats) {
        if self.every > 0 && stats.elements % self.every == 0 {
            info!(
                elements = stats.elements,
                nodes = stats.nodes,
                ways = stats.ways,
                skipped = stats.skipped;
                "processed elements"
            );
        }
    }
}

/// Options controlling one pipeline run.
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    pub shape: ShapeConfig,
    /// Check every shaped element before writing; the first violation aborts
    /// the run.
    pub validate: bool,
}

/// Stream every node and way from `reader` into `writer`.
///
/// Single-threaded and single-pass: each element is shaped, optionally
/// validated, written, and dropped before the next one is read, so memory
/// stays bounded by the largest single element. A failure mid-stream leaves
/// already-written output partial; rerun from scratch.
pub fn process_osm<R: BufRead, W: Write>(
    reader: &mut OsmReader<R>,
    writer: &mut TableWriter<W>,
    options: &PipelineOptions,
    mut observer: Option<&mut dyn ProgressObserver>,
) -> Result<ProcessStats> {
    let shaper = ElementShaper::new(options.shape.clone());
    let mut stats = ProcessStats::default();

    while let Some(element) = reader.read_element()? {
        stats.elements += 1;

        match shaper.shape(&element) {
            Some(shaped) => {
                if options.validate {
                    validate(&shaped).with_context(|| {
                        format!(
                            "{} {} failed validation",
                            shaped.kind_name(),
                            shaped.owner_id()
                        )
                    })?;
                }
                match &shaped {
                    ShapedElement::Node { tags, .. } => {
                        stats.nodes += 1;
                        stats.node_tags += tags.len() as u64;
                    }
                    ShapedElement::Way {
                        tags, node_refs, ..
                    } => {
                        stats.ways += 1;
                        stats.way_tags += tags.len() as u64;
                        stats.way_nodes += node_refs.len() as u64;
                    }
                }
                writer.write_element(&shaped)?;
            }
            None => stats.skipped += 1,
        }

        if let Some(observer) = observer.as_mut() {
            observer.element_processed(&stats);
        }
    }

    writer.flush()?;
    Ok(stats)
}
