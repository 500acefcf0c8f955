//! osmelt-shape: stream OSM XML into five relational CSV tables
//!
//! Usage:
//!   # Read from file, write tables to the current directory
//!   osmelt-shape map.osm
//!
//!   # Read from stdin, write tables to a directory
//!   cat map.osm | osmelt-shape --output-dir ./tables
//!
//!   # Validate every shaped element before writing (slower, fail-fast)
//!   osmelt-shape --validate map.osm

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::Result;
use clap::Parser;
use log::info;
use osmelt::osm::OsmReader;
use osmelt::shape::{process_osm, LogProgress, PipelineOptions, ProgressObserver, TableWriter};
use std::fs::File;
use std::io::{stderr, stdin, BufRead, BufReader};

#[derive(Parser, Debug)]
#[command(name = "osmelt-shape")]
#[command(about = "Shape OSM XML into relational CSV tables", long_about = None)]
struct Args {
    /// Input OSM XML file (use stdin if omitted)
    #[arg(value_name = "FILE")]
    input: Option<String>,

    /// Directory receiving the five CSV tables
    #[arg(long, short = 'o', default_value = ".")]
    output_dir: String,

    /// Validate each shaped element before writing; the first violation
    /// aborts the run
    #[arg(long)]
    validate: bool,

    /// Log progress every N elements (0 disables progress logging)
    #[arg(long, default_value_t = 10_000)]
    progress_every: u64,

    /// Placeholder written for missing required attributes
    #[arg(long)]
    sentinel: Option<String>,
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let mut options = PipelineOptions {
        validate: args.validate,
        ..PipelineOptions::default()
    };
    if let Some(sentinel) = args.sentinel {
        options.shape.sentinel = sentinel;
    }

    let reader: Box<dyn BufRead> = match &args.input {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(BufReader::new(stdin())),
    };

    let mut osm_reader = OsmReader::new(reader);
    let mut writer = TableWriter::create_in_dir(&args.output_dir)?;

    let mut progress = LogProgress::new(args.progress_every);
    let observer: Option<&mut dyn ProgressObserver> = if args.progress_every > 0 {
        Some(&mut progress)
    } else {
        None
    };

    let stats = process_osm(&mut osm_reader, &mut writer, &options, observer)?;
    info!(
        elements = stats.elements,
        nodes = stats.nodes,
        ways = stats.ways,
        node_tags = stats.node_tags,
        way_tags = stats.way_tags,
        way_nodes = stats.way_nodes,
        skipped = stats.skipped;
        "finished shaping"
    );
    Ok(())
}

fn init_logging() {
    structured_logger::Builder::with_level("info")
        .with_target_writer("*", structured_logger::json::new_writer(stderr()))
        .init();
}
