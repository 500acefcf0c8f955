//! osmelt-audit: report street types, postcodes and city spellings that the
//! normalizer tables may be missing
//!
//! Usage:
//!   # Read from file, report to stdout as JSON
//!   osmelt-audit map.osm
//!
//!   # Read from stdin, compact output
//!   cat map.osm | osmelt-audit --compact

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::Result;
use clap::Parser;
use osmelt::audit::audit_osm;
use osmelt::osm::OsmReader;
use std::fs::File;
use std::io::{stderr, stdin, BufRead, BufReader};

#[derive(Parser, Debug)]
#[command(name = "osmelt-audit")]
#[command(about = "Audit OSM address fields for unmapped values", long_about = None)]
struct Args {
    /// Input OSM XML file (use stdin if omitted)
    #[arg(value_name = "FILE")]
    input: Option<String>,

    /// Compact output (no pretty-printing)
    #[arg(long)]
    compact: bool,
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let reader: Box<dyn BufRead> = match &args.input {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(BufReader::new(stdin())),
    };

    let mut osm_reader = OsmReader::new(reader);
    let report = audit_osm(&mut osm_reader)?;

    let output = if args.compact {
        serde_json::to_string(&report)?
    } else {
        serde_json::to_string_pretty(&report)?
    };
    println!("{}", output);
    Ok(())
}

fn init_logging() {
    structured_logger::Builder::with_level("info")
        .with_target_writer("*", structured_logger::json::new_writer(stderr()))
        .init();
}
