//! # Electron Track Matching Binary
//!
//! Match every electron track of an event to the general track sharing the
//! largest fraction of its inner hits.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release --bin gsf_ctf_match -- -i tracks.jsonl -o matches.jsonl
//!
//! # Narrower search window
//! cargo run --release --bin gsf_ctf_match -- -i tracks.jsonl --max-delta-r 0.2
//! ```

use clap::Parser;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use detector_monitor::tracking::TrackEventReader;
use detector_monitor::{ElectronCoreMatch, MatchStats, MonitorConfig, TrackHitShareMatcher};

/// Electron track to general track matcher
#[derive(Parser, Debug)]
#[command(name = "gsf_ctf_match")]
#[command(about = "Match electron tracks to general tracks by shared inner hits")]
struct Args {
    /// JSON Lines file with one track event per line
    #[arg(long, short = 'i')]
    input: PathBuf,

    /// Configuration file (JSON)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Override the (η, φ) search window
    #[arg(long)]
    max_delta_r: Option<f64>,

    /// Output file, one JSON object per event
    #[arg(long, short = 'o', default_value = "matches.jsonl")]
    output: PathBuf,
}

#[derive(Serialize)]
struct EventMatches<'a> {
    event: usize,
    matches: &'a [ElectronCoreMatch],
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => MonitorConfig::from_file(path)?,
        None => MonitorConfig::default(),
    };
    if let Some(max_delta_r) = args.max_delta_r {
        config.matcher.max_delta_r = max_delta_r;
    }
    config.validate()?;

    let matcher = TrackHitShareMatcher::new(config.matcher);
    let mut stats = MatchStats::default();
    let mut out = BufWriter::new(File::create(&args.output)?);

    let mut n_events = 0;
    for (index, event) in TrackEventReader::open(&args.input)?.enumerate() {
        let event = event?;
        let matches = matcher.match_event(&event);
        for m in &matches {
            stats.record(&m.result);
        }
        serde_json::to_writer(
            &mut out,
            &EventMatches {
                event: index,
                matches: &matches,
            },
        )?;
        out.write_all(b"\n")?;
        n_events += 1;
    }
    out.flush()?;

    stats.log_summary();
    println!(
        "Wrote matches for {} events to {}",
        n_events,
        args.output.display()
    );

    Ok(())
}
