//! # Trigger Primitive Ntuple Binary
//!
//! Summarise calorimeter trigger towers event by event into an 18-column
//! ntuple.
//!
//! ## Usage
//!
//! ```bash
//! # Events from a JSON Lines file, linear HCAL calibration
//! cargo run --release --bin tpg_ntuple -- -i events.jsonl -o tpg_info.csv
//!
//! # With a calibration table and a config file
//! cargo run --release --bin tpg_ntuple -- \
//!     -i events.jsonl \
//!     --calibration hcal_lut.json \
//!     --config monitor.json \
//!     -o tpg_info.jsonl --format jsonl
//!
//! # Synthetic full-detector events
//! cargo run --release --bin tpg_ntuple -- --synthetic 1000 -o synthetic.csv
//! ```

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;

use detector_monitor::{
    CaloEvent, CalibrationLookup, CalibrationTable, CalorimeterSumAggregator, ConePhiWrap,
    EventReader, LinearCalibration, MonitorConfig, NtupleFormat, NtupleWriter, OutputSink,
};

/// Calorimeter trigger-primitive monitor
#[derive(Parser, Debug)]
#[command(name = "tpg_ntuple")]
#[command(about = "Write per-event calorimeter trigger-primitive summaries")]
struct Args {
    /// JSON Lines file with one event per line
    #[arg(long, short = 'i', conflicts_with = "synthetic")]
    input: Option<PathBuf>,

    /// Generate this many synthetic events instead of reading input
    #[arg(long)]
    synthetic: Option<usize>,

    /// Seed for synthetic events
    #[arg(long, default_value = "1")]
    seed: u64,

    /// HCAL calibration table (JSON); linear scale when omitted
    #[arg(long)]
    calibration: Option<PathBuf>,

    /// Linear HCAL scale used without a table
    #[arg(long, default_value = "0.5")]
    hcal_lsb: f32,

    /// Configuration file (JSON)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Output ntuple
    #[arg(long, short = 'o', default_value = "tpg_info.csv")]
    output: PathBuf,

    /// Output format; guessed from the extension when omitted
    #[arg(long, value_enum)]
    format: Option<NtupleFormat>,

    /// Fold the cone Δφ onto the shortest arc
    #[arg(long)]
    shortest_cone_phi: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => MonitorConfig::from_file(path)?,
        None => MonitorConfig::default(),
    };
    if args.shortest_cone_phi {
        config.aggregator.cone_phi_wrap = ConePhiWrap::Shortest;
    }
    config.validate()?;

    let calibration: Box<dyn CalibrationLookup> = match &args.calibration {
        Some(path) => Box::new(CalibrationTable::from_file(path)?),
        None => {
            log::info!("Using linear HCAL calibration, {} per count", args.hcal_lsb);
            Box::new(LinearCalibration::new(args.hcal_lsb))
        }
    };

    let format = args
        .format
        .unwrap_or_else(|| NtupleFormat::from_path(&args.output));
    let mut writer = NtupleWriter::create(&args.output, format)?;
    let mut aggregator = CalorimeterSumAggregator::new(config.aggregator);

    match (&args.input, args.synthetic) {
        (_, Some(n_events)) => {
            log::info!("Generating {} synthetic events (seed {})", n_events, args.seed);
            let mut rng = StdRng::seed_from_u64(args.seed);
            for _ in 0..n_events {
                let event = CaloEvent::synthetic(&mut rng, 200);
                aggregator.process_into(&event, calibration.as_ref(), &mut writer)?;
            }
        }
        (Some(path), None) => {
            for event in EventReader::open(path)? {
                aggregator.process_into(&event?, calibration.as_ref(), &mut writer)?;
            }
        }
        (None, None) => {
            return Err("either --input or --synthetic is required".into());
        }
    }

    writer.finish()?;
    aggregator.stats().log_summary();
    println!("Wrote {} rows to {}", writer.rows(), writer.path().display());

    Ok(())
}
