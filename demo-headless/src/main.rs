//! Headless Fresnel diffraction sweep
//!
//! Builds one of the synthetic apertures, propagates it over a distance range
//! and prints a per-distance summary of the normalized frames.

mod apertures;

use apertures::ApertureKind;
use clap::Parser;
use fresnel_core::{
    AmplitudeConstant, CancelToken, ChannelSet, Computation, DiffractionPattern, DistanceRange,
    ExecutionMode, Meters, Progress, ResultSequence, SimulationConfig,
};
use std::error::Error;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Fresnel diffraction demo with configurable parameters
#[derive(Parser, Debug)]
#[command(name = "fresnel-headless")]
#[command(about = "Propagate a synthetic aperture over a range of distances", long_about = None)]
struct Args {
    /// Source aperture
    #[arg(short, long, value_enum, default_value_t = ApertureKind::Square)]
    kind: ApertureKind,

    /// Grid side length N in pixels
    #[arg(short = 'n', long, default_value_t = 256)]
    size: usize,

    /// JSON config file; flags below override its fields
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Physical aperture size D in meters
    #[arg(short = 'D', long)]
    aperture: Option<f64>,

    /// First distance in meters
    #[arg(long)]
    z_min: Option<f64>,

    /// Last distance in meters
    #[arg(long)]
    z_max: Option<f64>,

    /// Distance step in meters
    #[arg(long)]
    z_step: Option<f64>,

    /// Keep the absolute Fresnel amplitude factor in raw intensities
    #[arg(long)]
    retain_amplitude: bool,

    /// Worker threads (0 = one per logical CPU)
    #[arg(short, long)]
    threads: Option<usize>,

    /// Run every task on the main thread
    #[arg(long, conflicts_with = "threads")]
    sequential: bool,
}

impl Args {
    fn resolve_config(&self) -> Result<SimulationConfig, Box<dyn Error>> {
        let mut config = match &self.config {
            Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
            None => SimulationConfig::default(),
        };

        if let Some(aperture) = self.aperture {
            config.aperture = Meters::new(aperture);
        }
        config.range = DistanceRange {
            z_min: self.z_min.unwrap_or(config.range.z_min),
            z_max: self.z_max.unwrap_or(config.range.z_max),
            z_step: self.z_step.unwrap_or(config.range.z_step),
        };
        if self.retain_amplitude {
            config.amplitude = AmplitudeConstant::Retain;
        }
        if self.sequential {
            config.execution = ExecutionMode::Sequential;
        } else if let Some(threads) = self.threads {
            config.execution = ExecutionMode::Pooled { threads };
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = args.resolve_config()?;

    println!("=== Fresnel Diffraction Demo ===\n");
    println!("Aperture: {:?} on a {}x{} grid", args.kind, args.size, args.size);
    println!(
        "D = {}, z = {} .. {} m (step {} m), amplitude constant {:?}",
        config.aperture, config.range.z_min, config.range.z_max, config.range.z_step, config.amplitude
    );

    let source = args.kind.build(args.size)?;
    let distances = config.range.distances();
    let orchestrator = config.orchestrator()?;
    info!(
        workers = orchestrator.worker_count(),
        frames = distances.len(),
        amplitude = ?orchestrator.evaluator().amplitude(),
        "Orchestrator ready"
    );

    let computation = orchestrator.compute(
        &source,
        &distances,
        config.aperture,
        &mut print_progress,
        &CancelToken::new(),
    )?;
    println!();

    match &computation {
        Computation::Grayscale(seq) => print_grayscale(seq),
        Computation::Rgb(set) => print_rgb(set),
    }

    Ok(())
}

fn print_progress(progress: Progress) {
    println!(
        "[{:>5}] {:>3}/{:<3} ({:>5.1}%)",
        progress.channel,
        progress.completed,
        progress.total,
        progress.ratio() * 100.0
    );
}

fn peak(frame: &DiffractionPattern) -> String {
    frame
        .argmax()
        .map_or_else(|| "-".to_string(), |(x, y)| format!("({x}, {y})"))
}

fn print_grayscale(seq: &ResultSequence) {
    println!("{:>8}  {:>10}  {:>12}", "z [m]", "mean", "peak (x, y)");
    for (z, frame) in seq.iter() {
        println!("{z:>8.3}  {:>10.4}  {:>12}", frame.mean(), peak(frame));
    }
}

fn print_rgb(set: &ChannelSet) {
    println!(
        "{:>8}  {:>8}  {:>8}  {:>8}  {:>12}  {:>12}  {:>12}",
        "z [m]", "mean R", "mean G", "mean B", "peak R", "peak G", "peak B"
    );
    for (i, z) in set.rgb.distances().iter().enumerate() {
        let (r, g, b) = (
            &set.red.frames()[i],
            &set.green.frames()[i],
            &set.blue.frames()[i],
        );
        println!(
            "{z:>8.3}  {:>8.4}  {:>8.4}  {:>8.4}  {:>12}  {:>12}  {:>12}",
            r.mean(),
            g.mean(),
            b.mean(),
            peak(r),
            peak(g),
            peak(b)
        );
    }
}
