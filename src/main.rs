//! Visual Stability CLI
//!
//! Command-line demonstration of the visual stability analysis. Replays
//! a synthetic page render through the tracker and prints the verdict.

use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};
use visual_stability::{
    classify::Confidence,
    tracker::{FileConfig, PixelChangeTracker, Thresholds},
    video::{Frame, FrameSource, ScriptedSource},
    CropRegion,
};

#[derive(Parser, Debug)]
#[command(version, about = "Estimate when a synthetic page render visually stabilized")]
struct Args {
    /// TOML file with thresholds and crop margins.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Frame width of the synthetic render.
    #[arg(long, default_value_t = 64)]
    width: u32,

    /// Frame height of the synthetic render.
    #[arg(long, default_value_t = 48)]
    height: u32,

    /// Write the diagnostic heat-map to this path as a binary PPM.
    #[arg(long)]
    heat_map: Option<PathBuf>,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    info!("Visual Stability Analyzer v{}", visual_stability::VERSION);

    let config = match &args.config {
        Some(path) => match FileConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config: {}", e);
                std::process::exit(1);
            }
        },
        None => FileConfig {
            // Demo-friendly scale; real sessions use the defaults.
            thresholds: Thresholds::new(4, 2, 3),
            crop: CropRegion::default(),
        },
    };

    let mut tracker = PixelChangeTracker::new(config.thresholds.clone());
    tracker.set_crop_region(config.crop);

    info!("Replaying synthetic render...");
    let mut source = scripted_render(args.width, args.height);
    let mut delivered = 0;
    while let Some((frame, timestamp_ms)) = source.next_frame() {
        if let Err(e) = tracker.add_frame(&frame, timestamp_ms) {
            eprintln!("Frame delivery failed: {}", e);
            std::process::exit(1);
        }
        delivered += 1;
    }
    info!("Delivered {} frames", delivered);

    let result = tracker.classify(args.heat_map.is_some());

    match result.verdict {
        Some(verdict) => {
            let label = match verdict.confidence {
                Confidence::High => "high confidence",
                Confidence::Low => "low confidence",
            };
            println!("Visually stable at {} ms ({})", verdict.stable_at_ms, label);
        }
        None => println!("Visual stability time undetermined"),
    }

    if let Some(path) = &args.heat_map {
        match result.heat_map {
            Some(map) => match write_ppm(&map, path) {
                Ok(()) => info!("Heat-map written to {}", path.display()),
                Err(e) => warn!("Failed to write heat-map: {}", e),
            },
            None => warn!("No heat-map produced (no frames analyzed)"),
        }
    }
}

/// Builds a render session: background paint, a progressive content
/// fill, then a small region that keeps blinking to the end.
fn scripted_render(width: u32, height: u32) -> ScriptedSource {
    let mut source = ScriptedSource::default();

    let blank = Frame::black(width, height);
    source.push(blank.clone(), 0);

    // Background fill at 200 ms.
    let mut background = blank;
    for y in 0..height {
        for x in 0..width {
            background.set_pixel(x, y, [240, 240, 240]);
        }
    }
    source.push(background.clone(), 200);

    // Content paints in four horizontal bands, one every 150 ms.
    let mut page = background;
    let band = (height / 4).max(1);
    for step in 0..4u32 {
        for y in (step * band)..((step + 1) * band).min(height) {
            for x in 0..width {
                page.set_pixel(x, y, [40, 80, 160]);
            }
        }
        source.push(page.clone(), 350 + step * 150);
    }

    // A cursor-sized region blinks until the end of the session.
    for (i, timestamp) in (1100..2100).step_by(200).enumerate() {
        let mut frame = page.clone();
        if i % 2 == 0 {
            for y in 0..4.min(height) {
                for x in 0..4.min(width) {
                    frame.set_pixel(x, y, [255, 255, 255]);
                }
            }
        }
        source.push(frame, timestamp);
    }

    source
}

/// Writes a frame as a binary PPM (P6) image.
fn write_ppm(frame: &Frame, path: &std::path::Path) -> std::io::Result<()> {
    use std::io::Write;

    let mut out = std::io::BufWriter::new(std::fs::File::create(path)?);
    write!(out, "P6\n{} {}\n255\n", frame.width(), frame.height())?;
    out.write_all(frame.pixels())?;
    Ok(())
}
