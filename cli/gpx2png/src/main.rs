//! Render GPX tracks to a PNG map.
//!
//! Each `--track` argument names a GPX file plus its display color and
//! distance-marker interval. All tracks land on one shared image, and a
//! text sidecar next to the PNG records the geographic corners of the
//! rendered extent.

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use gpx_parser::load_track_points;
use renderer::{render_tracks, RenderConfig};
use track_common::{Color, Track};

/// One `--track` argument: `PATH:HEXCOLOR:INTERVAL_KM`.
#[derive(Debug, Clone)]
struct TrackSpec {
    path: PathBuf,
    color: Color,
    interval_km: f64,
}

impl FromStr for TrackSpec {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        // Split from the right so the path may itself contain colons.
        let mut parts = s.rsplitn(3, ':');
        let (Some(interval), Some(color), Some(path)) =
            (parts.next(), parts.next(), parts.next())
        else {
            bail!("expected PATH:HEXCOLOR:INTERVAL_KM, got '{s}'");
        };

        Ok(TrackSpec {
            path: PathBuf::from(path),
            color: color
                .parse()
                .with_context(|| format!("bad color in track spec '{s}'"))?,
            interval_km: interval
                .parse()
                .with_context(|| format!("bad interval in track spec '{s}'"))?,
        })
    }
}

#[derive(Parser, Debug)]
#[command(name = "gpx2png")]
#[command(about = "Render GPX tracks to a PNG with distance markers")]
struct Args {
    /// Track to render, as PATH:HEXCOLOR:INTERVAL_KM (repeatable)
    #[arg(short, long = "track", required = true)]
    tracks: Vec<TrackSpec>,

    /// Output PNG path; the coordinate sidecar is written next to it
    #[arg(short, long, default_value = "out.png")]
    output: PathBuf,

    /// Render on a transparent background instead of white
    #[arg(long)]
    transparent: bool,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Load every file before rendering anything, so one bad input
    // aborts the run with no partial output on disk.
    let mut tracks = Vec::with_capacity(args.tracks.len());
    for spec in &args.tracks {
        let points = load_track_points(&spec.path)?;
        let track = Track::new(points, spec.color, spec.interval_km, spec.path.clone())?;
        info!(
            track = %spec.path.display(),
            points = track.points.len(),
            total_km = track.total_distance_km(),
            "Loaded track"
        );
        tracks.push(track);
    }

    let config = RenderConfig {
        output: args.output,
        transparent: args.transparent,
    };
    let summary = render_tracks(&tracks, &config)?;

    info!(
        image = %summary.image_path.display(),
        sidecar = %summary.sidecar_path.display(),
        width = summary.width,
        height = summary.height,
        markers = summary.interval_markers,
        "Render complete"
    );

    Ok(())
}
