//! End-to-end render tests: GPX file in, PNG plus sidecar out.

use std::io::Write;
use std::path::PathBuf;

use gpx_parser::load_track_points;
use renderer::{render_tracks, RenderConfig};
use track_common::{Color, Track};

const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// ~10 km straight northbound track: 90 steps of 0.001 degrees
/// latitude from (45.0, 6.0).
fn write_track_gpx(dir: &tempfile::TempDir) -> PathBuf {
    let path = dir.path().join("ride.gpx");
    let mut f = std::fs::File::create(&path).unwrap();
    writeln!(f, r#"<?xml version="1.0"?>"#).unwrap();
    writeln!(f, r#"<gpx version="1.1"><trk><trkseg>"#).unwrap();
    for i in 0..=90 {
        let lat = 45.0 + i as f64 * 0.001;
        writeln!(f, r#"<trkpt lat="{lat}" lon="6.0"/>"#).unwrap();
    }
    writeln!(f, "</trkseg></trk></gpx>").unwrap();
    path
}

fn load_track(dir: &tempfile::TempDir, interval_km: f64) -> Track {
    let gpx = write_track_gpx(dir);
    let points = load_track_points(&gpx).unwrap();
    Track::new(points, Color::new(0, 0, 255), interval_km, gpx).unwrap()
}

#[test]
fn test_render_writes_png_and_sidecar() {
    let dir = tempfile::tempdir().unwrap();
    let track = load_track(&dir, 2.0);
    let config = RenderConfig {
        output: dir.path().join("out.png"),
        transparent: false,
    };

    let summary = render_tracks(&[track], &config).unwrap();

    // ~10 km at a 2 km interval.
    assert_eq!(summary.interval_markers, 5);
    assert!(summary.width > 0 && summary.height > 0);

    let png = std::fs::read(&summary.image_path).unwrap();
    assert_eq!(&png[0..8], &PNG_SIGNATURE);

    assert_eq!(summary.sidecar_path, dir.path().join("out.coordsGPS.txt"));
    assert!(summary.sidecar_path.exists());
}

#[test]
fn test_sidecar_carries_extent_corners() {
    let dir = tempfile::tempdir().unwrap();
    let track = load_track(&dir, 2.0);
    let extent = track.bounding_box();
    let config = RenderConfig {
        output: dir.path().join("out.png"),
        transparent: false,
    };

    let summary = render_tracks(&[track], &config).unwrap();
    let contents = std::fs::read_to_string(&summary.sidecar_path).unwrap();

    assert!(!contents.ends_with('\n'));
    let lines: Vec<&str> = contents.split('\n').collect();
    assert_eq!(lines.len(), 4);

    // Top-left, top-right, bottom-right, bottom-left; 15 decimals
    // round-trips the f64 values exactly at this magnitude.
    let parse = |line: &str| {
        let (lat, lon) = line.split_once(';').unwrap();
        assert_eq!(lat.split('.').nth(1).unwrap().len(), 15);
        assert_eq!(lon.split('.').nth(1).unwrap().len(), 15);
        (lat.parse::<f64>().unwrap(), lon.parse::<f64>().unwrap())
    };
    assert_eq!(parse(lines[0]), (extent.max_lat, extent.min_lon));
    assert_eq!(parse(lines[1]), (extent.max_lat, extent.max_lon));
    assert_eq!(parse(lines[2]), (extent.min_lat, extent.max_lon));
    assert_eq!(parse(lines[3]), (extent.min_lat, extent.min_lon));
}

#[test]
fn test_render_transparent_background() {
    let dir = tempfile::tempdir().unwrap();
    let track = load_track(&dir, 2.0);
    let config = RenderConfig {
        output: dir.path().join("clear.png"),
        transparent: true,
    };

    let summary = render_tracks(&[track], &config).unwrap();
    let png = std::fs::read(&summary.image_path).unwrap();
    assert_eq!(&png[0..8], &PNG_SIGNATURE);
    // The cropped transparent render still has drawn content.
    assert!(summary.width > 0 && summary.height > 0);
}

#[test]
fn test_two_tracks_share_one_extent() {
    let dir = tempfile::tempdir().unwrap();
    let a = load_track(&dir, 2.0);
    // Second track offset east; the union extent spans both.
    let points = a
        .points
        .iter()
        .map(|p| track_common::GeoPoint::new(p.lat, p.lon + 0.05))
        .collect();
    let b = Track::new(points, Color::new(255, 0, 255), 2.0, "b.gpx".into()).unwrap();

    let config = RenderConfig {
        output: dir.path().join("pair.png"),
        transparent: false,
    };
    let summary = render_tracks(&[a, b], &config).unwrap();

    assert_eq!(summary.interval_markers, 10);
    let contents = std::fs::read_to_string(&summary.sidecar_path).unwrap();
    let top_right = contents.split('\n').nth(1).unwrap();
    let (_, lon) = top_right.split_once(';').unwrap();
    assert_eq!(lon.parse::<f64>().unwrap(), 6.05);
}
