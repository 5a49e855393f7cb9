//! Track rendering pipeline.
//!
//! Turns parsed GPS tracks into a cropped PNG plus a coordinate
//! sidecar: one shared geographic extent, per-track polylines with
//! start/end markers, interval distance markers with collision-avoided
//! labels, and faint corner annotations carrying the extent.

pub mod canvas;
pub mod glyphs;
pub mod markers;
pub mod output;
pub mod png;
pub mod scale;

use std::path::PathBuf;

use track_common::{Color, Track, TrackError, TrackResult};

use canvas::Canvas;
use glyphs::{HAlign, VAlign};
use markers::PlacedLabels;
use output::FinishedOutput;
use scale::pt_to_px;

/// Font size of interval distance labels, pt.
const DISTANCE_LABEL_PT: f32 = 9.0;

/// Font size of the start/end labels, pt.
const ENDPOINT_LABEL_PT: f32 = 3.0;

/// Font size of the corner coordinate annotations, pt.
const CORNER_LABEL_PT: f32 = 5.0;

/// Near-black, mostly transparent ink for the corner annotations.
const CORNER_COLOR: [u8; 4] = [15, 15, 15, 32];

/// One render call's settings.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Destination PNG path; the sidecar lands next to it.
    pub output: PathBuf,
    /// Skip the opaque white background.
    pub transparent: bool,
}

/// What a render call produced.
#[derive(Debug, Clone)]
pub struct RenderSummary {
    pub image_path: PathBuf,
    pub sidecar_path: PathBuf,
    /// Final raster size after cropping, px.
    pub width: u32,
    pub height: u32,
    /// Interval distance markers drawn, across all tracks.
    pub interval_markers: usize,
}

/// Render a set of tracks into one image.
///
/// All tracks share a single extent (the union of their bounding
/// boxes) and a single label collision state, so a marker on one track
/// pushes away a coinciding marker on another.
pub fn render_tracks(tracks: &[Track], config: &RenderConfig) -> TrackResult<RenderSummary> {
    if tracks.is_empty() {
        return Err(TrackError::EmptyTrackSet);
    }
    if config.output.as_os_str().is_empty() {
        return Err(TrackError::MissingOutputPath);
    }

    let extent = tracks
        .iter()
        .map(Track::bounding_box)
        .reduce(|a, b| a.union(&b))
        .ok_or(TrackError::EmptyTrackSet)?;

    tracing::info!(
        tracks = tracks.len(),
        min_lat = extent.min_lat,
        min_lon = extent.min_lon,
        max_lat = extent.max_lat,
        max_lon = extent.max_lon,
        "Rendering track set"
    );

    let mut canvas = Canvas::new(extent)?;
    let mut placed = PlacedLabels::new();
    let mut interval_markers = 0;

    for track in tracks {
        interval_markers += draw_track(&mut canvas, track, &mut placed);
    }

    canvas.draw_corner_annotations(&extent, pt_to_px(CORNER_LABEL_PT), CORNER_COLOR);

    let FinishedOutput {
        image_path,
        sidecar_path,
        width,
        height,
    } = output::finish(canvas.into_pixmap(), &extent, &config.output, config.transparent)?;

    Ok(RenderSummary {
        image_path,
        sidecar_path,
        width,
        height,
        interval_markers,
    })
}

/// Draw one track and its markers; returns the interval marker count.
fn draw_track(canvas: &mut Canvas, track: &Track, placed: &mut PlacedLabels) -> usize {
    let (_, track_scale) = scale::analyze(track);
    let line_px = track_scale.line_width_px();
    let marker_px = track_scale.marker_radius_px();
    let ink = track.color.rgba(255);

    canvas.draw_polyline(&track.points, line_px, ink);

    // Start and end get fixed colors regardless of the track's own.
    let start = track.start();
    canvas.draw_dot(start, marker_px, Color::GREEN.rgba(255));
    canvas.draw_label(
        start,
        (0.0, -marker_px - 2.0),
        "Start",
        pt_to_px(ENDPOINT_LABEL_PT),
        Color::GREEN.rgba(255),
        HAlign::Left,
        VAlign::Bottom,
    );

    let end = track.end();
    // The end cross reads at twice the dot size.
    let cross_px = marker_px * 2.0;
    canvas.draw_cross(end, cross_px, line_px, Color::RED.rgba(255));
    canvas.draw_label(
        end,
        (0.0, cross_px + 2.0),
        "End",
        pt_to_px(ENDPOINT_LABEL_PT),
        Color::RED.rgba(255),
        HAlign::Left,
        VAlign::Top,
    );

    let events = markers::plan_track(track, placed);
    for event in &events {
        if let Some(perp) = event.tick {
            canvas.draw_tick(&event.position, perp, line_px, ink);
        }
        canvas.draw_label(
            &event.position,
            (marker_px + 2.0, -2.0),
            &event.label,
            pt_to_px(DISTANCE_LABEL_PT),
            ink,
            HAlign::Left,
            VAlign::Bottom,
        );
    }

    tracing::debug!(
        track = %track.source.display(),
        markers = events.len(),
        "Drew track"
    );

    events.len()
}
