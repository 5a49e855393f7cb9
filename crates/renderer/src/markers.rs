//! Distance-marker planning along a track.
//!
//! Walks a track's points accumulating traveled distance and emits a
//! marker event every time the configured interval is crossed. Label
//! positions are checked against every label already placed during the
//! same render call, across all tracks, and nudged by a fixed offset
//! when they land too close to one.

use track_common::{perpendicular, unit_tangent, GeoPoint, Track};

/// Two labels closer than this are considered colliding.
pub const COLLISION_RADIUS_KM: f64 = 0.1;

/// Fixed collision nudge, degrees. A single deterministic shift; the
/// nudged position is not re-checked against other labels.
pub const NUDGE_LON_DEG: f64 = -0.005;
pub const NUDGE_LAT_DEG: f64 = 0.001;

/// One planned distance marker. Produced once, never mutated.
#[derive(Debug, Clone)]
pub struct MarkerEvent {
    /// Label position, after any collision nudge.
    pub position: GeoPoint,
    /// Accumulated traversal distance this marker represents, km.
    pub distance_km: f64,
    /// Unit vector across the local track direction, for the tick
    /// segment. `None` when the segment was degenerate.
    pub tick: Option<(f64, f64)>,
    /// Rendered label text.
    pub label: String,
}

/// Positions of all labels placed so far during one render call.
///
/// Shared across tracks (collision avoidance is global), scoped to a
/// single call, and passed explicitly so independent calls never
/// interfere.
#[derive(Debug, Default)]
pub struct PlacedLabels {
    positions: Vec<GeoPoint>,
}

impl PlacedLabels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Resolve a candidate position against the labels placed so far,
    /// record the result, and return it.
    pub fn place(&mut self, candidate: GeoPoint) -> GeoPoint {
        let position = if self.collides(&candidate) {
            GeoPoint::new(candidate.lat + NUDGE_LAT_DEG, candidate.lon + NUDGE_LON_DEG)
        } else {
            candidate
        };
        self.positions.push(position);
        position
    }

    fn collides(&self, candidate: &GeoPoint) -> bool {
        self.positions
            .iter()
            .any(|p| p.distance_km(candidate) < COLLISION_RADIUS_KM)
    }
}

/// Format an accumulated distance for display.
///
/// Truncation, not rounding: 1.999 km reads "1km", matching the
/// integer-floor label semantics the sidecar consumers expect.
pub fn format_distance_label(distance_km: f64) -> String {
    if distance_km < 1.0 {
        format!("{}m", (distance_km * 1000.0) as i64)
    } else {
        format!("{}km", distance_km as i64)
    }
}

/// Plan all interval markers for one track.
///
/// No marker is forced at the final point: leftover distance short of
/// the interval is dropped, not rendered.
pub fn plan_track(track: &Track, placed: &mut PlacedLabels) -> Vec<MarkerEvent> {
    let mut events = Vec::new();
    let mut accumulated_km = 0.0;
    let mut last_marker_km = 0.0;
    let mut prev = track.points[0];

    for (i, &curr) in track.points.iter().enumerate().skip(1) {
        let segment_start = prev;
        accumulated_km += segment_start.distance_km(&curr);
        prev = curr;

        if accumulated_km - last_marker_km >= track.interval_km {
            let position = placed.place(curr);

            let tick = unit_tangent(&segment_start, &curr)
                .map(perpendicular)
                .ok();
            if tick.is_none() {
                tracing::debug!(index = i, "Coincident points, marker tick suppressed");
            }

            events.push(MarkerEvent {
                position,
                distance_km: accumulated_km,
                tick,
                label: format_distance_label(accumulated_km),
            });
            last_marker_km = accumulated_km;
        }
    }

    tracing::debug!(
        track = %track.source.display(),
        total_km = accumulated_km,
        markers = events.len(),
        "Planned interval markers"
    );

    events
}
