//! Per-track visual scale derived from geographic extent.
//!
//! Shorter tracks render with thicker lines and larger markers so they
//! stay legible; longer tracks thin out so they do not smear. Both
//! factors have floors so a very long track never becomes invisible.

use track_common::{BoundingBox, Track};

/// Output raster density, dots per inch.
pub const DPI: f32 = 300.0;

const POINTS_PER_INCH: f32 = 72.0;

/// Clamp for the box diagonal so an all-coincident track cannot divide
/// the scale factors by zero.
const MIN_DIAGONAL_KM: f64 = 0.001;

/// Convert a size in typographic points to output pixels.
pub fn pt_to_px(pt: f32) -> f32 {
    pt * DPI / POINTS_PER_INCH
}

/// Line and marker sizing for one track, in point units.
#[derive(Debug, Clone, Copy)]
pub struct TrackScale {
    /// Polyline stroke width; floor 1 pt.
    pub line_width_pt: f32,
    /// Marker dot area; floor 10 pt^2.
    pub marker_size_pt: f32,
}

impl TrackScale {
    pub fn line_width_px(&self) -> f32 {
        pt_to_px(self.line_width_pt)
    }

    /// Dot radius in pixels; marker size is an area, so the radius
    /// goes with its square root.
    pub fn marker_radius_px(&self) -> f32 {
        pt_to_px(self.marker_size_pt.sqrt()) / 2.0
    }
}

/// Compute a track's bounding box and the visual scale its diagonal
/// extent implies.
pub fn analyze(track: &Track) -> (BoundingBox, TrackScale) {
    let bbox = track.bounding_box();
    let diagonal_km = bbox.diagonal_km().max(MIN_DIAGONAL_KM);

    let scale = TrackScale {
        line_width_pt: (8.0 / diagonal_km as f32).max(1.0),
        marker_size_pt: (200.0 / diagonal_km as f32).max(10.0),
    };

    tracing::debug!(
        diagonal_km,
        line_width_pt = scale.line_width_pt,
        marker_size_pt = scale.marker_size_pt,
        "Computed track scale"
    );

    (bbox, scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use track_common::{Color, GeoPoint};

    fn track(points: Vec<GeoPoint>) -> Track {
        Track::new(points, Color::new(0, 0, 255), 1.0, "t.gpx".into()).unwrap()
    }

    #[test]
    fn test_long_track_hits_floors() {
        // ~157 km diagonal: both factors drop below their floors.
        let (_, scale) = analyze(&track(vec![
            GeoPoint::new(45.0, 6.0),
            GeoPoint::new(46.0, 7.0),
        ]));
        assert_eq!(scale.line_width_pt, 1.0);
        assert_eq!(scale.marker_size_pt, 10.0);
    }

    #[test]
    fn test_short_track_scales_up() {
        // ~1.4 km diagonal: thick lines, big markers.
        let (_, scale) = analyze(&track(vec![
            GeoPoint::new(45.0, 6.0),
            GeoPoint::new(45.01, 6.01),
        ]));
        assert!(scale.line_width_pt > 1.0);
        assert!(scale.marker_size_pt > 10.0);
    }

    #[test]
    fn test_scale_decreases_with_extent() {
        let (_, short) = analyze(&track(vec![
            GeoPoint::new(45.0, 6.0),
            GeoPoint::new(45.02, 6.02),
        ]));
        let (_, long) = analyze(&track(vec![
            GeoPoint::new(45.0, 6.0),
            GeoPoint::new(45.2, 6.2),
        ]));
        assert!(short.line_width_pt >= long.line_width_pt);
        assert!(short.marker_size_pt >= long.marker_size_pt);
    }

    #[test]
    fn test_coincident_points_do_not_blow_up() {
        let p = GeoPoint::new(45.0, 6.0);
        let (_, scale) = analyze(&track(vec![p, p]));
        assert!(scale.line_width_pt.is_finite());
        assert!(scale.marker_size_pt.is_finite());
    }

    #[test]
    fn test_pt_to_px() {
        // 72 pt is one inch, which is DPI pixels.
        assert_eq!(pt_to_px(72.0), DPI);
    }
}
