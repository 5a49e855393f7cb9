//! A loaded GPS track ready for rendering.

use std::path::PathBuf;

use crate::bbox::BoundingBox;
use crate::color::Color;
use crate::error::{TrackError, TrackResult};
use crate::point::GeoPoint;

/// Smallest accepted marker interval in kilometers.
pub const MIN_INTERVAL_KM: f64 = 0.01;

/// One GPS recording: an ordered point sequence plus display options.
///
/// Points are in traversal order with all source segments already
/// concatenated; the renderer only reads them.
#[derive(Debug, Clone)]
pub struct Track {
    pub points: Vec<GeoPoint>,
    pub color: Color,
    pub interval_km: f64,
    /// Originating file, kept for error context.
    pub source: PathBuf,
}

impl Track {
    /// Build a track, rejecting inputs the renderer cannot work with.
    ///
    /// Distance and direction are undefined below two points, so that
    /// is validated here rather than deep inside the marker walk.
    pub fn new(
        points: Vec<GeoPoint>,
        color: Color,
        interval_km: f64,
        source: PathBuf,
    ) -> TrackResult<Self> {
        // NaN must fail too; a NaN interval would never emit a marker.
        if interval_km.is_nan() || interval_km < MIN_INTERVAL_KM {
            return Err(TrackError::IntervalTooSmall { interval_km });
        }
        if points.len() < 2 {
            return Err(TrackError::InvalidTrackFile {
                path: source,
                reason: format!("contains {} track point(s), need at least 2", points.len()),
            });
        }
        Ok(Self {
            points,
            color,
            interval_km,
            source,
        })
    }

    pub fn start(&self) -> &GeoPoint {
        &self.points[0]
    }

    pub fn end(&self) -> &GeoPoint {
        &self.points[self.points.len() - 1]
    }

    /// Tight bounding box of the raw points.
    pub fn bounding_box(&self) -> BoundingBox {
        // Safe: construction guarantees at least two points.
        BoundingBox::from_points(&self.points).unwrap_or(BoundingBox::new(0.0, 0.0, 0.0, 0.0))
    }

    /// Total traversal distance in kilometers.
    pub fn total_distance_km(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| w[0].distance_km(&w[1]))
            .sum()
    }
}
