//! Geographic points and the small amount of geodesy the planner needs.

use serde::{Deserialize, Serialize};

use crate::error::{TrackError, TrackResult};

/// Mean Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// A geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Haversine great-circle distance to another point, in kilometers.
    ///
    /// Marker spacing is measured in real-world kilometers, so this has
    /// to be a surface distance, not a flat lon/lat norm.
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        let dlat = (other.lat - self.lat).to_radians();
        let dlon = (other.lon - self.lon).to_radians();

        let a = (dlat / 2.0).sin().powi(2)
            + self.lat.to_radians().cos()
                * other.lat.to_radians().cos()
                * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_KM * c
    }
}

/// Normalized direction from `prev` to `curr` in the lon/lat plane.
///
/// Undefined when the points coincide exactly; callers decide whether
/// that is fatal (it is not for tick rendering).
pub fn unit_tangent(prev: &GeoPoint, curr: &GeoPoint) -> TrackResult<(f64, f64)> {
    let dx = curr.lon - prev.lon;
    let dy = curr.lat - prev.lat;
    let norm = (dx * dx + dy * dy).sqrt();
    if norm == 0.0 {
        return Err(TrackError::DegenerateSegment);
    }
    Ok((dx / norm, dy / norm))
}

/// 90-degree rotation of a tangent vector; preserves magnitude.
pub fn perpendicular((dx, dy): (f64, f64)) -> (f64, f64) {
    (-dy, dx)
}
