//! Geographic bounding box types and operations.

use serde::{Deserialize, Serialize};

use crate::point::GeoPoint;

/// A latitude/longitude bounding box in degrees.
///
/// Derived from track points, never mutated in place after computation,
/// only replaced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub fn new(min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
        }
    }

    /// Tight bounding box of a point sequence; `None` when empty.
    pub fn from_points(points: &[GeoPoint]) -> Option<Self> {
        let first = points.first()?;
        let mut bbox = BoundingBox::new(first.lat, first.lon, first.lat, first.lon);
        for p in &points[1..] {
            bbox.min_lat = bbox.min_lat.min(p.lat);
            bbox.min_lon = bbox.min_lon.min(p.lon);
            bbox.max_lat = bbox.max_lat.max(p.lat);
            bbox.max_lon = bbox.max_lon.max(p.lon);
        }
        Some(bbox)
    }

    /// Smallest box covering both boxes.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min_lat: self.min_lat.min(other.min_lat),
            min_lon: self.min_lon.min(other.min_lon),
            max_lat: self.max_lat.max(other.max_lat),
            max_lon: self.max_lon.max(other.max_lon),
        }
    }

    /// Longitude span in degrees.
    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// Latitude span in degrees.
    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Great-circle distance between the min and max corners, in km.
    pub fn diagonal_km(&self) -> f64 {
        GeoPoint::new(self.min_lat, self.min_lon)
            .distance_km(&GeoPoint::new(self.max_lat, self.max_lon))
    }

    /// Corners in the fixed order top-left, top-right, bottom-right,
    /// bottom-left (north up).
    pub fn corners(&self) -> [GeoPoint; 4] {
        [
            GeoPoint::new(self.max_lat, self.min_lon),
            GeoPoint::new(self.max_lat, self.max_lon),
            GeoPoint::new(self.min_lat, self.max_lon),
            GeoPoint::new(self.min_lat, self.min_lon),
        ]
    }
}
