//! Common types shared across the gpx2png crates.

pub mod bbox;
pub mod color;
pub mod error;
pub mod point;
pub mod track;

pub use bbox::BoundingBox;
pub use color::Color;
pub use error::{TrackError, TrackResult};
pub use point::{perpendicular, unit_tangent, GeoPoint};
pub use track::{Track, MIN_INTERVAL_KM};
