//! Error types for track loading and rendering.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using TrackError.
pub type TrackResult<T> = Result<T, TrackError>;

/// Primary error type for track operations.
///
/// All variants describe caller-input conditions and are surfaced
/// before or during a single render call; nothing here is retried.
#[derive(Debug, Error)]
pub enum TrackError {
    // === Input validation ===
    #[error("Invalid track file {}: {reason}", path.display())]
    InvalidTrackFile { path: PathBuf, reason: String },

    #[error("No tracks supplied")]
    EmptyTrackSet,

    #[error("No output path supplied")]
    MissingOutputPath,

    #[error("Marker interval {interval_km} km is below the minimum of {}", crate::track::MIN_INTERVAL_KM)]
    IntervalTooSmall { interval_km: f64 },

    #[error("Invalid color value: {value}")]
    InvalidColor { value: String },

    // === Geometry ===
    #[error("Degenerate segment: consecutive track points coincide")]
    DegenerateSegment,

    // === Rendering / output ===
    #[error("Rendering failed: {reason}")]
    RenderFailed { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
