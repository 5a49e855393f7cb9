//! GPX track-file parsing.
//!
//! The renderer only needs ordered `(lat, lon)` sequences: all
//! `<trkseg>` segments of all `<trk>` elements are concatenated in
//! document order. Waypoints, routes, and per-point metadata
//! (elevation, time, extensions) are skipped.

use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

use track_common::{GeoPoint, TrackError, TrackResult};

/// Parse failure for a single GPX document.
#[derive(Debug, Error)]
pub enum GpxParseError {
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Missing attribute '{attribute}' on <trkpt>")]
    MissingAttribute { attribute: &'static str },

    #[error("Invalid value '{value}' for attribute '{attribute}' on <trkpt>")]
    InvalidAttribute {
        attribute: &'static str,
        value: String,
    },

    #[error("contains {count} track point(s), need at least 2")]
    NotEnoughPoints { count: usize },
}

/// Load and validate one track file.
///
/// Any failure surfaces as `InvalidTrackFile` carrying the originating
/// path; callers run this for every input before rendering starts so a
/// bad file aborts the call with no partial output.
pub fn load_track_points(path: &Path) -> TrackResult<Vec<GeoPoint>> {
    let xml = std::fs::read_to_string(path).map_err(|e| TrackError::InvalidTrackFile {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let points = parse_track_points(&xml).map_err(|e| TrackError::InvalidTrackFile {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    tracing::debug!(path = %path.display(), points = points.len(), "Parsed GPX file");
    Ok(points)
}

/// Parse a GPX document into the concatenated track-point sequence.
pub fn parse_track_points(xml: &str) -> Result<Vec<GeoPoint>, GpxParseError> {
    let mut reader = Reader::from_str(xml);
    let mut points = Vec::new();
    // <trkpt> only inside <trk><trkseg>; depth guards against trkpt-named
    // elements smuggled in via extensions.
    let mut in_track = false;
    let mut in_segment = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"trk" => in_track = true,
                b"trkseg" if in_track => in_segment = true,
                b"trkpt" if in_segment => points.push(parse_trkpt(&e)?),
                _ => {}
            },
            Event::Empty(e) => {
                if e.local_name().as_ref() == b"trkpt" && in_segment {
                    points.push(parse_trkpt(&e)?);
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"trk" => in_track = false,
                b"trkseg" => in_segment = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    if points.len() < 2 {
        return Err(GpxParseError::NotEnoughPoints {
            count: points.len(),
        });
    }

    Ok(points)
}

/// Read the lat/lon attributes from a `<trkpt>` start tag.
fn parse_trkpt(e: &BytesStart<'_>) -> Result<GeoPoint, GpxParseError> {
    let mut lat: Option<f64> = None;
    let mut lon: Option<f64> = None;

    for attr in e.attributes() {
        let attr = attr.map_err(|e| GpxParseError::Xml(e.into()))?;
        let key = attr.key.local_name();
        let val = String::from_utf8_lossy(&attr.value).into_owned();
        match key.as_ref() {
            b"lat" => {
                lat = Some(val.parse::<f64>().map_err(|_| {
                    GpxParseError::InvalidAttribute {
                        attribute: "lat",
                        value: val.clone(),
                    }
                })?);
            }
            b"lon" => {
                lon = Some(val.parse::<f64>().map_err(|_| {
                    GpxParseError::InvalidAttribute {
                        attribute: "lon",
                        value: val.clone(),
                    }
                })?);
            }
            _ => {}
        }
    }

    let lat = lat.ok_or(GpxParseError::MissingAttribute { attribute: "lat" })?;
    let lon = lon.ok_or(GpxParseError::MissingAttribute { attribute: "lon" })?;
    Ok(GeoPoint::new(lat, lon))
}
