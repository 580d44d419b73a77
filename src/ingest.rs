//! Normalization of stored path coordinates.
//!
//! Trail paths in the catalog database were written by several generations of tooling, so
//! the same coordinate shows up as `{lat, lng, ele}`, `{latitude, longitude, altitude}`,
//! `{lat, lon, elevation}` or a bare `[lat, lng]` pair. This module maps every variant to a
//! [`GeoPoint`] once, at the boundary, so the geometry code only ever sees one schema.

use log::{debug, warn};
use serde::Deserialize;

use crate::error::Result;
use crate::GeoPoint;

/// One stored path coordinate, in any of the historical layouts.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawPathPoint {
    /// `[lat, lng, alt]`
    Triple([f64; 3]),
    /// `[lat, lng]`
    Pair([f64; 2]),
    Record {
        #[serde(alias = "lat")]
        latitude: f64,
        #[serde(alias = "lng", alias = "lon")]
        longitude: f64,
        #[serde(default, alias = "ele", alias = "elevation", alias = "alt")]
        altitude: Option<f64>,
        #[serde(default, alias = "time")]
        timestamp: Option<i64>,
    },
}

impl RawPathPoint {
    fn to_geo_point(&self) -> GeoPoint {
        match *self {
            RawPathPoint::Record { latitude, longitude, altitude, timestamp } => {
                GeoPoint::with_details(latitude, longitude, altitude, timestamp.unwrap_or(0))
            }
            RawPathPoint::Triple([lat, lng, alt]) => GeoPoint::with_details(lat, lng, Some(alt), 0),
            RawPathPoint::Pair([lat, lng]) => GeoPoint::new(lat, lng),
        }
    }
}

/// Convert raw coordinates to points, dropping `null` entries and invalid coordinates.
pub fn normalize_points(raw: Vec<Option<RawPathPoint>>) -> Vec<GeoPoint> {
    let total = raw.len();
    let points: Vec<GeoPoint> = raw
        .into_iter()
        .enumerate()
        .filter_map(|(i, entry)| {
            let point = entry?.to_geo_point();
            if point.is_valid() {
                Some(point)
            } else {
                warn!("[Ingest] Dropping invalid coordinate at index {}: {:?}", i, point);
                None
            }
        })
        .collect();

    if points.len() < total {
        debug!("[Ingest] Kept {} of {} path coordinates", points.len(), total);
    }
    points
}

/// Parse a stored path-coordinate JSON array into points.
///
/// ```rust
/// use hikingmate_geo::ingest::parse_path_json;
///
/// let json = r#"[
///     {"lat": 37.6584, "lng": 126.9779, "ele": 120.5},
///     {"latitude": 37.6590, "longitude": 126.9785, "elevation": 131.0},
///     [37.6600, 126.9790],
///     null
/// ]"#;
///
/// let points = parse_path_json(json).unwrap();
/// assert_eq!(points.len(), 3);
/// assert_eq!(points[0].altitude, Some(120.5));
/// assert_eq!(points[2].altitude, None);
/// ```
pub fn parse_path_json(json: &str) -> Result<Vec<GeoPoint>> {
    let raw: Vec<Option<RawPathPoint>> = serde_json::from_str(json)?;
    Ok(normalize_points(raw))
}
