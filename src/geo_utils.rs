//! # Geographic Utilities
//!
//! Core geographic computation utilities for hiking track analysis.
//!
//! This module provides the distance and bearing primitives every other module builds on,
//! plus a few track-shaping helpers used by the trail catalog tooling.
//!
//! ## Overview
//!
//! | Function | Description |
//! |----------|-------------|
//! | [`haversine_distance`] | Great-circle distance between two GPS points |
//! | [`bearing`] | Initial compass bearing from one point to another |
//! | [`CompassDirection::from_bearing`] | Bucket a bearing into one of 8 directions |
//! | [`compute_bounds`] | Bounding box of a GPS track |
//! | [`meters_to_degrees`] | Convert meters to approximate degrees at a latitude |
//! | [`simplify_track`] | Douglas-Peucker simplification keeping altitude/timestamps |
//! | [`fill_gaps`] | Interpolate points so no segment exceeds a spacing |
//!
//! ## Example
//!
//! ```rust
//! use hikingmate_geo::{GeoPoint, geo_utils};
//!
//! let start = GeoPoint::new(37.6584, 126.9779); // Bukhansan trailhead
//! let peak = GeoPoint::new(37.6608, 126.9810);
//!
//! let dist = geo_utils::haversine_distance(&start, &peak);
//! let heading = geo_utils::bearing(&start, &peak);
//! let direction = geo_utils::CompassDirection::from_bearing(heading);
//! println!("{:.0}m toward {}", dist, direction.abbreviation());
//! ```
//!
//! ## Preconditions
//!
//! The primitives do not validate their input. Coordinates must be finite WGS84 degrees
//! (latitude in -90..=90, longitude in -180..=180); use [`GeoPoint::is_valid`] at the
//! ingestion boundary. NaN input yields NaN output, never a silent zero.

use geo::{Coord, LineString, SimplifyIdx};
use log::warn;
use crate::{GeoPoint, Bounds};

/// Mean Earth radius used by the Haversine formula, in meters.
///
/// Stored trail data was classified with exactly this value.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Upper bound on sub-steps [`fill_gaps`] will split a single segment into.
pub const MAX_FILL_STEPS_PER_SEGMENT: usize = 10_000;

// =============================================================================
// Distance & Bearing
// =============================================================================

/// Calculate the great-circle distance between two GPS points using the Haversine formula.
///
/// Returns the distance in meters along the Earth's surface, assuming a spherical Earth
/// of radius [`EARTH_RADIUS_METERS`]. Symmetric, and zero for coincident points.
///
/// # Example
///
/// ```rust
/// use hikingmate_geo::{GeoPoint, geo_utils};
///
/// let a = GeoPoint::new(37.5000, 127.0000);
/// let b = GeoPoint::new(37.5002, 127.0000);
///
/// let distance = geo_utils::haversine_distance(&a, &b);
/// assert!((distance - 22.24).abs() < 0.1); // 0.0002 degrees of latitude
/// ```
#[inline]
pub fn haversine_distance(p1: &GeoPoint, p2: &GeoPoint) -> f64 {
    let lat1 = p1.latitude.to_radians();
    let lat2 = p2.latitude.to_radians();
    let d_lat = (p2.latitude - p1.latitude).to_radians();
    let d_lng = (p2.longitude - p1.longitude).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Initial compass bearing from `p1` to `p2`, in degrees within `[0, 360)`.
///
/// 0 is north, 90 is east. When the points coincide the direction is undefined;
/// this returns 0 but callers must not rely on it.
pub fn bearing(p1: &GeoPoint, p2: &GeoPoint) -> f64 {
    let lat1 = p1.latitude.to_radians();
    let lat2 = p2.latitude.to_radians();
    let d_lng = (p2.longitude - p1.longitude).to_radians();

    let y = d_lng.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lng.cos();

    let degrees = y.atan2(x).to_degrees().rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative angles
    if degrees >= 360.0 { 0.0 } else { degrees }
}

/// One of the eight principal compass directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "ffi", derive(uniffi::Enum))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CompassDirection {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl CompassDirection {
    const ALL: [CompassDirection; 8] = [
        CompassDirection::North,
        CompassDirection::NorthEast,
        CompassDirection::East,
        CompassDirection::SouthEast,
        CompassDirection::South,
        CompassDirection::SouthWest,
        CompassDirection::West,
        CompassDirection::NorthWest,
    ];

    /// Bucket a bearing (degrees) by rounding `bearing / 45` to the nearest integer, modulo 8.
    ///
    /// ```rust
    /// use hikingmate_geo::geo_utils::CompassDirection;
    ///
    /// assert_eq!(CompassDirection::from_bearing(0.0), CompassDirection::North);
    /// assert_eq!(CompassDirection::from_bearing(100.0), CompassDirection::East);
    /// assert_eq!(CompassDirection::from_bearing(350.0), CompassDirection::North);
    /// ```
    pub fn from_bearing(bearing: f64) -> Self {
        let bucket = (bearing / 45.0).round() as i64;
        Self::ALL[bucket.rem_euclid(8) as usize]
    }

    /// Short English label ("N", "NE", ...).
    pub fn abbreviation(&self) -> &'static str {
        match self {
            CompassDirection::North => "N",
            CompassDirection::NorthEast => "NE",
            CompassDirection::East => "E",
            CompassDirection::SouthEast => "SE",
            CompassDirection::South => "S",
            CompassDirection::SouthWest => "SW",
            CompassDirection::West => "W",
            CompassDirection::NorthWest => "NW",
        }
    }

    /// Korean label shown in the app ("북", "북동", ...).
    pub fn korean_name(&self) -> &'static str {
        match self {
            CompassDirection::North => "북",
            CompassDirection::NorthEast => "북동",
            CompassDirection::East => "동",
            CompassDirection::SouthEast => "남동",
            CompassDirection::South => "남",
            CompassDirection::SouthWest => "남서",
            CompassDirection::West => "서",
            CompassDirection::NorthWest => "북서",
        }
    }
}

/// Convert meters to approximate degrees at a given latitude.
///
/// Uses the longitude scale at `latitude`, which is the larger of the two degree
/// scales, so the result is a conservative search radius in either axis.
///
/// # Notes
///
/// - At the equator, 1 degree ≈ 111,320 meters
/// - Near the poles the cosine is clamped at 0.1 to keep the radius bounded
#[inline]
pub fn meters_to_degrees(meters: f64, latitude: f64) -> f64 {
    let lat_rad = latitude.to_radians();
    let meters_per_degree = 111_320.0 * lat_rad.cos().max(0.1);
    meters / meters_per_degree
}

// =============================================================================
// Bounding Box
// =============================================================================

/// Compute the bounding box of a GPS track.
///
/// Returns `None` for an empty track.
///
/// # Example
///
/// ```rust
/// use hikingmate_geo::{GeoPoint, geo_utils};
///
/// let track = vec![
///     GeoPoint::new(37.50, 127.00),
///     GeoPoint::new(37.51, 127.01),
///     GeoPoint::new(37.505, 126.99),
/// ];
///
/// let bounds = geo_utils::compute_bounds(&track).unwrap();
/// assert_eq!(bounds.min_lat, 37.50);
/// assert_eq!(bounds.max_lng, 127.01);
/// ```
pub fn compute_bounds(points: &[GeoPoint]) -> Option<Bounds> {
    Bounds::from_points(points)
}

// =============================================================================
// Track Shaping
// =============================================================================

/// Simplify a track with the Douglas-Peucker algorithm.
///
/// `tolerance_degrees` is the maximum perpendicular deviation in degrees
/// (0.0001 ≈ 11 meters). The retained points are the original [`GeoPoint`]s, so
/// altitude and timestamps survive simplification.
pub fn simplify_track(points: &[GeoPoint], tolerance_degrees: f64) -> Vec<GeoPoint> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let line: LineString = points
        .iter()
        .map(|p| Coord { x: p.longitude, y: p.latitude })
        .collect();

    line.simplify_idx(&tolerance_degrees)
        .into_iter()
        .map(|idx| points[idx])
        .collect()
}

/// Insert linearly interpolated points so that no consecutive pair is farther apart
/// than `max_spacing_meters`.
///
/// Latitude, longitude and timestamp are interpolated. Altitude is interpolated when
/// both neighbours have one, and left empty otherwise. A non-positive or non-finite
/// spacing returns the track unchanged. A segment is never split into more than
/// [`MAX_FILL_STEPS_PER_SEGMENT`] steps, so a tiny spacing can leave gaps wider than
/// requested.
pub fn fill_gaps(points: &[GeoPoint], max_spacing_meters: f64) -> Vec<GeoPoint> {
    if points.len() < 2 || !max_spacing_meters.is_finite() || max_spacing_meters <= 0.0 {
        return points.to_vec();
    }

    let mut filled = Vec::with_capacity(points.len());
    filled.push(points[0]);

    for w in points.windows(2) {
        let (prev, curr) = (&w[0], &w[1]);
        let seg_dist = haversine_distance(prev, curr);

        if seg_dist > max_spacing_meters {
            let wanted = (seg_dist / max_spacing_meters).ceil();
            let steps = if wanted > MAX_FILL_STEPS_PER_SEGMENT as f64 {
                warn!(
                    "[GeoUtils] Gap of {:.0}m at {:.3}m spacing needs {} steps, capping at {}",
                    seg_dist, max_spacing_meters, wanted, MAX_FILL_STEPS_PER_SEGMENT
                );
                MAX_FILL_STEPS_PER_SEGMENT
            } else {
                wanted as usize
            };
            for step in 1..steps {
                let ratio = step as f64 / steps as f64;
                filled.push(interpolate(prev, curr, ratio));
            }
        }

        filled.push(*curr);
    }

    filled
}

/// Linear interpolation between two points at `ratio` in `[0, 1]`.
fn interpolate(a: &GeoPoint, b: &GeoPoint, ratio: f64) -> GeoPoint {
    let altitude = match (a.altitude, b.altitude) {
        (Some(alt_a), Some(alt_b)) => Some(alt_a + ratio * (alt_b - alt_a)),
        _ => None,
    };
    let timestamp = a.timestamp + ((b.timestamp - a.timestamp) as f64 * ratio).round() as i64;

    GeoPoint {
        latitude: a.latitude + ratio * (b.latitude - a.latitude),
        longitude: a.longitude + ratio * (b.longitude - a.longitude),
        altitude,
        timestamp,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    #[test]
    fn test_haversine_distance_same_point() {
        let p = GeoPoint::new(37.6584, 126.9779);
        assert_eq!(haversine_distance(&p, &p), 0.0);
    }

    #[test]
    fn test_haversine_distance_symmetric() {
        let a = GeoPoint::new(37.6584, 126.9779);
        let b = GeoPoint::new(35.1796, 129.0756);
        assert_eq!(haversine_distance(&a, &b), haversine_distance(&b, &a));
    }

    #[test]
    fn test_haversine_distance_short_hop() {
        let a = GeoPoint::new(37.5, 127.0);
        let b = GeoPoint::new(37.5002, 127.0);
        // 0.0002 degrees of latitude on a 6,371 km sphere is ~22.24m
        assert!(approx_eq(haversine_distance(&a, &b), 22.239, 0.01));
    }

    #[test]
    fn test_haversine_distance_known_value() {
        // Seoul to Busan is approximately 325 km
        let seoul = GeoPoint::new(37.5665, 126.9780);
        let busan = GeoPoint::new(35.1796, 129.0756);
        let dist = haversine_distance(&seoul, &busan);
        assert!(approx_eq(dist, 325_000.0, 5000.0));
    }

    #[test]
    fn test_bearing_cardinal() {
        let origin = GeoPoint::new(0.0, 0.0);
        assert!(approx_eq(bearing(&origin, &GeoPoint::new(1.0, 0.0)), 0.0, 1e-9));
        assert!(approx_eq(bearing(&origin, &GeoPoint::new(0.0, 1.0)), 90.0, 1e-9));
        assert!(approx_eq(bearing(&origin, &GeoPoint::new(-1.0, 0.0)), 180.0, 1e-9));
        assert!(approx_eq(bearing(&origin, &GeoPoint::new(0.0, -1.0)), 270.0, 1e-9));
    }

    #[test]
    fn test_bearing_in_range() {
        let a = GeoPoint::new(37.6584, 126.9779);
        let b = GeoPoint::new(37.6500, 126.9700);
        let deg = bearing(&a, &b);
        assert!((0.0..360.0).contains(&deg));
        assert!(deg > 180.0 && deg < 270.0); // south-west
    }

    #[test]
    fn test_bearing_coincident_points() {
        let p = GeoPoint::new(37.6584, 126.9779);
        assert_eq!(bearing(&p, &p), 0.0);
    }

    #[test]
    fn test_compass_direction_buckets() {
        assert_eq!(CompassDirection::from_bearing(0.0), CompassDirection::North);
        assert_eq!(CompassDirection::from_bearing(22.0), CompassDirection::North);
        assert_eq!(CompassDirection::from_bearing(23.0), CompassDirection::NorthEast);
        assert_eq!(CompassDirection::from_bearing(135.0), CompassDirection::SouthEast);
        assert_eq!(CompassDirection::from_bearing(220.0), CompassDirection::SouthWest);
        assert_eq!(CompassDirection::from_bearing(270.0), CompassDirection::West);
        assert_eq!(CompassDirection::from_bearing(337.5), CompassDirection::North);
        assert_eq!(CompassDirection::from_bearing(359.9), CompassDirection::North);
    }

    #[test]
    fn test_compass_direction_labels() {
        assert_eq!(CompassDirection::NorthWest.abbreviation(), "NW");
        assert_eq!(CompassDirection::SouthEast.korean_name(), "남동");
    }

    #[test]
    fn test_compute_bounds() {
        let track = vec![
            GeoPoint::new(37.50, 127.03),
            GeoPoint::new(37.51, 127.02),
            GeoPoint::new(37.505, 127.025),
        ];
        let bounds = compute_bounds(&track).unwrap();
        assert_eq!(bounds.min_lat, 37.50);
        assert_eq!(bounds.max_lat, 37.51);
        assert_eq!(bounds.min_lng, 127.02);
        assert_eq!(bounds.max_lng, 127.03);
    }

    #[test]
    fn test_compute_bounds_empty() {
        assert!(compute_bounds(&[]).is_none());
    }

    #[test]
    fn test_meters_to_degrees() {
        // At equator, 111km = 1 degree
        let deg = meters_to_degrees(111_320.0, 0.0);
        assert!(approx_eq(deg, 1.0, 0.01));

        // At higher latitude, same distance = more degrees
        let deg_37 = meters_to_degrees(111_320.0, 37.5);
        assert!(deg_37 > 1.0);
    }

    #[test]
    fn test_simplify_track_keeps_attributes() {
        // Straight line with a midpoint that simplification should drop
        let track = vec![
            GeoPoint::with_details(37.500, 127.0, Some(100.0), 0),
            GeoPoint::with_details(37.501, 127.0, Some(110.0), 1_000),
            GeoPoint::with_details(37.502, 127.0, Some(120.0), 2_000),
        ];
        let simplified = simplify_track(&track, 0.0001);
        assert_eq!(simplified.len(), 2);
        assert_eq!(simplified[0], track[0]);
        assert_eq!(simplified[1], track[2]);
    }

    #[test]
    fn test_simplify_track_keeps_corner() {
        let track = vec![
            GeoPoint::new(37.500, 127.000),
            GeoPoint::new(37.510, 127.000),
            GeoPoint::new(37.510, 127.010),
        ];
        assert_eq!(simplify_track(&track, 0.0001).len(), 3);
    }

    #[test]
    fn test_fill_gaps_spacing() {
        let a = GeoPoint::with_details(37.5, 127.0, Some(100.0), 0);
        let b = GeoPoint::with_details(37.501, 127.0, Some(200.0), 100_000); // ~111m
        let filled = fill_gaps(&[a, b], 30.0);

        // ceil(111 / 30) = 4 segments -> 3 inserted points
        assert_eq!(filled.len(), 5);
        assert_eq!(filled[0], a);
        assert_eq!(filled[4], b);
        for w in filled.windows(2) {
            assert!(haversine_distance(&w[0], &w[1]) <= 30.0);
            assert!(w[1].timestamp > w[0].timestamp);
        }
        assert!(approx_eq(filled[2].altitude.unwrap(), 150.0, 1e-9));
    }

    #[test]
    fn test_fill_gaps_missing_altitude() {
        let a = GeoPoint::new(37.5, 127.0);
        let b = GeoPoint::with_details(37.501, 127.0, Some(200.0), 0);
        let filled = fill_gaps(&[a, b], 50.0);
        assert!(filled.len() > 2);
        assert!(filled[1].altitude.is_none());
    }

    #[test]
    fn test_fill_gaps_invalid_spacing() {
        let track = vec![GeoPoint::new(37.5, 127.0), GeoPoint::new(37.6, 127.0)];
        assert_eq!(fill_gaps(&track, 0.0), track);
        assert_eq!(fill_gaps(&track, f64::NAN), track);
    }

    #[test]
    fn test_fill_gaps_caps_steps_per_segment() {
        // ~111km at 1mm spacing would be ~111 million points
        let a = GeoPoint::new(37.0, 127.0);
        let b = GeoPoint::new(38.0, 127.0);
        let filled = fill_gaps(&[a, b], 0.001);

        assert_eq!(filled.len(), MAX_FILL_STEPS_PER_SEGMENT + 1);
        assert_eq!(filled[0], a);
        assert_eq!(filled[MAX_FILL_STEPS_PER_SEGMENT], b);
    }
}
