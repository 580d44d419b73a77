//! # Track Metrics
//!
//! Aggregate statistics for a recorded hike: distance, elevation gain/loss, pace,
//! calorie estimate, and the display formatting used by the hike summary screen.
//!
//! All functions are pure and operate pairwise over consecutive points, in the order
//! the caller supplies them. Tracks with fewer than two points produce zero values,
//! never errors.
//!
//! ## Example
//!
//! ```rust
//! use hikingmate_geo::{GeoPoint, metrics};
//!
//! let track = vec![
//!     GeoPoint::with_details(37.6584, 126.9779, Some(120.0), 0),
//!     GeoPoint::with_details(37.6600, 126.9790, Some(180.0), 600_000),
//!     GeoPoint::with_details(37.6620, 126.9800, Some(240.0), 1_200_000),
//! ];
//!
//! let distance = metrics::total_distance(&track);
//! let elevation = metrics::elevation_change(&track);
//! let pace = metrics::pace(distance, 1200.0);
//!
//! assert_eq!(elevation.gain, 120.0);
//! println!("{:.0}m at {}", distance, metrics::format_pace(pace));
//! ```

use crate::error::{GeoError, Result};
use crate::geo_utils::haversine_distance;
use crate::{Bounds, GeoPoint};

/// MET value for moderate-intensity hiking.
pub const HIKING_MET: f64 = 7.0;

/// Body weight assumed when the user has not entered one.
pub const DEFAULT_WEIGHT_KG: f64 = 70.0;

// =============================================================================
// Distance
// =============================================================================

/// Total length of a track in meters.
///
/// Sums the haversine distance between consecutive points. Empty or single-point
/// tracks return 0.0.
pub fn total_distance(points: &[GeoPoint]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }

    points
        .windows(2)
        .map(|w| haversine_distance(&w[0], &w[1]))
        .sum()
}

// =============================================================================
// Elevation
// =============================================================================

/// Accumulated climb and descent in meters. Both fields are non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElevationChange {
    pub gain: f64,
    pub loss: f64,
}

impl ElevationChange {
    /// Add one altitude delta to the running totals.
    #[inline]
    pub fn accumulate(&mut self, delta: f64) {
        if delta > 0.0 {
            self.gain += delta;
        } else {
            self.loss += -delta;
        }
    }
}

/// How to treat points without an altitude reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "ffi", derive(uniffi::Enum))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ElevationPolicy {
    /// A missing altitude counts as 0 m. This is how all stored hikes were computed,
    /// and it produces spikes when the altitude drops out mid-track.
    #[default]
    MissingAsZero,
    /// Skip any pair where either altitude is missing.
    SkipMissing,
}

/// Altitude delta between two consecutive points under `policy`, or `None` when the
/// pair does not contribute.
#[inline]
pub(crate) fn altitude_delta(a: &GeoPoint, b: &GeoPoint, policy: ElevationPolicy) -> Option<f64> {
    match policy {
        ElevationPolicy::MissingAsZero => {
            Some(b.altitude.unwrap_or(0.0) - a.altitude.unwrap_or(0.0))
        }
        ElevationPolicy::SkipMissing => Some(b.altitude? - a.altitude?),
    }
}

/// Elevation gain and loss with missing altitudes treated as 0 m.
///
/// Returns `{0, 0}` for tracks of fewer than two points.
pub fn elevation_change(points: &[GeoPoint]) -> ElevationChange {
    elevation_change_with(points, ElevationPolicy::MissingAsZero)
}

/// Elevation gain and loss under an explicit missing-altitude policy.
pub fn elevation_change_with(points: &[GeoPoint], policy: ElevationPolicy) -> ElevationChange {
    let mut change = ElevationChange::default();
    if points.len() < 2 {
        return change;
    }

    for w in points.windows(2) {
        if let Some(delta) = altitude_delta(&w[0], &w[1], policy) {
            change.accumulate(delta);
        }
    }

    change
}

// =============================================================================
// Pace & Calories
// =============================================================================

/// Pace in minutes per kilometer.
///
/// Returns 0 when the distance is 0. A zero pace means "no pace available",
/// not an instantaneous one.
pub fn pace(distance_meters: f64, duration_seconds: f64) -> f64 {
    if distance_meters == 0.0 {
        return 0.0;
    }
    (duration_seconds / 60.0) / (distance_meters / 1000.0)
}

/// MET-based calorie estimate in kcal, rounded to the nearest integer.
///
/// Uses a fixed MET of [`HIKING_MET`]; the estimate depends only on weight and
/// duration; distance and terrain do not enter the formula.
///
/// Returns [`GeoError::InvalidArgument`] for a negative or non-finite duration or weight
/// rather than reporting 0 kcal.
pub fn calories(_distance_meters: f64, duration_seconds: f64, weight_kg: f64) -> Result<u32> {
    if !duration_seconds.is_finite() || duration_seconds < 0.0 {
        return Err(GeoError::invalid_argument(format!(
            "duration must be finite and non-negative, got {}",
            duration_seconds
        )));
    }
    if !weight_kg.is_finite() || weight_kg < 0.0 {
        return Err(GeoError::invalid_argument(format!(
            "weight must be finite and non-negative, got {}",
            weight_kg
        )));
    }

    let hours = duration_seconds / 3600.0;
    Ok((HIKING_MET * weight_kg * hours).round() as u32)
}

// =============================================================================
// Formatting
// =============================================================================

/// Format a duration as `H:MM:SS`, or `M:SS` when under an hour.
///
/// ```rust
/// use hikingmate_geo::metrics::format_duration;
///
/// assert_eq!(format_duration(3661), "1:01:01");
/// assert_eq!(format_duration(125), "2:05");
/// ```
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

/// Format a pace (minutes per km) as `M'SS"`, or `-` when no pace is available.
///
/// ```rust
/// use hikingmate_geo::metrics::format_pace;
///
/// assert_eq!(format_pace(5.5), "5'30\"");
/// assert_eq!(format_pace(0.0), "-");
/// ```
pub fn format_pace(pace_min_per_km: f64) -> String {
    if !pace_min_per_km.is_finite() || pace_min_per_km <= 0.0 {
        return "-".to_string();
    }

    // Round on total seconds so 5.999 becomes 6'00" rather than 5'60"
    let total_seconds = (pace_min_per_km * 60.0).round() as u64;
    format!("{}'{:02}\"", total_seconds / 60, total_seconds % 60)
}

// =============================================================================
// Track Summary
// =============================================================================

/// Settings for [`TrackSummary::compute`].
#[derive(Debug, Clone)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct MetricsConfig {
    /// Hiker body weight in kg for the calorie estimate.
    /// Default: 70.0
    pub weight_kg: f64,
    /// Missing-altitude handling for elevation totals.
    /// Default: MissingAsZero
    pub elevation_policy: ElevationPolicy,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            weight_kg: DEFAULT_WEIGHT_KG,
            elevation_policy: ElevationPolicy::default(),
        }
    }
}

/// Everything the hike summary screen shows for one track.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackSummary {
    pub point_count: u32,
    /// Total distance in meters
    pub distance_meters: f64,
    /// Time between the first and last fix in seconds
    pub duration_seconds: f64,
    pub elevation: ElevationChange,
    /// Minutes per km, 0 when unavailable
    pub pace_min_per_km: f64,
    /// Estimated kcal
    pub calories: u32,
    /// Average speed in km/h, 0 when unavailable
    pub average_speed_kmh: f64,
    pub min_altitude: Option<f64>,
    pub max_altitude: Option<f64>,
    /// Map viewport for the track, `None` when empty
    pub bounds: Option<Bounds>,
}

impl TrackSummary {
    /// Validate a track and compute its summary.
    ///
    /// Unlike the bare metric functions, this rejects bad input up front: any point with
    /// non-finite or out-of-range coordinates, and a weight that is not a positive finite
    /// number. Short tracks are not an error and yield zero metrics.
    ///
    /// # Example
    ///
    /// ```rust
    /// use hikingmate_geo::{GeoPoint, MetricsConfig, TrackSummary};
    ///
    /// let track = vec![
    ///     GeoPoint::with_details(37.5000, 127.0, Some(100.0), 0),
    ///     GeoPoint::with_details(37.5090, 127.0, Some(150.0), 600_000),
    /// ];
    ///
    /// let summary = TrackSummary::compute(&track, &MetricsConfig::default()).unwrap();
    /// assert_eq!(summary.duration_seconds, 600.0);
    /// assert_eq!(summary.calories, 82);
    /// ```
    pub fn compute(points: &[GeoPoint], config: &MetricsConfig) -> Result<Self> {
        if !config.weight_kg.is_finite() || config.weight_kg <= 0.0 {
            return Err(GeoError::invalid_argument(format!(
                "weight must be a positive number of kg, got {}",
                config.weight_kg
            )));
        }

        if let Some(index) = points.iter().position(|p| !p.is_valid()) {
            let p = &points[index];
            return Err(GeoError::InvalidPoint {
                index,
                latitude: p.latitude,
                longitude: p.longitude,
            });
        }

        let distance_meters = total_distance(points);
        let elevation = elevation_change_with(points, config.elevation_policy);

        let duration_seconds = match (points.first(), points.last()) {
            (Some(first), Some(last)) => (last.timestamp - first.timestamp).max(0) as f64 / 1000.0,
            _ => 0.0,
        };

        let average_speed_kmh = if duration_seconds > 0.0 {
            distance_meters / duration_seconds * 3.6
        } else {
            0.0
        };

        let altitudes = points.iter().filter_map(|p| p.altitude);
        let min_altitude = altitudes.clone().reduce(f64::min);
        let max_altitude = altitudes.reduce(f64::max);

        Ok(Self {
            point_count: points.len() as u32,
            distance_meters,
            duration_seconds,
            elevation,
            pace_min_per_km: pace(distance_meters, duration_seconds),
            calories: calories(distance_meters, duration_seconds, config.weight_kg)?,
            average_speed_kmh,
            min_altitude,
            max_altitude,
            bounds: Bounds::from_points(points),
        })
    }

    /// Duration formatted for display.
    pub fn formatted_duration(&self) -> String {
        format_duration(self.duration_seconds.round() as u64)
    }

    /// Pace formatted for display.
    pub fn formatted_pace(&self) -> String {
        format_pace(self.pace_min_per_km)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn with_altitudes(alts: &[Option<f64>]) -> Vec<GeoPoint> {
        alts.iter()
            .enumerate()
            .map(|(i, alt)| GeoPoint::with_details(37.5 + i as f64 * 0.0001, 127.0, *alt, i as i64 * 1000))
            .collect()
    }

    #[test]
    fn test_total_distance_short_tracks() {
        assert_eq!(total_distance(&[]), 0.0);
        assert_eq!(total_distance(&[GeoPoint::new(37.5, 127.0)]), 0.0);
    }

    #[test]
    fn test_total_distance_sums_segments() {
        let track = vec![
            GeoPoint::new(37.5000, 127.0),
            GeoPoint::new(37.5010, 127.0),
            GeoPoint::new(37.5020, 127.0),
        ];
        let expected = haversine_distance(&track[0], &track[1]) + haversine_distance(&track[1], &track[2]);
        assert!((total_distance(&track) - expected).abs() < 1e-9);
        assert!((total_distance(&track) - 222.39).abs() < 0.1);
    }

    #[test]
    fn test_elevation_change_climb() {
        let track = with_altitudes(&[Some(100.0), Some(150.0), Some(200.0)]);
        assert_eq!(elevation_change(&track), ElevationChange { gain: 100.0, loss: 0.0 });
    }

    #[test]
    fn test_elevation_change_descent() {
        let track = with_altitudes(&[Some(200.0), Some(150.0), Some(100.0)]);
        assert_eq!(elevation_change(&track), ElevationChange { gain: 0.0, loss: 100.0 });
    }

    #[test]
    fn test_elevation_change_up_and_down() {
        let track = with_altitudes(&[Some(100.0), Some(150.0), Some(100.0)]);
        assert_eq!(elevation_change(&track), ElevationChange { gain: 50.0, loss: 50.0 });
    }

    #[test]
    fn test_elevation_change_short_track() {
        let track = with_altitudes(&[Some(100.0)]);
        assert_eq!(elevation_change(&track), ElevationChange::default());
    }

    #[test]
    fn test_elevation_missing_as_zero() {
        // The dropout reads as a 100m descent followed by a 110m climb
        let track = with_altitudes(&[Some(100.0), None, Some(110.0)]);
        assert_eq!(elevation_change(&track), ElevationChange { gain: 110.0, loss: 100.0 });
    }

    #[test]
    fn test_elevation_skip_missing() {
        let track = with_altitudes(&[Some(100.0), None, Some(110.0), Some(120.0)]);
        let change = elevation_change_with(&track, ElevationPolicy::SkipMissing);
        assert_eq!(change, ElevationChange { gain: 10.0, loss: 0.0 });
    }

    #[test]
    fn test_pace() {
        assert_eq!(pace(0.0, 600.0), 0.0);
        assert_eq!(pace(1000.0, 600.0), 10.0);
        assert_eq!(pace(2000.0, 1800.0), 15.0);
    }

    #[test]
    fn test_calories() {
        assert_eq!(calories(0.0, 3600.0, 70.0).unwrap(), 490);
        assert_eq!(calories(5000.0, 1800.0, DEFAULT_WEIGHT_KG).unwrap(), 245);
        assert_eq!(calories(0.0, 0.0, 70.0).unwrap(), 0);
        // Distance does not enter the estimate
        assert_eq!(
            calories(10_000.0, 3600.0, 70.0).unwrap(),
            calories(0.0, 3600.0, 70.0).unwrap()
        );
    }

    #[test]
    fn test_calories_rejects_nan_and_negative() {
        assert!(matches!(calories(0.0, 3600.0, f64::NAN), Err(GeoError::InvalidArgument(_))));
        assert!(matches!(calories(0.0, f64::NAN, 70.0), Err(GeoError::InvalidArgument(_))));
        assert!(matches!(calories(0.0, -3600.0, 70.0), Err(GeoError::InvalidArgument(_))));
        assert!(calories(0.0, f64::INFINITY, 70.0).is_err());
        assert!(calories(0.0, 3600.0, -70.0).is_err());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(3661), "1:01:01");
        assert_eq!(format_duration(125), "2:05");
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(3600), "1:00:00");
        assert_eq!(format_duration(36_000 + 59), "10:00:59");
    }

    #[test]
    fn test_format_pace() {
        assert_eq!(format_pace(0.0), "-");
        assert_eq!(format_pace(f64::INFINITY), "-");
        assert_eq!(format_pace(f64::NAN), "-");
        assert_eq!(format_pace(5.5), "5'30\"");
        assert_eq!(format_pace(12.0), "12'00\"");
        assert_eq!(format_pace(5.9999), "6'00\"");
    }

    #[test]
    fn test_summary_compute() {
        let track = vec![
            GeoPoint::with_details(37.5000, 127.0, Some(100.0), 1_000),
            GeoPoint::with_details(37.5045, 127.0, Some(180.0), 901_000),
            GeoPoint::with_details(37.5090, 127.0, Some(150.0), 1_801_000),
        ];
        let summary = TrackSummary::compute(&track, &MetricsConfig::default()).unwrap();

        assert_eq!(summary.point_count, 3);
        assert_eq!(summary.duration_seconds, 1800.0);
        assert!((summary.distance_meters - 1000.75).abs() < 1.0);
        assert_eq!(summary.elevation, ElevationChange { gain: 80.0, loss: 30.0 });
        assert!((summary.pace_min_per_km - 30.0 / (summary.distance_meters / 1000.0)).abs() < 1e-9);
        assert_eq!(summary.calories, 245);
        assert_eq!(summary.min_altitude, Some(100.0));
        assert_eq!(summary.max_altitude, Some(180.0));
        assert_eq!(summary.formatted_duration(), "30:00");
        assert!(summary.bounds.is_some());
    }

    #[test]
    fn test_summary_empty_track() {
        let summary = TrackSummary::compute(&[], &MetricsConfig::default()).unwrap();
        assert_eq!(summary.point_count, 0);
        assert_eq!(summary.distance_meters, 0.0);
        assert_eq!(summary.formatted_pace(), "-");
        assert!(summary.bounds.is_none());
        assert!(summary.min_altitude.is_none());
    }

    #[test]
    fn test_summary_rejects_nan_point() {
        let track = vec![GeoPoint::new(37.5, 127.0), GeoPoint::new(f64::NAN, 127.0)];
        let err = TrackSummary::compute(&track, &MetricsConfig::default()).unwrap_err();
        assert!(matches!(err, GeoError::InvalidPoint { index: 1, .. }));
    }

    #[test]
    fn test_summary_rejects_bad_weight() {
        let track = vec![GeoPoint::new(37.5, 127.0)];
        for weight in [0.0, -70.0, f64::NAN] {
            let config = MetricsConfig { weight_kg: weight, ..Default::default() };
            let err = TrackSummary::compute(&track, &config).unwrap_err();
            assert!(matches!(err, GeoError::InvalidArgument(_)));
        }
    }
}
