//! Live hike recording.
//!
//! The device's location service pushes fixes at irregular intervals: as often as once per
//! second while the hike screen is active, or one poll every five minutes in standby.
//! [`TrackRecorder`] turns those fixes into an append-only track and keeps distance and
//! elevation totals up to date so the live display never rescans the whole track.

use std::time::Duration;

use log::{debug, warn};

use crate::error::Result;
use crate::geo_utils::haversine_distance;
use crate::metrics::{altitude_delta, ElevationChange, ElevationPolicy, MetricsConfig, TrackSummary};
use crate::GeoPoint;

/// How often the location service is sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "ffi", derive(uniffi::Enum))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SamplingMode {
    /// Every available fix while tracking is active
    #[default]
    Continuous,
    /// One poll every five minutes in the background
    Standby,
}

impl SamplingMode {
    /// Minimum spacing between accepted fixes.
    pub fn interval(&self) -> Duration {
        match self {
            SamplingMode::Continuous => Duration::from_secs(1),
            SamplingMode::Standby => Duration::from_secs(5 * 60),
        }
    }

    fn interval_millis(&self) -> i64 {
        self.interval().as_millis() as i64
    }
}

/// A raw fix as reported by the device or browser geolocation API.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocationFix {
    pub latitude: f64,
    pub longitude: f64,
    /// Horizontal accuracy radius in meters
    pub accuracy: f64,
    pub altitude: Option<f64>,
    pub altitude_accuracy: Option<f64>,
    /// Degrees clockwise from true north
    pub heading: Option<f64>,
    /// Meters per second
    pub speed: Option<f64>,
    /// Epoch milliseconds
    pub timestamp: i64,
}

impl From<&LocationFix> for GeoPoint {
    fn from(fix: &LocationFix) -> Self {
        GeoPoint::with_details(fix.latitude, fix.longitude, fix.altitude, fix.timestamp)
    }
}

/// Settings for a recording session.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct RecorderConfig {
    /// Default: Continuous
    pub mode: SamplingMode,
    /// Drop fixes whose reported accuracy is worse than this many meters.
    /// Default: None (accuracy is not used)
    pub max_accuracy_meters: Option<f64>,
    /// Missing-altitude handling for the running elevation totals.
    /// Default: MissingAsZero
    pub elevation_policy: ElevationPolicy,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            mode: SamplingMode::default(),
            max_accuracy_meters: None,
            elevation_policy: ElevationPolicy::default(),
        }
    }
}

/// What happened to a pushed fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "ffi", derive(uniffi::Enum))]
pub enum FixStatus {
    Accepted,
    /// Older than the last accepted fix
    OutOfOrder,
    /// Arrived before the sampling interval elapsed
    TooSoon,
    /// Non-finite or out-of-range coordinates
    InvalidCoordinates,
    /// Reported accuracy worse than `max_accuracy_meters`
    LowAccuracy,
}

/// Append-only recorder for one hike.
#[derive(Debug, Clone, Default)]
pub struct TrackRecorder {
    config: RecorderConfig,
    points: Vec<GeoPoint>,
    distance_meters: f64,
    elevation: ElevationChange,
}

impl TrackRecorder {
    pub fn new(config: RecorderConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Switch between continuous and standby sampling without losing the track.
    pub fn set_mode(&mut self, mode: SamplingMode) {
        debug!("[Recorder] Sampling mode {:?} -> {:?}", self.config.mode, mode);
        self.config.mode = mode;
    }

    pub fn mode(&self) -> SamplingMode {
        self.config.mode
    }

    /// Offer a fix to the recorder.
    ///
    /// Accepted fixes are appended and the running totals extended by one segment,
    /// using the same pairwise formulas as [`crate::metrics`].
    ///
    /// ```rust
    /// use hikingmate_geo::{FixStatus, LocationFix, RecorderConfig, TrackRecorder};
    ///
    /// let fix = |lat: f64, ts: i64| LocationFix {
    ///     latitude: lat, longitude: 127.0, accuracy: 5.0, altitude: Some(100.0),
    ///     altitude_accuracy: None, heading: None, speed: None, timestamp: ts,
    /// };
    ///
    /// let mut recorder = TrackRecorder::new(RecorderConfig::default());
    /// assert_eq!(recorder.push(&fix(37.5000, 0)), FixStatus::Accepted);
    /// assert_eq!(recorder.push(&fix(37.5001, 500)), FixStatus::TooSoon);
    /// assert_eq!(recorder.push(&fix(37.5002, 2_000)), FixStatus::Accepted);
    /// assert!((recorder.distance_meters() - 22.24).abs() < 0.1);
    /// ```
    pub fn push(&mut self, fix: &LocationFix) -> FixStatus {
        let point = GeoPoint::from(fix);
        if !point.is_valid() {
            warn!("[Recorder] Dropping fix with invalid coordinates: {:?}", fix);
            return FixStatus::InvalidCoordinates;
        }

        if let Some(max_accuracy) = self.config.max_accuracy_meters {
            // NaN accuracy never passes the check
            if !(fix.accuracy <= max_accuracy) {
                debug!("[Recorder] Dropping fix with accuracy {:.0}m", fix.accuracy);
                return FixStatus::LowAccuracy;
            }
        }

        if let Some(last) = self.points.last() {
            if point.timestamp < last.timestamp {
                warn!(
                    "[Recorder] Dropping out-of-order fix ({} < {})",
                    point.timestamp, last.timestamp
                );
                return FixStatus::OutOfOrder;
            }
            if point.timestamp - last.timestamp < self.config.mode.interval_millis() {
                return FixStatus::TooSoon;
            }

            self.distance_meters += haversine_distance(last, &point);
            if let Some(delta) = altitude_delta(last, &point, self.config.elevation_policy) {
                self.elevation.accumulate(delta);
            }
        }

        self.points.push(point);
        FixStatus::Accepted
    }

    /// Points accepted so far, in recording order.
    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Running distance in meters.
    pub fn distance_meters(&self) -> f64 {
        self.distance_meters
    }

    /// Running elevation gain and loss.
    pub fn elevation(&self) -> ElevationChange {
        self.elevation
    }

    /// Elapsed seconds between the first and last accepted fix.
    pub fn elapsed_seconds(&self) -> f64 {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => (last.timestamp - first.timestamp) as f64 / 1000.0,
            _ => 0.0,
        }
    }

    /// Full summary of the track so far.
    pub fn summary(&self, config: &MetricsConfig) -> Result<TrackSummary> {
        TrackSummary::compute(&self.points, config)
    }

    /// End the session and hand over the recorded track.
    pub fn finish(self) -> Vec<GeoPoint> {
        debug!(
            "[Recorder] Finished with {} points, {:.0}m",
            self.points.len(),
            self.distance_meters
        );
        self.points
    }
}
