//! # HikingMate Geo
//!
//! GPS track geometry for the HikingMate hiking app.
//!
//! This library provides:
//! - Distance and bearing primitives (Haversine, compass directions)
//! - Hike metrics: distance, elevation gain/loss, pace, calories, display formatting
//! - Trail-shape classification (out-and-back, loop, one-way) for the trail catalog
//! - A live recorder that keeps running totals while GPS fixes arrive
//!
//! Everything is pure computation over ordered point sequences; nothing here performs I/O.
//!
//! ## Features
//!
//! - **`ingest`** (default) - Parse stored path-coordinate JSON into [`GeoPoint`]s
//! - **`parallel`** - Classify trail batches in parallel with rayon
//! - **`ffi`** - Enable FFI bindings for mobile platforms (iOS/Android)
//! - **`full`** - Enable all features
//!
//! ## Quick Start
//!
//! ```rust
//! use hikingmate_geo::{GeoPoint, MetricsConfig, TrackSummary, metrics};
//!
//! let hike = vec![
//!     GeoPoint::with_details(37.6584, 126.9779, Some(120.0), 0),
//!     GeoPoint::with_details(37.6620, 126.9801, Some(310.0), 1_200_000),
//!     GeoPoint::with_details(37.6658, 126.9832, Some(520.0), 2_700_000),
//! ];
//!
//! let summary = TrackSummary::compute(&hike, &MetricsConfig::default()).unwrap();
//! println!(
//!     "{:.1} km, +{:.0} m, {} ({} /km), {} kcal",
//!     summary.distance_meters / 1000.0,
//!     summary.elevation.gain,
//!     summary.formatted_duration(),
//!     metrics::format_pace(summary.pace_min_per_km),
//!     summary.calories,
//! );
//! ```

pub mod error;
pub use error::{GeoError, Result};

// Distance/bearing primitives and track shaping helpers
pub mod geo_utils;
pub use geo_utils::{bearing, haversine_distance, CompassDirection};

// Hike aggregate metrics and summary
pub mod metrics;
pub use metrics::{
    ElevationChange, ElevationPolicy, MetricsConfig, TrackSummary,
    calories, elevation_change, elevation_change_with, format_duration, format_pace, pace,
    total_distance,
};

// Trail-shape classification for the catalog
pub mod classification;
pub use classification::{
    ClassifierConfig, TrailClassification, TrailShape, TrailShapeAnalysis, TrailTrack,
    analyze_trail_shape, classify_trails,
};
#[cfg(feature = "parallel")]
pub use classification::classify_trails_parallel;

// Live recording
pub mod recording;
pub use recording::{FixStatus, LocationFix, RecorderConfig, SamplingMode, TrackRecorder};

// Stored path normalization
#[cfg(feature = "ingest")]
pub mod ingest;

#[cfg(feature = "ffi")]
uniffi::setup_scaffolding!();

/// Initialize logging for Android (only used in FFI)
#[cfg(all(feature = "ffi", target_os = "android"))]
fn init_logging() {
    use android_logger::Config;
    use log::LevelFilter;

    android_logger::init_once(
        Config::default()
            .with_max_level(LevelFilter::Debug)
            .with_tag("HikingMateGeo")
    );
}

#[cfg(all(feature = "ffi", not(target_os = "android")))]
fn init_logging() {
    // No-op on non-Android platforms
}

// ============================================================================
// Core Types
// ============================================================================

/// A recorded GPS position.
///
/// Latitude and longitude are WGS84 degrees. `timestamp` is epoch milliseconds;
/// points read from the catalog without a time carry 0.
///
/// # Example
/// ```
/// use hikingmate_geo::GeoPoint;
/// let summit = GeoPoint::with_details(37.6586, 126.9780, Some(836.5), 1_700_000_000_000);
/// assert!(summit.is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
    /// Meters above sea level, if the fix reported one
    pub altitude: Option<f64>,
    /// Epoch milliseconds
    pub timestamp: i64,
}

impl GeoPoint {
    /// Create a point with no altitude and a zero timestamp.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude, altitude: None, timestamp: 0 }
    }

    /// Create a point with altitude and timestamp.
    pub fn with_details(latitude: f64, longitude: f64, altitude: Option<f64>, timestamp: i64) -> Self {
        Self { latitude, longitude, altitude, timestamp }
    }

    /// Check if the point has valid coordinates (and a finite altitude when present).
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
            && self.altitude.map_or(true, f64::is_finite)
    }
}

/// Bounding box for a track.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl Bounds {
    /// Create bounds from GPS points. Returns `None` for an empty slice.
    pub fn from_points(points: &[GeoPoint]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let mut min_lat = f64::MAX;
        let mut max_lat = f64::MIN;
        let mut min_lng = f64::MAX;
        let mut max_lng = f64::MIN;

        for p in points {
            min_lat = min_lat.min(p.latitude);
            max_lat = max_lat.max(p.latitude);
            min_lng = min_lng.min(p.longitude);
            max_lng = max_lng.max(p.longitude);
        }

        Some(Self { min_lat, max_lat, min_lng, max_lng })
    }

    /// Get the center point of the bounds, used to center the map on a track.
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lng + self.max_lng) / 2.0,
        )
    }
}

// ============================================================================
// FFI Exports (only when feature enabled)
// ============================================================================

#[cfg(feature = "ffi")]
mod ffi {
    use super::*;
    use log::{info, warn};
    use std::sync::{Arc, Mutex};

    // ========================================================================
    // Primitives & Metrics
    // ========================================================================

    /// Great-circle distance in meters.
    #[uniffi::export]
    pub fn ffi_distance(p1: GeoPoint, p2: GeoPoint) -> f64 {
        haversine_distance(&p1, &p2)
    }

    /// Initial bearing in degrees within [0, 360).
    #[uniffi::export]
    pub fn ffi_bearing(p1: GeoPoint, p2: GeoPoint) -> f64 {
        bearing(&p1, &p2)
    }

    /// Eight-way compass bucket for a bearing.
    #[uniffi::export]
    pub fn ffi_compass_direction(bearing_degrees: f64) -> CompassDirection {
        CompassDirection::from_bearing(bearing_degrees)
    }

    /// Korean compass label ("북동", ...) for a bearing.
    #[uniffi::export]
    pub fn ffi_compass_korean_name(bearing_degrees: f64) -> String {
        CompassDirection::from_bearing(bearing_degrees).korean_name().to_string()
    }

    #[uniffi::export]
    pub fn ffi_total_distance(points: Vec<GeoPoint>) -> f64 {
        total_distance(&points)
    }

    #[uniffi::export]
    pub fn ffi_elevation_change(points: Vec<GeoPoint>, policy: ElevationPolicy) -> ElevationChange {
        elevation_change_with(&points, policy)
    }

    #[uniffi::export]
    pub fn ffi_pace(distance_meters: f64, duration_seconds: f64) -> f64 {
        pace(distance_meters, duration_seconds)
    }

    /// Calorie estimate, or `None` for a negative or non-finite duration or weight.
    #[uniffi::export]
    pub fn ffi_calories(distance_meters: f64, duration_seconds: f64, weight_kg: f64) -> Option<u32> {
        calories(distance_meters, duration_seconds, weight_kg)
            .map_err(|e| warn!("[HikingMateGeo] calories: {}", e))
            .ok()
    }

    #[uniffi::export]
    pub fn ffi_format_duration(seconds: u64) -> String {
        format_duration(seconds)
    }

    #[uniffi::export]
    pub fn ffi_format_pace(pace_min_per_km: f64) -> String {
        format_pace(pace_min_per_km)
    }

    /// Validate a track and compute its summary. Returns `None` (and logs why) on
    /// invalid input.
    #[uniffi::export]
    pub fn ffi_track_summary(points: Vec<GeoPoint>, config: MetricsConfig) -> Option<TrackSummary> {
        init_logging();
        match TrackSummary::compute(&points, &config) {
            Ok(summary) => Some(summary),
            Err(e) => {
                warn!("[HikingMateGeo] Track summary rejected: {}", e);
                None
            }
        }
    }

    /// Get default metrics configuration.
    #[uniffi::export]
    pub fn default_metrics_config() -> MetricsConfig {
        MetricsConfig::default()
    }

    // ========================================================================
    // Live Recording
    // ========================================================================

    /// Recorder handle shared with the mobile location service.
    #[derive(uniffi::Object)]
    pub struct FfiTrackRecorder {
        inner: Mutex<TrackRecorder>,
    }

    #[uniffi::export]
    impl FfiTrackRecorder {
        #[uniffi::constructor]
        pub fn new(config: RecorderConfig) -> Arc<Self> {
            init_logging();
            info!("[HikingMateGeo] Recorder started in {:?} mode", config.mode);
            Arc::new(Self { inner: Mutex::new(TrackRecorder::new(config)) })
        }

        pub fn push(&self, fix: LocationFix) -> FixStatus {
            self.recorder().push(&fix)
        }

        pub fn set_mode(&self, mode: SamplingMode) {
            self.recorder().set_mode(mode);
        }

        pub fn distance_meters(&self) -> f64 {
            self.recorder().distance_meters()
        }

        pub fn elevation(&self) -> ElevationChange {
            self.recorder().elevation()
        }

        pub fn elapsed_seconds(&self) -> f64 {
            self.recorder().elapsed_seconds()
        }

        pub fn points(&self) -> Vec<GeoPoint> {
            self.recorder().points().to_vec()
        }

        pub fn summary(&self, config: MetricsConfig) -> Option<TrackSummary> {
            self.recorder().summary(&config).ok()
        }
    }

    impl FfiTrackRecorder {
        fn recorder(&self) -> std::sync::MutexGuard<'_, TrackRecorder> {
            // A panic mid-push leaves at worst one missing segment; keep recording
            self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
        }
    }

    /// Get default recorder configuration.
    #[uniffi::export]
    pub fn default_recorder_config() -> RecorderConfig {
        RecorderConfig::default()
    }

    // ========================================================================
    // Trail Classification
    // ========================================================================

    #[uniffi::export]
    pub fn ffi_analyze_trail_shape(points: Vec<GeoPoint>, config: ClassifierConfig) -> Option<TrailShapeAnalysis> {
        analyze_trail_shape(&points, &config)
    }

    /// Classify many catalog trails in one call (parallel).
    #[uniffi::export]
    pub fn ffi_classify_trails(tracks: Vec<TrailTrack>, config: ClassifierConfig) -> Vec<TrailClassification> {
        init_logging();
        info!("[HikingMateGeo] classify_trails called with {} trails", tracks.len());
        classify_trails_parallel(&tracks, &config)
    }

    /// Input for flat buffer batch processing (zero-copy from JS TypedArray)
    #[derive(Debug, Clone, uniffi::Record)]
    pub struct FlatTrailTrack {
        pub trail_id: String,
        /// Flat array of coordinates: [lat1, lng1, lat2, lng2, ...]
        pub coords: Vec<f64>,
    }

    /// Classify trails from flat coordinate buffers.
    #[uniffi::export]
    pub fn classify_trails_from_flat(tracks: Vec<FlatTrailTrack>, config: ClassifierConfig) -> Vec<TrailClassification> {
        init_logging();
        info!("[HikingMateGeo] FLAT classify_trails called with {} trails", tracks.len());

        let tracks: Vec<TrailTrack> = tracks
            .into_iter()
            .map(|t| TrailTrack::from_flat_coords(t.trail_id, &t.coords))
            .collect();

        classify_trails_parallel(&tracks, &config)
    }

    /// Get default classifier configuration.
    #[uniffi::export]
    pub fn default_classifier_config() -> ClassifierConfig {
        ClassifierConfig::default()
    }

    // ========================================================================
    // Ingestion
    // ========================================================================

    /// Normalize a stored path-coordinate JSON array. Returns an empty list on
    /// malformed JSON.
    #[cfg(feature = "ingest")]
    #[uniffi::export]
    pub fn ffi_parse_path_json(json: String) -> Vec<GeoPoint> {
        init_logging();
        crate::ingest::parse_path_json(&json).unwrap_or_else(|e| {
            warn!("[HikingMateGeo] {}", e);
            Vec::new()
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
