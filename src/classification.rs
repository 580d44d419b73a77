//! # Trail-Shape Classification
//!
//! Estimates whether a trail is an out-and-back, a loop, or a one-way traverse, and how much
//! of it revisits ground already covered. The trail catalog uses the result to tag each trail.
//!
//! ## Algorithm
//! 1. Require at least `2 × window_size` points, otherwise the track is too short to judge
//! 2. Take the `window_size` points on either side of the midpoint
//! 3. Pair the last `k` points before the midpoint (walking backwards) with the first `k`
//!    points after it, `k = min(compare_points, window sizes)`
//! 4. A pair matches when the points are closer than `match_distance_meters`
//! 5. `match_rate > min_match_rate` means the hiker turned around at the midpoint
//! 6. Independently, start and end closer than `loop_closure_meters` means a closed path
//! 7. Overlap rate: share of second-half points within `match_distance_meters` of the first half
//!
//! These are estimates. Uneven out/back sampling density causes false negatives, and trails
//! that overlap without reversing can cause false positives. The default thresholds match the
//! values already stored in the catalog; changing them reclassifies existing trails.

use std::time::Instant;

use log::{debug, info, warn};
use rstar::{PointDistance, RTree, RTreeObject, AABB};

use crate::geo_utils::{haversine_distance, meters_to_degrees};
use crate::GeoPoint;

/// Configuration for trail-shape classification.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassifierConfig {
    /// Points taken on each side of the midpoint.
    /// Default: 50
    pub window_size: u32,

    /// Maximum number of point pairs compared across the midpoint.
    /// Default: 10
    pub compare_points: u32,

    /// Two samples closer than this are "the same place" (consumer GPS noise).
    /// Default: 10.0 meters
    pub match_distance_meters: f64,

    /// Match rate above which the midpoint counts as a reversal.
    /// Default: 0.7 (retracing rarely matches 100% because of GPS noise and trail width)
    pub min_match_rate: f64,

    /// Start/end distance below which the path is a closed loop.
    /// Default: 50.0 meters
    pub loop_closure_meters: f64,

    /// Overlap rate at or above which a loop or one-way trail is "partial".
    /// Default: 0.2
    pub partial_overlap_rate: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            window_size: 50,
            compare_points: 10,
            match_distance_meters: 10.0,
            min_match_rate: 0.7,
            loop_closure_meters: 50.0,
            partial_overlap_rate: 0.2,
        }
    }
}

/// Heuristic trail-shape label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "ffi", derive(uniffi::Enum))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum TrailShape {
    /// Out-and-back: reversal detected near the midpoint
    Roundtrip,
    /// Closed loop that partly retraces itself
    CircularPartial,
    /// Closed loop without significant retracing
    CircularUnique,
    /// Open path that partly retraces itself
    OnewayPartial,
    /// Open path without significant retracing
    OnewayUnique,
}

impl TrailShape {
    /// Label as stored in the trail catalog.
    pub fn as_str(&self) -> &'static str {
        match self {
            TrailShape::Roundtrip => "ROUNDTRIP",
            TrailShape::CircularPartial => "CIRCULAR_PARTIAL",
            TrailShape::CircularUnique => "CIRCULAR_UNIQUE",
            TrailShape::OnewayPartial => "ONEWAY_PARTIAL",
            TrailShape::OnewayUnique => "ONEWAY_UNIQUE",
        }
    }
}

impl std::fmt::Display for TrailShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Result of the midpoint reversal test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReversePattern {
    /// Fraction of compared pairs within the match distance
    pub match_rate: f64,
    /// Index of the first point after the midpoint
    pub midpoint_index: usize,
    /// Whether `match_rate` exceeded the configured minimum
    pub is_reversed: bool,
}

/// Full classification of one trail.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrailShapeAnalysis {
    pub shape: TrailShape,
    /// Share of midpoint pairs that matched (0..1)
    pub match_rate: f64,
    /// Share of the second half that revisits the first half (0..1)
    pub overlap_rate: f64,
    /// Distance between first and last point in meters
    pub start_end_distance: f64,
    pub has_reverse_pattern: bool,
    pub is_closed_loop: bool,
    /// Midpoint index when a reversal was detected
    pub reversal_midpoint_index: Option<u32>,
}

/// A trail's path as loaded from the catalog.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct TrailTrack {
    pub trail_id: String,
    pub points: Vec<GeoPoint>,
}

impl TrailTrack {
    /// Build a track from a flat `[lat1, lng1, lat2, lng2, ...]` buffer.
    ///
    /// A trailing unpaired value is dropped with a warning. Coordinates are taken as-is;
    /// invalid ones are handled by the classifier.
    pub fn from_flat_coords(trail_id: String, coords: &[f64]) -> Self {
        if coords.len() % 2 != 0 {
            warn!(
                "[Classify] Trail {} has an odd coordinate count ({}), dropping the last value",
                trail_id,
                coords.len()
            );
        }
        let points = coords
            .chunks_exact(2)
            .map(|chunk| GeoPoint::new(chunk[0], chunk[1]))
            .collect();
        Self { trail_id, points }
    }
}

/// Classification outcome for one catalog trail. `analysis` is `None` when the
/// path was too short to classify.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct TrailClassification {
    pub trail_id: String,
    pub analysis: Option<TrailShapeAnalysis>,
}

// =============================================================================
// Reverse Pattern
// =============================================================================

/// Run the midpoint reversal test.
///
/// Returns `None` when the track has fewer than `2 × window_size` points, or when the
/// configuration leaves nothing to compare.
pub fn detect_reverse_pattern(points: &[GeoPoint], config: &ClassifierConfig) -> Option<ReversePattern> {
    let window = config.window_size as usize;
    if window == 0 || config.compare_points == 0 {
        warn!("[Classifier] window_size and compare_points must be positive: {:?}", config);
        return None;
    }
    if points.len() < window * 2 {
        return None;
    }

    let mid = points.len() / 2;
    let before = &points[mid - window..mid];
    let after = &points[mid..mid + window];

    let k = (config.compare_points as usize).min(before.len()).min(after.len());
    let matches = (0..k)
        .filter(|&i| {
            let back = &before[before.len() - 1 - i];
            let forward = &after[i];
            haversine_distance(back, forward) < config.match_distance_meters
        })
        .count();

    let match_rate = matches as f64 / k as f64;

    Some(ReversePattern {
        match_rate,
        midpoint_index: mid,
        is_reversed: match_rate > config.min_match_rate,
    })
}

// =============================================================================
// Overlap Rate
// =============================================================================

/// A GPS point with its index for R-tree queries
#[derive(Debug, Clone, Copy)]
struct IndexedPoint {
    idx: usize,
    lat: f64,
    lng: f64,
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.lat, self.lng])
    }
}

impl PointDistance for IndexedPoint {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlat = self.lat - point[0];
        let dlng = self.lng - point[1];
        dlat * dlat + dlng * dlng
    }
}

/// Estimate what fraction of a track revisits ground it already covered.
///
/// Splits the track at its midpoint and returns the share of second-half points that lie
/// within `match_distance_meters` of some first-half point. An out-and-back scores close
/// to 1.0, a clean loop or one-way traverse close to 0.0. Tracks shorter than two points
/// return 0.0.
///
/// Points with invalid coordinates never count as overlapping and are kept out of the
/// spatial index, so a corrupt catalog entry lowers the rate instead of aborting the batch.
pub fn overlap_rate(points: &[GeoPoint], match_distance_meters: f64) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }

    let mid = points.len() / 2;
    let (first_half, second_half) = points.split_at(mid);

    let indexed: Vec<IndexedPoint> = first_half
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_valid())
        .map(|(i, p)| IndexedPoint { idx: i, lat: p.latitude, lng: p.longitude })
        .collect();
    if indexed.len() < first_half.len() {
        warn!(
            "[Classify] Skipped {} invalid points when indexing the first half",
            first_half.len() - indexed.len()
        );
    }
    let tree = RTree::bulk_load(indexed);

    let overlapping = second_half
        .iter()
        .filter(|p| p.is_valid())
        .filter(|p| {
            // Degree-space radius is a loose prefilter, haversine decides
            let radius_deg = meters_to_degrees(match_distance_meters, p.latitude) * 1.5;
            tree.locate_within_distance([p.latitude, p.longitude], radius_deg * radius_deg)
                .any(|c| haversine_distance(p, &first_half[c.idx]) < match_distance_meters)
        })
        .count();

    overlapping as f64 / second_half.len() as f64
}

// =============================================================================
// Classification
// =============================================================================

/// Classify a trail's shape.
///
/// Returns `None` when the track has fewer than `2 × window_size` points.
///
/// # Example
///
/// ```rust
/// use hikingmate_geo::{GeoPoint, ClassifierConfig, TrailShape, analyze_trail_shape};
///
/// // Walk 100 points north, then retrace them back to the trailhead
/// let out: Vec<GeoPoint> = (0..100)
///     .map(|i| GeoPoint::new(37.5 + i as f64 * 0.0002, 127.0))
///     .collect();
/// let mut track = out.clone();
/// track.extend(out.iter().rev());
///
/// let analysis = analyze_trail_shape(&track, &ClassifierConfig::default()).unwrap();
/// assert_eq!(analysis.shape, TrailShape::Roundtrip);
/// assert!(analysis.is_closed_loop);
/// ```
pub fn analyze_trail_shape(points: &[GeoPoint], config: &ClassifierConfig) -> Option<TrailShapeAnalysis> {
    let reverse = detect_reverse_pattern(points, config)?;

    // detect_reverse_pattern guarantees at least two points here
    let start_end_distance = haversine_distance(&points[0], &points[points.len() - 1]);
    let is_closed_loop = start_end_distance < config.loop_closure_meters;
    let overlap = overlap_rate(points, config.match_distance_meters);
    let is_partial = overlap >= config.partial_overlap_rate;

    let shape = match (reverse.is_reversed, is_closed_loop, is_partial) {
        (true, _, _) => TrailShape::Roundtrip,
        (false, true, true) => TrailShape::CircularPartial,
        (false, true, false) => TrailShape::CircularUnique,
        (false, false, true) => TrailShape::OnewayPartial,
        (false, false, false) => TrailShape::OnewayUnique,
    };

    debug!(
        "[Classifier] {} points -> {} (match {:.2}, overlap {:.2}, start-end {:.0}m)",
        points.len(),
        shape,
        reverse.match_rate,
        overlap,
        start_end_distance
    );

    Some(TrailShapeAnalysis {
        shape,
        match_rate: reverse.match_rate,
        overlap_rate: overlap,
        start_end_distance,
        has_reverse_pattern: reverse.is_reversed,
        is_closed_loop,
        reversal_midpoint_index: reverse.is_reversed.then_some(reverse.midpoint_index as u32),
    })
}

/// Classify a batch of catalog trails sequentially.
pub fn classify_trails(tracks: &[TrailTrack], config: &ClassifierConfig) -> Vec<TrailClassification> {
    let start = Instant::now();

    let results: Vec<TrailClassification> = tracks
        .iter()
        .map(|track| classify_one(track, config))
        .collect();

    log_batch(&results, start);
    results
}

/// Classify a batch of catalog trails using rayon.
///
/// Same output as [`classify_trails`], in the same order. Recommended for
/// full-catalog runs.
#[cfg(feature = "parallel")]
pub fn classify_trails_parallel(tracks: &[TrailTrack], config: &ClassifierConfig) -> Vec<TrailClassification> {
    use rayon::prelude::*;

    let start = Instant::now();

    let results: Vec<TrailClassification> = tracks
        .par_iter()
        .map(|track| classify_one(track, config))
        .collect();

    log_batch(&results, start);
    results
}

fn classify_one(track: &TrailTrack, config: &ClassifierConfig) -> TrailClassification {
    let analysis = analyze_trail_shape(&track.points, config);
    if analysis.is_none() {
        debug!(
            "[Classifier] Trail {} has {} points, too short to classify",
            track.trail_id,
            track.points.len()
        );
    }
    TrailClassification {
        trail_id: track.trail_id.clone(),
        analysis,
    }
}

fn log_batch(results: &[TrailClassification], start: Instant) {
    let classified = results.iter().filter(|r| r.analysis.is_some()).count();
    info!(
        "[Classifier] Classified {} of {} trails in {:?}",
        classified,
        results.len(),
        start.elapsed()
    );
}

// =============================================================================
// Unit Tests
// =============================================================================
