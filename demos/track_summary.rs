//! Summarize a recorded hike the way the hike summary screen does.
//!
//! Run with: cargo run --example track_summary

use hikingmate_geo::{
    bearing, CompassDirection, FixStatus, LocationFix, MetricsConfig, RecorderConfig,
    TrackRecorder, TrackSummary,
};

fn main() {
    // Simulated climb: one fix every 10 seconds, ~15m apart, gaining altitude
    let fixes: Vec<LocationFix> = (0..360)
        .map(|i| LocationFix {
            latitude: 37.6584 + i as f64 * 0.0001,
            longitude: 126.9779 + (i as f64 * 0.05).sin() * 0.0003,
            accuracy: 6.0,
            altitude: if i % 50 == 49 { None } else { Some(120.0 + i as f64 * 1.8) },
            altitude_accuracy: Some(10.0),
            heading: None,
            speed: Some(1.2),
            timestamp: 1_700_000_000_000 + i as i64 * 10_000,
        })
        .collect();

    let mut recorder = TrackRecorder::new(RecorderConfig::default());
    let accepted = fixes
        .iter()
        .filter(|fix| recorder.push(fix) == FixStatus::Accepted)
        .count();

    println!("Hike Summary Example\n");
    println!("Accepted {} of {} fixes", accepted, fixes.len());
    println!("Live totals: {:.0}m, +{:.0}m / -{:.0}m\n",
        recorder.distance_meters(), recorder.elevation().gain, recorder.elevation().loss);

    let summary = match TrackSummary::compute(recorder.points(), &MetricsConfig::default()) {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("Could not summarize track: {}", e);
            return;
        }
    };

    println!("Distance:  {:.2} km", summary.distance_meters / 1000.0);
    println!("Duration:  {}", summary.formatted_duration());
    println!("Pace:      {} /km", summary.formatted_pace());
    println!("Speed:     {:.1} km/h", summary.average_speed_kmh);
    println!("Elevation: +{:.0}m / -{:.0}m", summary.elevation.gain, summary.elevation.loss);
    println!("Calories:  {} kcal", summary.calories);

    let points = recorder.points();
    if let (Some(first), Some(last)) = (points.first(), points.last()) {
        let heading = bearing(first, last);
        let direction = CompassDirection::from_bearing(heading);
        println!("Heading:   {:.0}° ({}, {})", heading, direction.abbreviation(), direction.korean_name());
    }
}
