//! Normalize stored path coordinates and summarize them.
//!
//! Run with: cargo run --example normalize_paths

use hikingmate_geo::ingest::parse_path_json;
use hikingmate_geo::{analyze_trail_shape, geo_utils, metrics, ClassifierConfig};

fn main() {
    // Records written by different tooling generations
    let stored = r#"[
        {"lat": 37.6584, "lng": 126.9779, "ele": 120.0},
        {"latitude": 37.6592, "longitude": 126.9785, "altitude": 141.0},
        {"lat": 37.6601, "lon": 126.9790, "elevation": 166.0},
        [37.6615, 126.9801, 190.0],
        null,
        [37.6630, 126.9812]
    ]"#;

    let points = match parse_path_json(stored) {
        Ok(points) => points,
        Err(e) => {
            eprintln!("Failed to parse path: {}", e);
            return;
        }
    };

    println!("Normalized {} points\n", points.len());
    for p in &points {
        println!("  {:.4}, {:.4}  alt {:?}", p.latitude, p.longitude, p.altitude);
    }

    // Fill sampling gaps before classification
    let dense = geo_utils::fill_gaps(&points, 10.0);
    println!("\nAfter gap filling: {} points", dense.len());
    println!("Distance: {:.0}m", metrics::total_distance(&dense));

    let strict = metrics::elevation_change_with(&points, metrics::ElevationPolicy::SkipMissing);
    let legacy = metrics::elevation_change(&points);
    println!("Elevation (skip missing):   +{:.0}m / -{:.0}m", strict.gain, strict.loss);
    println!("Elevation (missing as 0m):  +{:.0}m / -{:.0}m", legacy.gain, legacy.loss);

    match analyze_trail_shape(&dense, &ClassifierConfig::default()) {
        Some(analysis) => println!("Shape: {}", analysis.shape),
        None => println!("Shape: unknown (too few points)"),
    }

    if let Some(bounds) = geo_utils::compute_bounds(&dense) {
        let center = bounds.center();
        println!("Map center: {:.4}, {:.4}", center.latitude, center.longitude);
    }
}
