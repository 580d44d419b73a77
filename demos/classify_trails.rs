//! Example of classifying a batch of catalog trails.
//!
//! Run with: cargo run --example classify_trails --features parallel

use hikingmate_geo::{classify_trails_parallel, ClassifierConfig, GeoPoint, TrailTrack};
use std::time::Instant;

fn main() {
    println!("Trail Shape Classification Example\n");

    let config = ClassifierConfig::default();
    let mut tracks = Vec::new();

    // Out-and-back: 150 points up the ridge, then back down
    let ridge: Vec<GeoPoint> = (0..150)
        .map(|i| GeoPoint::new(37.6584 + i as f64 * 0.0002, 126.9779))
        .collect();
    let mut out_and_back = ridge.clone();
    out_and_back.extend(add_noise(&ridge, 0.00003).into_iter().rev());
    tracks.push(TrailTrack { trail_id: "bukhansan-baegundae".into(), points: out_and_back });

    // Loop around a reservoir
    let (lat0, lng0, r) = (37.5400_f64, 127.0500_f64, 0.006_f64);
    let loop_points: Vec<GeoPoint> = (0..300)
        .map(|i| {
            let theta = 2.0 * std::f64::consts::PI * i as f64 / 299.0;
            GeoPoint::new(lat0 + r * theta.cos(), lng0 + r * theta.sin() / lat0.to_radians().cos())
        })
        .collect();
    tracks.push(TrailTrack { trail_id: "seoul-dulle-loop".into(), points: loop_points });

    // Point-to-point traverse
    let traverse: Vec<GeoPoint> = (0..250)
        .map(|i| GeoPoint::new(35.3370 + i as f64 * 0.0001, 127.7300 + i as f64 * 0.0002))
        .collect();
    tracks.push(TrailTrack { trail_id: "jirisan-ridge".into(), points: traverse });

    // Too short to classify
    tracks.push(TrailTrack { trail_id: "short-walk".into(), points: ridge[..40].to_vec() });

    let start = Instant::now();
    let results = classify_trails_parallel(&tracks, &config);
    println!("Classified {} trails in {:?}\n", results.len(), start.elapsed());

    for result in &results {
        match &result.analysis {
            Some(a) => println!(
                "  {:<22} {:<17} match {:.2}  overlap {:.2}  start-end {:.0}m",
                result.trail_id, a.shape, a.match_rate, a.overlap_rate, a.start_end_distance
            ),
            None => println!("  {:<22} (too short)", result.trail_id),
        }
    }
}

/// Add small noise to route points to simulate GPS variation
fn add_noise(route: &[GeoPoint], noise: f64) -> Vec<GeoPoint> {
    route
        .iter()
        .enumerate()
        .map(|(i, p)| {
            GeoPoint::new(
                p.latitude + noise * (i as f64 % 2.0 - 0.5),
                p.longitude + noise * ((i + 1) as f64 % 2.0 - 0.5),
            )
        })
        .collect()
}
