// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    Coordinates, EARTH_RADIUS_METERS, Location, distance_meters, is_target_reached,
    is_within_geofence,
};

/// Latitude offset, in degrees, that lies `meters` north of the equator.
fn degrees_for_meters(meters: f64) -> f64 {
    (meters / EARTH_RADIUS_METERS).to_degrees()
}

#[test]
fn test_distance_to_self_is_zero() {
    let point: Coordinates = Coordinates::new(45.8150, 15.9819);
    assert!(distance_meters(point, point).abs() < 1e-9);
}

#[test]
fn test_distance_along_meridian_matches_arc_length() {
    let origin: Coordinates = Coordinates::new(0.0, 0.0);
    let north: Coordinates = Coordinates::new(degrees_for_meters(1000.0), 0.0);

    let distance: f64 = distance_meters(origin, north);
    assert!((distance - 1000.0).abs() < 0.01, "got {distance}");
}

#[test]
fn test_distance_is_symmetric() {
    let zagreb: Coordinates = Coordinates::new(45.8150, 15.9819);
    let split: Coordinates = Coordinates::new(43.5081, 16.4402);

    let there: f64 = distance_meters(zagreb, split);
    let back: f64 = distance_meters(split, zagreb);
    assert!((there - back).abs() < 1e-6);
    // Roughly 260 km as the crow flies
    assert!((250_000.0..270_000.0).contains(&there), "got {there}");
}

#[test]
fn test_distance_across_antimeridian_takes_short_way() {
    let west: Coordinates = Coordinates::new(0.0, 179.9999);
    let east: Coordinates = Coordinates::new(0.0, -179.9999);

    let distance: f64 = distance_meters(west, east);
    assert!(distance < 50.0, "got {distance}");
}

#[test]
fn test_target_reached_inside_half_radius() {
    let target: Location = Location::new(0.0, 0.0, 100.0).unwrap();
    let position: Coordinates = Coordinates::new(degrees_for_meters(40.0), 0.0);

    assert!(is_target_reached(position, &target));
}

#[test]
fn test_target_not_reached_outside_half_radius() {
    let target: Location = Location::new(0.0, 0.0, 100.0).unwrap();
    let position: Coordinates = Coordinates::new(degrees_for_meters(60.0), 0.0);

    assert!(!is_target_reached(position, &target));
}

#[test]
fn test_geofence_boundary_is_exclusive() {
    let target: Location = Location::new(0.0, 0.0, 100.0).unwrap();

    assert!(is_within_geofence(49.999, &target));
    assert!(!is_within_geofence(50.0, &target));
}
