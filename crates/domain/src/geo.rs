// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Great-circle distance and geofence checks.
//!
//! The Earth is modelled as a sphere. A target counts as reached when the
//! player is closer than half of its acceptance radius, so a 100 m target is
//! reached inside 50 m.

use crate::types::{Coordinates, Location};

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Haversine distance in meters between two points.
#[must_use]
pub fn distance_meters(from: Coordinates, to: Coordinates) -> f64 {
    let from_latitude: f64 = from.latitude.to_radians();
    let to_latitude: f64 = to.latitude.to_radians();
    let delta_latitude: f64 = delta_angle_degrees(from.latitude, to.latitude).to_radians();
    let delta_longitude: f64 = delta_angle_degrees(from.longitude, to.longitude).to_radians();

    // Square of half the chord length between the points
    let a: f64 = (delta_latitude / 2.0).sin().powi(2)
        + from_latitude.cos() * to_latitude.cos() * (delta_longitude / 2.0).sin().powi(2);

    let angular_distance: f64 = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * angular_distance
}

/// Shortest signed difference between two angles, in `-180..=180` degrees.
fn delta_angle_degrees(from: f64, to: f64) -> f64 {
    let delta: f64 = (to - from).rem_euclid(360.0);
    if delta > 180.0 { delta - 360.0 } else { delta }
}

/// Returns true if `distance` lies strictly inside half of the target's radius.
#[must_use]
pub fn is_within_geofence(distance: f64, target: &Location) -> bool {
    distance < target.radius / 2.0
}

/// Returns true if `position` has reached `target`.
#[must_use]
pub fn is_target_reached(position: Coordinates, target: &Location) -> bool {
    is_within_geofence(distance_meters(position, target.coordinates()), target)
}
