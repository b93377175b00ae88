// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::Deserialize;
use std::time::Duration;
use treasure_hunt_persistence::StorageConfig;

/// Base of the generated title for new treasure hunts.
pub const UNNAMED_TREASURE_HUNT: &str = "Unnamed Treasure Hunt";

/// Static configuration read by the hunt manager at start-up.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Where treasure hunts are stored.
    pub storage: StorageConfig,
    /// Base of generated treasure hunt titles, followed by a number.
    pub unnamed_hunt_title: String,
    /// bcrypt cost used when hashing hunt passwords.
    pub password_cost: u32,
    /// Location tracking timings.
    pub location: TrackerSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            unnamed_hunt_title: String::from(UNNAMED_TREASURE_HUNT),
            password_cost: bcrypt::DEFAULT_COST,
            location: TrackerSettings::default(),
        }
    }
}

/// Timings and accuracy for polling a location provider.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrackerSettings {
    /// Delay between position polls.
    pub update_interval: Duration,
    /// How long a target is watched before giving up.
    pub run_time: Duration,
    /// Pause after asking the provider to start, before polling its status.
    pub startup_delay: Duration,
    /// How long the provider may stay initializing.
    pub init_wait: Duration,
    /// Accuracy requested from the provider, in meters.
    pub desired_accuracy_meters: f64,
    /// Minimum movement before the provider reports a new position, in meters.
    pub update_distance_meters: f64,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            update_interval: Duration::from_secs(1),
            run_time: Duration::from_secs(300),
            startup_delay: Duration::from_secs(2),
            init_wait: Duration::from_secs(20),
            desired_accuracy_meters: 1.0,
            update_distance_meters: 1.0,
        }
    }
}
