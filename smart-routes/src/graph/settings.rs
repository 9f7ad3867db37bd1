//! Graph construction settings.

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Configuration parameters for graph construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphBuilderSettings {
    /// Maximum walking distance (metres) between two linked stops, or
    /// between a destination and a stop.
    pub max_walk_metres: f64,

    /// Maximum number of nearby stops kept per stop and per destination.
    pub max_nearby_stops: usize,

    /// Maximum wait (minutes) when changing trips.
    pub transfer_window_mins: i64,

    /// Walking speed used to turn distances into walk times.
    pub walking_speed_mps: f64,

    /// Reject malformed stop times instead of building a degraded graph.
    pub strict: bool,
}

impl GraphBuilderSettings {
    /// Create settings with the given parameters.
    pub fn new(
        max_walk_metres: f64,
        max_nearby_stops: usize,
        transfer_window_mins: i64,
        walking_speed_mps: f64,
        strict: bool,
    ) -> Self {
        Self {
            max_walk_metres,
            max_nearby_stops,
            transfer_window_mins,
            walking_speed_mps,
            strict,
        }
    }

    /// Returns the transfer window as a Duration.
    pub fn transfer_window(&self) -> Duration {
        Duration::minutes(self.transfer_window_mins)
    }

    /// Time needed to walk `metres`, rounded up to whole seconds.
    pub fn walk_time(&self, metres: f64) -> Duration {
        if self.walking_speed_mps <= 0.0 || !metres.is_finite() {
            return Duration::zero();
        }
        Duration::seconds((metres.max(0.0) / self.walking_speed_mps).ceil() as i64)
    }
}

impl Default for GraphBuilderSettings {
    fn default() -> Self {
        Self {
            max_walk_metres: 800.0,
            max_nearby_stops: 8,
            transfer_window_mins: 30,
            walking_speed_mps: 1.3,
            strict: false,
        }
    }
}
