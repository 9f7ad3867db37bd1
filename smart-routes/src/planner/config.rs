//! Configuration for the trip planner.

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Configuration parameters for trip planning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// How many stops around the origin and target are considered.
    /// Searches start from visits at these stops and end at any of them.
    pub nearby_stops: usize,

    /// Maximum total trip time (minutes), summed over both legs.
    /// `None` leaves trips unbounded.
    pub max_trip_mins: Option<i64>,
}

impl PlannerConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(nearby_stops: usize, max_trip_mins: Option<i64>) -> Self {
        Self {
            nearby_stops,
            max_trip_mins,
        }
    }

    /// Returns the maximum trip time as a Duration.
    pub fn max_trip(&self) -> Option<Duration> {
        self.max_trip_mins.map(Duration::minutes)
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            nearby_stops: 10,
            max_trip_mins: None,
        }
    }
}
