//! Stop-time and destination records.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{Location, MalformedScheduleError, ShapeId, StopId, TripId};

/// One scheduled visit of a trip to a stop.
///
/// Carries the stop's name and position alongside the schedule fields, so
/// the builder needs no separate stop table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopTimeRecord {
    pub stop_id: StopId,
    pub stop_name: String,
    pub location: Location,
    pub trip_id: TripId,
    #[serde(default)]
    pub shape_id: Option<ShapeId>,
    /// Position of this visit within its trip.
    pub sequence: u32,
    pub arrival_time: NaiveDateTime,
    pub departure_time: NaiveDateTime,
}

impl StopTimeRecord {
    /// The time a graph node for this visit is placed at.
    ///
    /// This is the departure time, unless the record departs before it
    /// arrives, in which case the arrival time is used.
    pub fn visit_time(&self) -> NaiveDateTime {
        self.departure_time.max(self.arrival_time)
    }

    /// Check the record for the inconsistencies strict building rejects.
    pub fn validate(&self) -> Result<(), MalformedScheduleError> {
        let reason = if self.shape_id.is_none() {
            Some("missing shape id")
        } else if self.departure_time < self.arrival_time {
            Some("departs before it arrives")
        } else if !self.location.is_valid() {
            Some("stop location out of range")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(MalformedScheduleError {
                trip_id: self.trip_id,
                stop_id: self.stop_id,
                sequence: self.sequence,
                reason,
            }),
            None => Ok(()),
        }
    }
}

/// A point of interest a trip can pass through (e.g. a child care centre).
///
/// Attributes are opaque to routing; goal predicates may filter on them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub name: String,
    pub location: Location,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl Destination {
    /// Create a destination with no attributes.
    pub fn new(name: impl Into<String>, location: Location) -> Self {
        Self {
            name: name.into(),
            location,
            attributes: BTreeMap::new(),
        }
    }

    /// Add an attribute, builder style.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Look up an attribute value.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}
