//! Trip requests and destination filters.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::{Destination, Location};
use crate::graph::{Graph, Node};
use crate::search::{GoalPredicate, TimeDirection};

/// Request for a trip between two locations.
///
/// Going forwards, `time` is the earliest departure from `origin`. Going
/// backwards, it is the deadline for reaching `target`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRequest {
    pub origin: Location,
    pub target: Location,
    pub time: NaiveDateTime,
    pub direction: TimeDirection,
}

impl TripRequest {
    /// Create a new trip request.
    pub fn new(origin: Location, target: Location, time: NaiveDateTime, direction: TimeDirection) -> Self {
        Self {
            origin,
            target,
            time,
            direction,
        }
    }

    /// The location the first leg starts from.
    ///
    /// The search runs from the end of the trip whose time is known.
    pub fn start(&self) -> &Location {
        match self.direction {
            TimeDirection::Forwards => &self.origin,
            TimeDirection::Backwards => &self.target,
        }
    }

    /// The location the last leg must reach.
    pub fn finish(&self) -> &Location {
        match self.direction {
            TimeDirection::Forwards => &self.target,
            TimeDirection::Backwards => &self.origin,
        }
    }
}

/// Which destinations a stopover may use.
///
/// A destination matches when its name equals `name` (if given) and it
/// carries every listed attribute with the listed value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DestinationFilter {
    pub name: Option<String>,
    pub attributes: BTreeMap<String, String>,
}

impl DestinationFilter {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn accepts(&self, destination: &Destination) -> bool {
        self.name.as_ref().is_none_or(|name| *name == destination.name)
            && self
                .attributes
                .iter()
                .all(|(key, value)| destination.attribute(key) == Some(value.as_str()))
    }
}

impl GoalPredicate for DestinationFilter {
    fn matches(&self, graph: &Graph, node: &Node) -> bool {
        node.destination_id()
            .and_then(|id| graph.destination(id))
            .is_some_and(|destination| self.accepts(destination))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{at, stop_location};

    fn centre() -> Destination {
        Destination::new("Little Sprouts", stop_location(2))
            .with_attribute("infants", "yes")
            .with_attribute("hours", "extended")
    }

    #[test]
    fn empty_filter_accepts_everything() {
        assert!(DestinationFilter::default().accepts(&centre()));
    }

    #[test]
    fn filter_by_name_and_attributes() {
        assert!(DestinationFilter::named("Little Sprouts").accepts(&centre()));
        assert!(!DestinationFilter::named("Tiny Tots").accepts(&centre()));

        let infants = DestinationFilter::default().with_attribute("infants", "yes");
        assert!(infants.accepts(&centre()));
        let weekends = infants.with_attribute("weekends", "yes");
        assert!(!weekends.accepts(&centre()));
    }

    #[test]
    fn start_follows_direction() {
        let forwards = TripRequest::new(stop_location(1), stop_location(3), at(8, 0), TimeDirection::Forwards);
        assert_eq!(forwards.start(), &stop_location(1));
        assert_eq!(forwards.finish(), &stop_location(3));

        let backwards = TripRequest {
            direction: TimeDirection::Backwards,
            ..forwards
        };
        assert_eq!(backwards.start(), &stop_location(3));
        assert_eq!(backwards.finish(), &stop_location(1));
    }

    #[test]
    fn request_from_json() {
        let json = r#"{
            "origin": {"latitude": 39.01, "longitude": -84.5},
            "target": {"latitude": 39.03, "longitude": -84.5},
            "time": "1970-01-01T09:00:00",
            "direction": "backwards"
        }"#;
        let request: TripRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.time, at(9, 0));
        assert_eq!(request.direction, TimeDirection::Backwards);
        assert_eq!(request.start(), &request.target);
    }
}
