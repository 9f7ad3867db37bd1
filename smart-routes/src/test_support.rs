//! Fixtures shared by unit tests.

use chrono::{NaiveDate, NaiveDateTime};

use crate::domain::{Location, ShapeId, StopId, StopTimeRecord, TripId};
use crate::graph::{Graph, GraphBuilder, GraphBuilderSettings};

/// A time on the schedule's reference day.
pub(crate) fn at(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1970, 1, 1)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

/// Fixture stops sit on a north-south line about 1.1 km apart, so none of
/// them are within walking distance of another under [`settings`].
pub(crate) fn stop_location(stop: u32) -> Location {
    Location::new(39.0 + f64::from(stop) * 0.01, -84.5)
}

/// A stop time whose shape id equals its trip id and which arrives and
/// departs at the same minute.
pub(crate) fn stop_time(stop: u32, trip: u32, sequence: u32, hour: u32, minute: u32) -> StopTimeRecord {
    StopTimeRecord {
        stop_id: StopId(stop),
        stop_name: format!("Stop {stop}"),
        location: stop_location(stop),
        trip_id: TripId(trip),
        shape_id: Some(ShapeId(trip)),
        sequence,
        arrival_time: at(hour, minute),
        departure_time: at(hour, minute),
    }
}

/// 800 m walking radius, 8 nearby stops, 1.3 m/s, tolerant.
pub(crate) fn settings(transfer_window_mins: i64) -> GraphBuilderSettings {
    GraphBuilderSettings::new(800.0, 8, transfer_window_mins, 1.3, false)
}

/// Trip 1: stop 1 (08:00) -> stop 2 (08:10) -> stop 3 (08:20).
/// Trip 2: stop 2 (08:15) -> stop 4 (08:30). Ten minute transfer window.
pub(crate) fn round_trip_graph() -> Graph {
    GraphBuilder::new(settings(10))
        .build(
            vec![
                stop_time(1, 1, 1, 8, 0),
                stop_time(2, 1, 2, 8, 10),
                stop_time(3, 1, 3, 8, 20),
                stop_time(2, 2, 1, 8, 15),
                stop_time(4, 2, 2, 8, 30),
            ],
            Vec::new(),
        )
        .unwrap()
}

/// Panics unless every downwind edge has its upwind mirror and vice versa.
pub(crate) fn assert_edges_mirrored(graph: &Graph) {
    for (id, node) in graph.iter() {
        for &next in node.downwind() {
            assert!(
                graph.node(next).upwind().contains(&id),
                "downwind edge {id:?} -> {next:?} has no upwind mirror"
            );
        }
        for &previous in node.upwind() {
            assert!(
                graph.node(previous).downwind().contains(&id),
                "upwind edge {id:?} -> {previous:?} has no downwind mirror"
            );
        }
    }
}
