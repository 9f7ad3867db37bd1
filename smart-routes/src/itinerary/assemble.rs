//! Itinerary assembly.

use std::collections::HashSet;

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

use crate::domain::{Destination, StopId, TripId};
use crate::graph::{DestinationId, Graph, NodeId, NodeKind};
use crate::search::TimeDirection;

use super::PathChain;

/// What an itinerary step is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepKind {
    Transit { stop_id: StopId, trip_id: TripId },
    Destination { destination: DestinationId },
}

/// One step of an itinerary: a display name and a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItineraryStep {
    pub node: NodeId,
    pub name: String,
    pub time: NaiveDateTime,
    pub kind: StepKind,
}

impl ItineraryStep {
    fn new(graph: &Graph, node: NodeId) -> Self {
        let graph_node = graph.node(node);
        let kind = match graph_node.kind() {
            NodeKind::Transit(visit) => StepKind::Transit {
                stop_id: visit.stop_id,
                trip_id: visit.trip_id,
            },
            NodeKind::Destination(destination) => StepKind::Destination {
                destination: *destination,
            },
        };
        Self {
            node,
            name: graph_node.name().to_string(),
            time: graph_node.time(),
            kind,
        }
    }

    /// The trip ridden at this step, if it is a transit step.
    pub fn trip_id(&self) -> Option<TripId> {
        match self.kind {
            StepKind::Transit { trip_id, .. } => Some(trip_id),
            StepKind::Destination { .. } => None,
        }
    }
}

/// A planned trip in chronological order.
///
/// `long` has every node of the path. `short` keeps only where each ride
/// starts and ends, the destinations visited, and the two endpoints.
/// `destinations` lists the visited destinations once each, in visit order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Itinerary {
    long: Vec<ItineraryStep>,
    short: Vec<ItineraryStep>,
    destinations: Vec<Destination>,
}

impl Itinerary {
    /// Assemble an itinerary from a search path.
    ///
    /// The path runs goal to root. A forwards path therefore runs backwards
    /// in time and is reversed; a backwards path is already chronological.
    /// The order follows the chain's direction, not its node times, which
    /// can all be equal.
    pub fn assemble(graph: &Graph, chain: &PathChain) -> Self {
        let mut long: Vec<ItineraryStep> = chain
            .links()
            .iter()
            .map(|link| ItineraryStep::new(graph, link.node))
            .collect();

        if chain.direction() == TimeDirection::Forwards {
            long.reverse();
        }

        let short = shorten(&long);

        let mut seen = HashSet::new();
        let destinations = short
            .iter()
            .filter_map(|step| match step.kind {
                StepKind::Destination { destination } => Some(destination),
                StepKind::Transit { .. } => None,
            })
            .filter(|id| seen.insert(*id))
            .filter_map(|id| graph.destination(id).cloned())
            .collect();

        Self {
            long,
            short,
            destinations,
        }
    }

    /// Every step, in ascending time.
    pub fn long_results(&self) -> &[ItineraryStep] {
        &self.long
    }

    /// Ride endpoints, destinations and trip endpoints, in ascending time.
    pub fn short_results(&self) -> &[ItineraryStep] {
        &self.short
    }

    pub fn destinations(&self) -> &[Destination] {
        &self.destinations
    }

    pub fn departure_time(&self) -> Option<NaiveDateTime> {
        self.long.first().map(|step| step.time)
    }

    pub fn arrival_time(&self) -> Option<NaiveDateTime> {
        self.long.last().map(|step| step.time)
    }

    /// Time between the first and last step.
    pub fn duration(&self) -> Duration {
        match (self.departure_time(), self.arrival_time()) {
            (Some(departure), Some(arrival)) => arrival.signed_duration_since(departure),
            _ => Duration::zero(),
        }
    }
}

/// Keep the first and last step, every destination, and each transit step
/// whose trip differs from the step before or after it.
fn shorten(long: &[ItineraryStep]) -> Vec<ItineraryStep> {
    let trip_at = |index: usize| long.get(index).and_then(ItineraryStep::trip_id);
    let last = long.len().saturating_sub(1);

    long.iter()
        .enumerate()
        .filter(|&(index, step)| match step.trip_id() {
            None => true,
            Some(trip) => {
                index == 0
                    || index == last
                    || trip_at(index - 1) != Some(trip)
                    || trip_at(index + 1) != Some(trip)
            }
        })
        .map(|(_, step)| step.clone())
        .collect()
}
