//! Seeding searches from arbitrary locations and from destinations.

use chrono::NaiveDateTime;

use crate::domain::Location;
use crate::graph::{Graph, NodeId, StopInfo, nearest_stops};

use super::{Seed, TimeDirection};

impl Graph {
    /// The `count` stops nearest to `location`, nearest first.
    ///
    /// Distances are computed on the fly, so `location` need not be part
    /// of the graph.
    pub fn closest_stops(&self, location: &Location, count: usize) -> Vec<&StopInfo> {
        nearest_stops(location, self.stops.values(), None, count, None)
            .into_iter()
            .filter_map(|nearby| self.stop(nearby.stop_id))
            .collect()
    }

    /// Seeds for a search starting at `location` at `time`.
    ///
    /// Behaves as if a zero-cost node at `location` had walking edges to the
    /// `count` nearest stops: every visit at those stops that can be reached
    /// on foot in time (after `time` going forwards, before it going
    /// backwards) becomes a seed whose cost is its elapsed time from `time`.
    pub fn closest_nodes(
        &self,
        location: &Location,
        time: NaiveDateTime,
        direction: TimeDirection,
        count: usize,
    ) -> Vec<Seed> {
        let mut seeds = Vec::new();
        for nearby in nearest_stops(location, self.stops.values(), None, count, None) {
            let walk = self.settings.walk_time(nearby.distance_metres);
            for &id in self.nodes_at_stop(nearby.stop_id) {
                let elapsed = direction.elapsed(time, self.node(id).time());
                if elapsed >= walk {
                    seeds.push(Seed::with_cost(id, elapsed));
                }
            }
        }
        seeds
    }

    /// Seeds for continuing a trip from a destination node.
    ///
    /// Visits at the destination's nearby stops that can be reached on foot
    /// from the destination (later than it going forwards, earlier going
    /// backwards). Costs are elapsed time from the destination node. Empty
    /// for transit nodes.
    pub fn destination_neighbors(&self, node: NodeId, direction: TimeDirection) -> Vec<Seed> {
        let Some(origin) = self.get(node) else {
            return Vec::new();
        };
        let Some(destination) = origin.destination_id() else {
            return Vec::new();
        };

        let mut seeds = Vec::new();
        for &stop_id in self.stops_near_destination(destination) {
            let Some(stop) = self.stop(stop_id) else {
                continue;
            };
            let walk = self
                .settings
                .walk_time(origin.location().distance_to(&stop.location));
            for &id in self.nodes_at_stop(stop_id) {
                let elapsed = direction.elapsed(origin.time(), self.node(id).time());
                if elapsed >= walk {
                    seeds.push(Seed::with_cost(id, elapsed));
                }
            }
        }
        seeds
    }
}
