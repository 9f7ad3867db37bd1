//! Graph construction from schedule and destination records.

use std::collections::{BTreeMap, HashMap};

use rayon::prelude::*;
use tracing::{debug, info, trace};

use crate::domain::{Destination, MalformedScheduleError, StopId, StopTimeRecord, TripId};

use super::{
    DestinationId, Graph, GraphBuilderSettings, NearbyStop, Node, NodeId, NodeKind, StopInfo,
    TransitVisit, nearest_stops,
};

/// Edge and node counts gathered while building, for logging.
#[derive(Debug, Default)]
struct BuildStats {
    ride_edges: usize,
    skipped_rides: usize,
    transfer_edges: usize,
    walking_edges: usize,
    destination_nodes: usize,
}

/// Builds a [`Graph`] from stop times and destinations.
///
/// # Examples
///
/// ```
/// use smart_routes::domain::Destination;
/// use smart_routes::graph::{GraphBuilder, GraphBuilderSettings};
///
/// let builder = GraphBuilder::new(GraphBuilderSettings::default());
/// let graph = builder.build(Vec::new(), Vec::<Destination>::new()).unwrap();
/// assert!(graph.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    settings: GraphBuilderSettings,
}

impl GraphBuilder {
    pub fn new(settings: GraphBuilderSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &GraphBuilderSettings {
        &self.settings
    }

    /// Build the graph.
    ///
    /// In tolerant mode (the default) inconsistent records only cost
    /// connectivity. With `strict` set, the first malformed record aborts
    /// the build with a [`MalformedScheduleError`].
    pub fn build<S, D>(&self, stop_times: S, destinations: D) -> Result<Graph, MalformedScheduleError>
    where
        S: IntoIterator<Item = StopTimeRecord>,
        D: IntoIterator<Item = Destination>,
    {
        let records: Vec<StopTimeRecord> = stop_times.into_iter().collect();
        let destinations: Vec<Destination> = destinations.into_iter().collect();

        if self.settings.strict {
            for record in &records {
                record.validate()?;
            }
        }

        let mut stats = BuildStats::default();
        let mut nodes: Vec<Node> = Vec::with_capacity(records.len());
        let mut visits: Vec<TransitVisit> = Vec::with_capacity(records.len());
        let mut stops: BTreeMap<StopId, StopInfo> = BTreeMap::new();
        let mut stop_to_nodes: HashMap<StopId, Vec<NodeId>> = HashMap::new();
        let mut trips: BTreeMap<TripId, Vec<NodeId>> = BTreeMap::new();

        for record in records {
            let id = NodeId(nodes.len());
            let visit = TransitVisit {
                stop_id: record.stop_id,
                trip_id: record.trip_id,
                shape_id: record.shape_id,
                sequence: record.sequence,
            };

            stops.entry(record.stop_id).or_insert_with(|| StopInfo {
                id: record.stop_id,
                name: record.stop_name.clone(),
                location: record.location,
            });
            stop_to_nodes.entry(record.stop_id).or_default().push(id);
            trips.entry(record.trip_id).or_default().push(id);

            let time = record.visit_time();
            nodes.push(Node::new(
                record.location,
                time,
                record.stop_name,
                NodeKind::Transit(visit),
            ));
            visits.push(visit);
        }

        self.link_trips(&mut nodes, &visits, trips, &mut stats)?;

        for at_stop in stop_to_nodes.values_mut() {
            at_stop.sort_by_key(|id| {
                let visit = &visits[id.0];
                (nodes[id.0].time, visit.shape_id, visit.sequence, *id)
            });
        }

        self.link_transfers(&mut nodes, &visits, &stop_to_nodes, &mut stats);

        let stop_list: Vec<&StopInfo> = stops.values().collect();
        let radius = Some(self.settings.max_walk_metres);
        let limit = self.settings.max_nearby_stops;

        let nearby: HashMap<StopId, Vec<NearbyStop>> = stop_list
            .par_iter()
            .map(|stop| {
                let near = nearest_stops(
                    &stop.location,
                    stop_list.iter().copied(),
                    radius,
                    limit,
                    Some(stop.id),
                );
                (stop.id, near)
            })
            .collect();

        let destination_nearby: Vec<Vec<NearbyStop>> = destinations
            .par_iter()
            .map(|destination| {
                nearest_stops(
                    &destination.location,
                    stop_list.iter().copied(),
                    radius,
                    limit,
                    None,
                )
            })
            .collect();

        self.link_walks(&mut nodes, &visits, &stop_to_nodes, &nearby, &mut stats);

        let mut destination_to_stops = HashMap::with_capacity(destinations.len());
        for (index, (destination, near)) in destinations.iter().zip(&destination_nearby).enumerate() {
            let id = DestinationId(index);
            if near.is_empty() {
                debug!(
                    destination = %destination.name,
                    "destination has no stop within walking distance"
                );
            }

            for stop in near {
                let Some(at_stop) = stop_to_nodes.get(&stop.stop_id) else {
                    continue;
                };
                for &visit in at_stop {
                    let time = nodes[visit.0].time;
                    let node = NodeId(nodes.len());
                    nodes.push(Node::new(
                        destination.location,
                        time,
                        destination.name.clone(),
                        NodeKind::Destination(id),
                    ));
                    connect(&mut nodes, visit, node);
                    connect(&mut nodes, node, visit);
                    stats.destination_nodes += 1;
                }
            }

            destination_to_stops.insert(id, near.iter().map(|n| n.stop_id).collect());
        }

        let stop_to_nearest = nearby
            .into_iter()
            .map(|(stop, near)| (stop, near.into_iter().map(|n| n.stop_id).collect()))
            .collect();

        info!(
            nodes = nodes.len(),
            stops = stops.len(),
            destinations = destinations.len(),
            ride_edges = stats.ride_edges,
            skipped_rides = stats.skipped_rides,
            transfer_edges = stats.transfer_edges,
            walking_edges = stats.walking_edges,
            destination_nodes = stats.destination_nodes,
            "Graph built"
        );

        Ok(Graph {
            nodes,
            destinations,
            stops,
            stop_to_nearest,
            stop_to_nodes,
            destination_to_stops,
            settings: self.settings.clone(),
        })
    }

    /// Link consecutive visits of each trip in sequence order.
    fn link_trips(
        &self,
        nodes: &mut [Node],
        visits: &[TransitVisit],
        trips: BTreeMap<TripId, Vec<NodeId>>,
        stats: &mut BuildStats,
    ) -> Result<(), MalformedScheduleError> {
        for (trip_id, mut trip) in trips {
            trip.sort_by_key(|id| (visits[id.0].sequence, nodes[id.0].time, *id));

            for pair in trip.windows(2) {
                let (from, to) = (pair[0], pair[1]);
                if nodes[to.0].time < nodes[from.0].time {
                    let visit = &visits[to.0];
                    if self.settings.strict {
                        return Err(MalformedScheduleError {
                            trip_id,
                            stop_id: visit.stop_id,
                            sequence: visit.sequence,
                            reason: "scheduled before the preceding stop of its trip",
                        });
                    }
                    trace!(
                        trip = %trip_id,
                        stop = %visit.stop_id,
                        sequence = visit.sequence,
                        "Skipping ride edge that runs backwards in time"
                    );
                    stats.skipped_rides += 1;
                    continue;
                }
                connect(nodes, from, to);
                stats.ride_edges += 1;
            }
        }
        Ok(())
    }

    /// Connect visits of different trips at the same stop within the
    /// transfer window. Each stop's visits must already be time ordered.
    fn link_transfers(
        &self,
        nodes: &mut [Node],
        visits: &[TransitVisit],
        stop_to_nodes: &HashMap<StopId, Vec<NodeId>>,
        stats: &mut BuildStats,
    ) {
        let window = self.settings.transfer_window();

        for at_stop in stop_to_nodes.values() {
            for (i, &from) in at_stop.iter().enumerate() {
                let latest = nodes[from.0].time + window;
                for &to in &at_stop[i + 1..] {
                    if nodes[to.0].time > latest {
                        break;
                    }
                    if visits[to.0].trip_id != visits[from.0].trip_id {
                        connect(nodes, from, to);
                        stats.transfer_edges += 1;
                        // Same-minute visits can be changed between either way.
                        if nodes[to.0].time == nodes[from.0].time {
                            connect(nodes, to, from);
                            stats.transfer_edges += 1;
                        }
                    }
                }
            }
        }
    }

    /// Connect visits at a stop to visits at nearby stops that can be
    /// caught after walking over, waiting at most the transfer window.
    fn link_walks(
        &self,
        nodes: &mut [Node],
        visits: &[TransitVisit],
        stop_to_nodes: &HashMap<StopId, Vec<NodeId>>,
        nearby: &HashMap<StopId, Vec<NearbyStop>>,
        stats: &mut BuildStats,
    ) {
        let window = self.settings.transfer_window();

        for (stop, neighbours) in nearby {
            let Some(from_stop) = stop_to_nodes.get(stop) else {
                continue;
            };
            for neighbour in neighbours {
                let Some(to_stop) = stop_to_nodes.get(&neighbour.stop_id) else {
                    continue;
                };
                let walk = self.settings.walk_time(neighbour.distance_metres);

                for &from in from_stop {
                    let earliest = nodes[from.0].time + walk;
                    let latest = earliest + window;
                    let start = to_stop.partition_point(|id| nodes[id.0].time < earliest);

                    for &to in &to_stop[start..] {
                        if nodes[to.0].time > latest {
                            break;
                        }
                        if visits[to.0].trip_id == visits[from.0].trip_id {
                            continue;
                        }
                        connect(nodes, from, to);
                        stats.walking_edges += 1;
                    }
                }
            }
        }
    }
}

/// Add `to` to `from`'s downwind set and mirror it upwind.
fn connect(nodes: &mut [Node], from: NodeId, to: NodeId) {
    nodes[from.0].downwind.insert(to);
    nodes[to.0].upwind.insert(from);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Location, ShapeId};
    use crate::test_support::{assert_edges_mirrored, at, settings, stop_location, stop_time};

    fn build(records: Vec<StopTimeRecord>, window_mins: i64) -> Graph {
        GraphBuilder::new(settings(window_mins))
            .build(records, Vec::new())
            .unwrap()
    }

    fn node_at(graph: &Graph, stop: u32, trip: u32) -> NodeId {
        graph
            .nodes_at_stop(StopId(stop))
            .iter()
            .copied()
            .find(|&id| graph.node(id).trip_id() == Some(TripId(trip)))
            .unwrap()
    }

    #[test]
    fn one_node_per_stop_time() {
        let graph = build(
            vec![
                stop_time(1, 10, 1, 8, 0),
                stop_time(2, 10, 2, 8, 10),
                stop_time(3, 10, 3, 8, 20),
            ],
            10,
        );
        assert_eq!(graph.len(), 3);
        assert_eq!(graph.stops().count(), 3);
        assert_eq!(graph.node(node_at(&graph, 2, 10)).name(), "Stop 2");
    }

    #[test]
    fn trips_are_linked_in_sequence_order() {
        // Records arrive out of order; sequence decides the ride order.
        let graph = build(
            vec![
                stop_time(3, 10, 3, 8, 20),
                stop_time(1, 10, 1, 8, 0),
                stop_time(2, 10, 2, 8, 10),
            ],
            10,
        );
        let a = node_at(&graph, 1, 10);
        let b = node_at(&graph, 2, 10);
        let c = node_at(&graph, 3, 10);

        assert!(graph.node(a).downwind().contains(&b));
        assert!(graph.node(b).downwind().contains(&c));
        assert!(!graph.node(a).downwind().contains(&c));
        assert!(graph.node(c).upwind().contains(&b));
        assert_edges_mirrored(&graph);
    }

    #[test]
    fn transfers_within_window_only() {
        let graph = build(
            vec![
                stop_time(2, 10, 1, 8, 10),
                stop_time(2, 20, 1, 8, 15),
                stop_time(2, 30, 1, 8, 25),
            ],
            10,
        );
        let t10 = node_at(&graph, 2, 10);
        let t20 = node_at(&graph, 2, 20);
        let t30 = node_at(&graph, 2, 30);

        assert!(graph.node(t10).downwind().contains(&t20));
        assert!(graph.node(t20).downwind().contains(&t30));
        // 15 minutes apart: outside the 10 minute window.
        assert!(!graph.node(t10).downwind().contains(&t30));
        // Transfers never point back in time.
        assert!(!graph.node(t20).downwind().contains(&t10));
    }

    #[test]
    fn same_minute_transfers_go_both_ways() {
        let graph = build(vec![stop_time(2, 5, 1, 8, 10), stop_time(2, 3, 4, 8, 10)], 10);
        let t5 = node_at(&graph, 2, 5);
        let t3 = node_at(&graph, 2, 3);

        assert!(graph.node(t5).downwind().contains(&t3));
        assert!(graph.node(t3).downwind().contains(&t5));
        assert_eq!(graph.edge_count(), 2);
        assert_edges_mirrored(&graph);
    }

    #[test]
    fn stop_index_is_time_ordered() {
        let graph = build(
            vec![
                stop_time(2, 30, 1, 9, 0),
                stop_time(2, 10, 1, 8, 0),
                stop_time(2, 20, 1, 8, 30),
            ],
            10,
        );
        let times: Vec<_> = graph
            .nodes_at_stop(StopId(2))
            .iter()
            .map(|&id| graph.node(id).time())
            .collect();
        assert_eq!(times, vec![at(8, 0), at(8, 30), at(9, 0)]);
    }

    #[test]
    fn walking_transfer_to_nearby_stop() {
        let mut near = stop_time(5, 20, 1, 8, 20);
        // About 111 m north of stop 2: a 86 second walk at 1.3 m/s.
        near.location = Location::new(stop_location(2).latitude + 0.001, -84.5);

        let graph = build(
            vec![
                stop_time(2, 10, 1, 8, 10),
                near,
                stop_time(5, 30, 1, 8, 11),
            ],
            15,
        );
        let from = node_at(&graph, 2, 10);

        assert_eq!(graph.nearby_stops(StopId(2)), &[StopId(5)]);
        assert!(graph.node(from).downwind().contains(&node_at(&graph, 5, 20)));
        // Departs before the walk can be finished.
        assert!(!graph.node(from).downwind().contains(&node_at(&graph, 5, 30)));
        assert_edges_mirrored(&graph);
    }

    #[test]
    fn distant_stops_are_not_nearby() {
        // Fixture stops are about 1.1 km apart, beyond the 800 m radius.
        let graph = build(vec![stop_time(1, 10, 1, 8, 0), stop_time(2, 20, 1, 8, 5)], 10);
        assert!(graph.nearby_stops(StopId(1)).is_empty());
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn destinations_link_both_ways_to_nearby_visits() {
        let destination = Destination::new("Little Sprouts", stop_location(2));
        let graph = GraphBuilder::new(settings(10))
            .build(
                vec![stop_time(2, 10, 1, 8, 10), stop_time(2, 20, 1, 9, 0)],
                vec![destination],
            )
            .unwrap();

        assert_eq!(graph.len(), 4);
        assert_eq!(graph.stops_near_destination(DestinationId(0)), &[StopId(2)]);

        for (id, node) in graph.iter().filter(|(_, n)| n.is_destination()) {
            assert_eq!(node.name(), "Little Sprouts");
            assert_eq!(node.downwind().len(), 1);
            let visit = *node.downwind().iter().next().unwrap();
            assert_eq!(graph.node(visit).time(), node.time());
            assert!(graph.node(visit).downwind().contains(&id));
            assert!(node.upwind().contains(&visit));
        }
        assert_edges_mirrored(&graph);
    }

    #[test]
    fn isolated_destination_has_no_nodes() {
        let far = Destination::new("Far Away", Location::new(40.5, -84.5));
        let graph = GraphBuilder::new(settings(10))
            .build(vec![stop_time(2, 10, 1, 8, 10)], vec![far])
            .unwrap();

        assert_eq!(graph.len(), 1);
        assert!(graph.stops_near_destination(DestinationId(0)).is_empty());
        assert_eq!(graph.destinations().len(), 1);
    }

    #[test]
    fn tolerant_mode_skips_backwards_rides() {
        let graph = build(
            vec![stop_time(1, 10, 1, 8, 30), stop_time(2, 10, 2, 8, 0)],
            10,
        );
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn tolerant_mode_accepts_missing_shape() {
        let mut record = stop_time(1, 10, 1, 8, 0);
        record.shape_id = None;
        let graph = build(vec![record], 10);
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn strict_mode_rejects_missing_shape() {
        let mut record = stop_time(1, 10, 1, 8, 0);
        record.shape_id = None;
        let mut strict = settings(10);
        strict.strict = true;

        let err = GraphBuilder::new(strict)
            .build(vec![stop_time(2, 10, 2, 8, 5), record], Vec::new())
            .unwrap_err();
        assert_eq!(err.stop_id, StopId(1));
        assert_eq!(err.reason, "missing shape id");
    }

    #[test]
    fn strict_mode_rejects_backwards_rides() {
        let mut strict = settings(10);
        strict.strict = true;

        let err = GraphBuilder::new(strict)
            .build(
                vec![stop_time(1, 10, 1, 8, 30), stop_time(2, 10, 2, 8, 0)],
                Vec::new(),
            )
            .unwrap_err();
        assert_eq!(err.trip_id, TripId(10));
        assert_eq!(err.sequence, 2);
    }

    #[test]
    fn duplicate_stop_times_are_kept() {
        let record = stop_time(1, 10, 1, 8, 0);
        let graph = build(vec![record.clone(), record], 10);
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.nodes_at_stop(StopId(1)).len(), 2);
        assert_eq!(graph.node(NodeId(0)).as_transit().unwrap().shape_id, Some(ShapeId(10)));
    }
}
