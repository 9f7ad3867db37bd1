//! The built graph and its lookup indices.

use std::collections::{BTreeMap, HashMap};

use crate::domain::{Destination, Location, StopId};

use super::{DestinationId, GraphBuilderSettings, Node, NodeId};

/// A physical stop, as first seen in the stop-time records.
#[derive(Debug, Clone, PartialEq)]
pub struct StopInfo {
    pub id: StopId,
    pub name: String,
    pub location: Location,
}

/// An immutable time-expanded graph.
///
/// Owns every node in a single arena; neighbour sets hold [`NodeId`]s into
/// that arena. Built by [`GraphBuilder`](super::GraphBuilder) and never
/// mutated afterwards, so it can be shared freely between searches.
#[derive(Debug, Clone)]
pub struct Graph {
    pub(crate) nodes: Vec<Node>,
    pub(crate) destinations: Vec<Destination>,
    pub(crate) stops: BTreeMap<StopId, StopInfo>,
    /// Stop -> stops within walking distance, nearest first.
    pub(crate) stop_to_nearest: HashMap<StopId, Vec<StopId>>,
    /// Stop -> transit nodes at that stop, ordered by time.
    pub(crate) stop_to_nodes: HashMap<StopId, Vec<NodeId>>,
    /// Destination -> stops within walking distance, nearest first.
    pub(crate) destination_to_stops: HashMap<DestinationId, Vec<StopId>>,
    pub(crate) settings: GraphBuilderSettings,
}

impl Graph {
    /// Look up a node.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this graph.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Look up a node, returning `None` for ids outside this graph.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// All nodes, indexed by [`NodeId::index`].
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Every node id together with its node.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, node)| (NodeId(i), node))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of downwind edges (each has a matching upwind entry).
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|node| node.downwind.len()).sum()
    }

    /// The destination payload behind a destination id.
    pub fn destination(&self, id: DestinationId) -> Option<&Destination> {
        self.destinations.get(id.0)
    }

    /// All destinations, indexed by [`DestinationId::index`].
    pub fn destinations(&self) -> &[Destination] {
        &self.destinations
    }

    pub fn stop(&self, id: StopId) -> Option<&StopInfo> {
        self.stops.get(&id)
    }

    /// All stops, ordered by id.
    pub fn stops(&self) -> impl Iterator<Item = &StopInfo> {
        self.stops.values()
    }

    /// Stops within walking distance of `stop`, nearest first.
    pub fn nearby_stops(&self, stop: StopId) -> &[StopId] {
        self.stop_to_nearest
            .get(&stop)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Transit nodes at `stop`, ordered by time.
    pub fn nodes_at_stop(&self, stop: StopId) -> &[NodeId] {
        self.stop_to_nodes
            .get(&stop)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Stops within walking distance of a destination, nearest first.
    pub fn stops_near_destination(&self, destination: DestinationId) -> &[StopId] {
        self.destination_to_stops
            .get(&destination)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// The settings the graph was built with.
    pub fn settings(&self) -> &GraphBuilderSettings {
        &self.settings
    }
}
