//! Graph node types.

use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::{Location, ShapeId, StopId, TripId};

/// Index of a node in its graph's node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Position of the node in [`Graph::nodes`](super::Graph::nodes).
    pub fn index(self) -> usize {
        self.0
    }
}

/// Index of a destination payload in its graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct DestinationId(pub(crate) usize);

impl DestinationId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Schedule fields of a transit node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransitVisit {
    pub stop_id: StopId,
    pub trip_id: TripId,
    pub shape_id: Option<ShapeId>,
    pub sequence: u32,
}

/// What a node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A vehicle calling at a stop.
    Transit(TransitVisit),
    /// A destination visited at the time of an adjacent stop visit.
    Destination(DestinationId),
}

/// A point in the time-expanded graph.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) location: Location,
    pub(crate) time: NaiveDateTime,
    pub(crate) name: String,
    pub(crate) kind: NodeKind,
    pub(crate) downwind: BTreeSet<NodeId>,
    pub(crate) upwind: BTreeSet<NodeId>,
}

impl Node {
    pub(crate) fn new(location: Location, time: NaiveDateTime, name: String, kind: NodeKind) -> Self {
        Self {
            location,
            time,
            name,
            kind,
            downwind: BTreeSet::new(),
            upwind: BTreeSet::new(),
        }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn time(&self) -> NaiveDateTime {
        self.time
    }

    /// Stop name for transit nodes, destination name for destination nodes.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Nodes reachable from this one moving forward in time.
    pub fn downwind(&self) -> &BTreeSet<NodeId> {
        &self.downwind
    }

    /// Nodes reachable from this one moving backward in time.
    pub fn upwind(&self) -> &BTreeSet<NodeId> {
        &self.upwind
    }

    /// The schedule fields, if this is a transit node.
    pub fn as_transit(&self) -> Option<&TransitVisit> {
        match &self.kind {
            NodeKind::Transit(visit) => Some(visit),
            NodeKind::Destination(_) => None,
        }
    }

    /// The destination, if this is a destination node.
    pub fn destination_id(&self) -> Option<DestinationId> {
        match self.kind {
            NodeKind::Destination(id) => Some(id),
            NodeKind::Transit(_) => None,
        }
    }

    pub fn stop_id(&self) -> Option<StopId> {
        self.as_transit().map(|visit| visit.stop_id)
    }

    pub fn trip_id(&self) -> Option<TripId> {
        self.as_transit().map(|visit| visit.trip_id)
    }

    pub fn is_destination(&self) -> bool {
        matches!(self.kind, NodeKind::Destination(_))
    }
}
