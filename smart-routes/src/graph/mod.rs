//! Time-expanded transit graph.
//!
//! Every scheduled stop visit is a node. Riding a vehicle, changing trips
//! at a stop, walking to a nearby stop and calling at a destination are all
//! edges between nodes. Edges point forward in time ("downwind"), and each
//! one is mirrored by an "upwind" entry on its target so searches can run
//! backwards from a deadline.
//!
//! The graph is built once by [`GraphBuilder`] and is read-only afterwards.

mod builder;
mod model;
mod node;
mod proximity;
mod settings;

pub use builder::GraphBuilder;
pub use model::{Graph, StopInfo};
pub use node::{DestinationId, Node, NodeId, NodeKind, TransitVisit};
pub use settings::GraphBuilderSettings;

pub(crate) use proximity::{NearbyStop, nearest_stops};
