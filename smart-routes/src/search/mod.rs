//! Shortest-elapsed-time search over the transit graph.
//!
//! [`search`] is Dijkstra generalised to many seeds and many goals, run
//! either forwards in time (follow downwind edges, "leave after") or
//! backwards (follow upwind edges, "arrive by"). Costs are elapsed time.

mod closest;
mod config;
mod dijkstra;
mod direction;
mod goal;
mod results;

pub use config::SearchConfig;
pub use dijkstra::search;
pub use direction::TimeDirection;
pub use goal::{AnyDestination, AtAnyStop, AtStop, DestinationNamed, DestinationWhere, GoalPredicate};
pub use results::{NodeInfo, SearchResults, Seed};
