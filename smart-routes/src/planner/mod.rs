//! Trip planner.
//!
//! Answers "how do I get from here to there by this time, stopping at a
//! place like this on the way?" by chaining searches over the graph: seed
//! from the known end of the trip, search to a stopover, continue from the
//! stopover's nearby visits, and join the two legs into one itinerary.

mod config;
mod request;
mod trip;

pub use config::PlannerConfig;
pub use request::{DestinationFilter, TripRequest};
pub use trip::{PlanError, TripPlanner};
