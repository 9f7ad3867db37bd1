//! Turning search paths into itineraries.
//!
//! A search produces a [`PathChain`] from a goal back to a seed. Two chains
//! can be stitched when one trip is planned as two searches, and a chain is
//! assembled into an [`Itinerary`] in chronological order.

mod assemble;
mod chain;

pub use assemble::{Itinerary, ItineraryStep, StepKind};
pub use chain::{PathChain, PathLink, StitchError};
