//! Input records for graph construction.
//!
//! These types are what the external data-acquisition layer hands over:
//! scheduled stop times from the transit feed and geocoded destinations.
//! The builder tolerates inconsistent records unless asked to be strict,
//! in which case [`StopTimeRecord::validate`] decides what is malformed.

mod error;
mod ids;
mod location;
mod records;

pub use error::MalformedScheduleError;
pub use ids::{ShapeId, StopId, TripId};
pub use location::{EARTH_RADIUS_METRES, Location};
pub use records::{Destination, StopTimeRecord};
