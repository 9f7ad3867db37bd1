//! Schedule validation errors.

use super::{StopId, TripId};

/// A stop-time record rejected by strict graph construction.
///
/// Names the offending record by trip, stop and sequence number so it can be
/// found in the upstream feed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed stop time (trip {trip_id}, stop {stop_id}, sequence {sequence}): {reason}")]
pub struct MalformedScheduleError {
    pub trip_id: TripId,
    pub stop_id: StopId,
    pub sequence: u32,
    pub reason: &'static str,
}
