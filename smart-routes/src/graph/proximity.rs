//! Brute-force nearest-stop lookup.

use crate::domain::{Location, StopId};

use super::StopInfo;

/// A stop near some origin, with its great-circle distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct NearbyStop {
    pub stop_id: StopId,
    pub distance_metres: f64,
}

/// The `limit` stops closest to `origin`, nearest first.
///
/// Stops further than `max_distance` (when given) and the `exclude` stop are
/// skipped. Equal distances are ordered by stop id.
pub(crate) fn nearest_stops<'a>(
    origin: &Location,
    stops: impl IntoIterator<Item = &'a StopInfo>,
    max_distance: Option<f64>,
    limit: usize,
    exclude: Option<StopId>,
) -> Vec<NearbyStop> {
    let mut nearby: Vec<NearbyStop> = stops
        .into_iter()
        .filter(|stop| Some(stop.id) != exclude)
        .map(|stop| NearbyStop {
            stop_id: stop.id,
            distance_metres: origin.distance_to(&stop.location),
        })
        .filter(|n| max_distance.is_none_or(|max| n.distance_metres <= max))
        .collect();

    nearby.sort_by(|a, b| {
        a.distance_metres
            .total_cmp(&b.distance_metres)
            .then(a.stop_id.cmp(&b.stop_id))
    });
    nearby.truncate(limit);
    nearby
}
