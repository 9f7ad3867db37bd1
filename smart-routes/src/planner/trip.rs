//! Trip orchestration: seeding, searching and stitching legs.

use chrono::Duration;
use tracing::{debug, info};

use crate::graph::Graph;
use crate::itinerary::{Itinerary, PathChain, StitchError};
use crate::search::{AtAnyStop, GoalPredicate, SearchConfig, Seed, search};

use super::{PlannerConfig, TripRequest};

/// Error from trip planning.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    /// The two legs could not be joined
    #[error("failed to join trip legs: {0}")]
    Stitch(#[from] StitchError),
}

/// Plans trips over a built graph.
///
/// Each leg is a single Dijkstra run that stops at its first goal. A trip
/// with a stopover runs two legs from the end of the trip whose time is
/// known: first to a matching destination, then from that destination to
/// the other end.
#[derive(Debug, Clone)]
pub struct TripPlanner<'g> {
    graph: &'g Graph,
    config: PlannerConfig,
}

impl<'g> TripPlanner<'g> {
    pub fn new(graph: &'g Graph, config: PlannerConfig) -> Self {
        Self { graph, config }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plan a trip without a stopover.
    ///
    /// Returns `None` if no visit near the finish can be reached.
    pub fn plan_direct(&self, request: &TripRequest) -> Option<Itinerary> {
        let seeds = self.start_seeds(request);
        let finish = self.finish_goal(request);

        let Some(path) = self.leg(seeds, &finish, request, Duration::zero()) else {
            info!(direction = %request.direction, "No direct trip found");
            return None;
        };

        let itinerary = Itinerary::assemble(self.graph, &path);
        info!(
            direction = %request.direction,
            steps = itinerary.long_results().len(),
            duration_mins = itinerary.duration().num_minutes(),
            "Planned direct trip"
        );
        Some(itinerary)
    }

    /// Plan a trip that stops at a destination matching `stopover` on the way.
    ///
    /// Going backwards (arrive by) the first leg runs from the target back to
    /// the latest reachable stopover, and the second from there back to the
    /// origin. Going forwards the legs run the other way round. Returns
    /// `Ok(None)` if either leg finds nothing.
    pub fn plan_via_destination<G>(
        &self,
        request: &TripRequest,
        stopover: &G,
    ) -> Result<Option<Itinerary>, PlanError>
    where
        G: GoalPredicate + ?Sized,
    {
        let seeds = self.start_seeds(request);
        let Some(first) = self.leg(seeds, stopover, request, Duration::zero()) else {
            info!(direction = %request.direction, "No reachable stopover");
            return Ok(None);
        };

        let stop_node = first.goal().node;
        debug!(
            stopover = self.graph.node(stop_node).name(),
            time = %self.graph.node(stop_node).time(),
            cost_mins = first.cost().num_minutes(),
            "First leg found"
        );

        let seeds = self.graph.destination_neighbors(stop_node, request.direction);
        let finish = self.finish_goal(request);
        let Some(second) = self.leg(seeds, &finish, request, first.cost()) else {
            info!(
                direction = %request.direction,
                stopover = self.graph.node(stop_node).name(),
                "Stopover found but the trip cannot be completed from it"
            );
            return Ok(None);
        };

        let chain = second.stitch_onto(first, self.graph)?;
        let itinerary = Itinerary::assemble(self.graph, &chain);
        info!(
            direction = %request.direction,
            steps = itinerary.long_results().len(),
            destinations = itinerary.destinations().len(),
            duration_mins = itinerary.duration().num_minutes(),
            "Planned trip via stopover"
        );
        Ok(Some(itinerary))
    }

    fn start_seeds(&self, request: &TripRequest) -> Vec<Seed> {
        self.graph.closest_nodes(
            request.start(),
            request.time,
            request.direction,
            self.config.nearby_stops,
        )
    }

    fn finish_goal(&self, request: &TripRequest) -> AtAnyStop {
        self.graph
            .closest_stops(request.finish(), self.config.nearby_stops)
            .into_iter()
            .map(|stop| stop.id)
            .collect()
    }

    /// Run one leg, with whatever is left of the trip time budget after
    /// `spent`.
    fn leg<G>(
        &self,
        seeds: Vec<Seed>,
        goal: &G,
        request: &TripRequest,
        spent: Duration,
    ) -> Option<PathChain>
    where
        G: GoalPredicate + ?Sized,
    {
        let remaining = match self.config.max_trip() {
            Some(max) if spent > max => return None,
            Some(max) => Some((max - spent).num_minutes()),
            None => None,
        };
        let config = SearchConfig::new(Some(1), remaining);

        search(self.graph, seeds, goal, request.direction, &config).first_path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Destination;
    use crate::graph::GraphBuilder;
    use crate::planner::DestinationFilter;
    use crate::search::TimeDirection;
    use crate::test_support::{at, settings, stop_location, stop_time};

    /// Home is stop 1, work is stop 3. Trip 1 runs home (08:00) to stop 2
    /// (08:10); trip 2 runs stop 2 (08:40) to work (08:55). A child care
    /// centre sits next to stop 2.
    fn graph() -> Graph {
        GraphBuilder::new(settings(10))
            .build(
                vec![
                    stop_time(1, 1, 1, 8, 0),
                    stop_time(2, 1, 2, 8, 10),
                    stop_time(2, 2, 1, 8, 40),
                    stop_time(3, 2, 2, 8, 55),
                ],
                vec![Destination::new("Little Sprouts", stop_location(2)).with_attribute("infants", "yes")],
            )
            .unwrap()
    }

    fn planner(graph: &Graph) -> TripPlanner<'_> {
        TripPlanner::new(graph, PlannerConfig::new(1, None))
    }

    #[test]
    fn arrive_by_with_drop_off() {
        let graph = graph();
        let request = TripRequest::new(stop_location(1), stop_location(3), at(9, 0), TimeDirection::Backwards);

        let itinerary = planner(&graph)
            .plan_via_destination(&request, &DestinationFilter::named("Little Sprouts"))
            .unwrap()
            .unwrap();

        assert_eq!(itinerary.departure_time(), Some(at(8, 0)));
        assert_eq!(itinerary.arrival_time(), Some(at(8, 55)));
        assert_eq!(itinerary.destinations().len(), 1);
        assert_eq!(itinerary.destinations()[0].name, "Little Sprouts");

        let times: Vec<_> = itinerary.long_results().iter().map(|s| s.time).collect();
        assert!(times.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn depart_after_with_drop_off() {
        let graph = graph();
        let request = TripRequest::new(stop_location(1), stop_location(3), at(7, 55), TimeDirection::Forwards);
        let infants = DestinationFilter::default().with_attribute("infants", "yes");

        let itinerary = planner(&graph)
            .plan_via_destination(&request, &infants)
            .unwrap()
            .unwrap();

        assert_eq!(itinerary.departure_time(), Some(at(8, 0)));
        assert_eq!(itinerary.arrival_time(), Some(at(8, 55)));
        assert_eq!(itinerary.duration(), Duration::minutes(55));
        assert_eq!(itinerary.destinations().len(), 1);
    }

    #[test]
    fn unknown_stopover_plans_nothing() {
        let graph = graph();
        let request = TripRequest::new(stop_location(1), stop_location(3), at(9, 0), TimeDirection::Backwards);

        let planned = planner(&graph)
            .plan_via_destination(&request, &DestinationFilter::named("Tiny Tots"))
            .unwrap();
        assert!(planned.is_none());
    }

    #[test]
    fn deadline_before_any_service_plans_nothing() {
        let graph = graph();
        let request = TripRequest::new(stop_location(1), stop_location(3), at(7, 30), TimeDirection::Backwards);

        let planned = planner(&graph)
            .plan_via_destination(&request, &DestinationFilter::default())
            .unwrap();
        assert!(planned.is_none());
    }

    #[test]
    fn trip_budget_covers_both_legs() {
        let graph = graph();
        let request = TripRequest::new(stop_location(1), stop_location(3), at(9, 0), TimeDirection::Backwards);
        let stopover = DestinationFilter::named("Little Sprouts");

        // The first leg takes 20 minutes, the whole trip 60.
        let tight = TripPlanner::new(&graph, PlannerConfig::new(1, Some(45)));
        assert!(tight.plan_via_destination(&request, &stopover).unwrap().is_none());

        let enough = TripPlanner::new(&graph, PlannerConfig::new(1, Some(60)));
        assert!(enough.plan_via_destination(&request, &stopover).unwrap().is_some());
    }

    #[test]
    fn direct_trip() {
        let graph = graph();
        let request = TripRequest::new(stop_location(2), stop_location(3), at(8, 30), TimeDirection::Forwards);

        let itinerary = planner(&graph).plan_direct(&request).unwrap();
        assert_eq!(itinerary.departure_time(), Some(at(8, 40)));
        assert_eq!(itinerary.arrival_time(), Some(at(8, 55)));
        assert!(itinerary.destinations().is_empty());
    }

    #[test]
    fn direct_trip_without_connection() {
        let graph = graph();
        // Trip 1 ends at stop 2 half an hour before trip 2 leaves, well
        // outside the transfer window.
        let request = TripRequest::new(stop_location(1), stop_location(3), at(7, 55), TimeDirection::Forwards);

        assert!(planner(&graph).plan_direct(&request).is_none());
    }
}
