//! Goal predicates deciding which popped nodes a search yields.

use std::collections::HashSet;

use crate::domain::{Destination, StopId};
use crate::graph::{Graph, Node};

/// Decides whether a node reached by a search is a goal.
///
/// Implemented for any `Fn(&Node) -> bool`, so ad hoc goals can be
/// closures. Predicates that need the destination payload use the graph.
pub trait GoalPredicate {
    fn matches(&self, graph: &Graph, node: &Node) -> bool;
}

impl<F> GoalPredicate for F
where
    F: Fn(&Node) -> bool,
{
    fn matches(&self, _graph: &Graph, node: &Node) -> bool {
        self(node)
    }
}

/// Any transit node at the given stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtStop(pub StopId);

impl GoalPredicate for AtStop {
    fn matches(&self, _graph: &Graph, node: &Node) -> bool {
        node.stop_id() == Some(self.0)
    }
}

/// Any transit node at one of the given stops.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AtAnyStop(pub HashSet<StopId>);

impl FromIterator<StopId> for AtAnyStop {
    fn from_iter<I: IntoIterator<Item = StopId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl GoalPredicate for AtAnyStop {
    fn matches(&self, _graph: &Graph, node: &Node) -> bool {
        node.stop_id().is_some_and(|stop| self.0.contains(&stop))
    }
}

/// Any destination node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnyDestination;

impl GoalPredicate for AnyDestination {
    fn matches(&self, _graph: &Graph, node: &Node) -> bool {
        node.is_destination()
    }
}

/// Destination nodes whose destination has exactly this name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationNamed(pub String);

impl GoalPredicate for DestinationNamed {
    fn matches(&self, _graph: &Graph, node: &Node) -> bool {
        node.is_destination() && node.name() == self.0
    }
}

/// Destination nodes whose destination payload satisfies a filter.
pub struct DestinationWhere<F>(pub F);

impl<F> GoalPredicate for DestinationWhere<F>
where
    F: Fn(&Destination) -> bool,
{
    fn matches(&self, graph: &Graph, node: &Node) -> bool {
        node.destination_id()
            .and_then(|id| graph.destination(id))
            .is_some_and(|destination| (self.0)(destination))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Destination;
    use crate::graph::{GraphBuilder, NodeId};
    use crate::test_support::{settings, stop_location, stop_time};

    fn graph() -> Graph {
        let care = Destination::new("Little Sprouts", stop_location(2)).with_attribute("infants", "yes");
        GraphBuilder::new(settings(10))
            .build(vec![stop_time(1, 1, 1, 8, 0), stop_time(2, 1, 2, 8, 10)], vec![care])
            .unwrap()
    }

    fn destination_node(graph: &Graph) -> &Node {
        graph.nodes().iter().find(|n| n.is_destination()).unwrap()
    }

    #[test]
    fn stop_predicates() {
        let graph = graph();
        let first = graph.node(NodeId(0));

        assert!(AtStop(StopId(1)).matches(&graph, first));
        assert!(!AtStop(StopId(2)).matches(&graph, first));
        let any: AtAnyStop = [StopId(5), StopId(1)].into_iter().collect();
        assert!(any.matches(&graph, first));
        assert!(!any.matches(&graph, destination_node(&graph)));
    }

    #[test]
    fn destination_predicates() {
        let graph = graph();
        let care = destination_node(&graph);

        assert!(AnyDestination.matches(&graph, care));
        assert!(!AnyDestination.matches(&graph, graph.node(NodeId(0))));
        assert!(DestinationNamed("Little Sprouts".into()).matches(&graph, care));
        assert!(!DestinationNamed("Other".into()).matches(&graph, care));
        assert!(DestinationWhere(|d: &Destination| d.attribute("infants") == Some("yes")).matches(&graph, care));
        assert!(!DestinationWhere(|d: &Destination| d.attribute("infants").is_none()).matches(&graph, care));
    }

    #[test]
    fn closures_are_predicates() {
        let graph = graph();
        let early = |node: &Node| node.time() < crate::test_support::at(8, 5);
        assert!(early.matches(&graph, graph.node(NodeId(0))));
        assert!(!early.matches(&graph, graph.node(NodeId(1))));
    }
}
