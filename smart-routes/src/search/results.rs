//! Search seeds and outputs.

use chrono::Duration;

use crate::graph::NodeId;
use crate::itinerary::{PathChain, PathLink};

use super::TimeDirection;

/// A node a search starts from, with the cost already spent reaching it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seed {
    pub node: NodeId,
    pub cost: Duration,
}

impl Seed {
    /// A seed with zero cost.
    pub fn new(node: NodeId) -> Self {
        Self {
            node,
            cost: Duration::zero(),
        }
    }

    pub fn with_cost(node: NodeId, cost: Duration) -> Self {
        Self { node, cost }
    }
}

impl From<NodeId> for Seed {
    fn from(node: NodeId) -> Self {
        Seed::new(node)
    }
}

/// One entry of a search path.
///
/// `parent` indexes into the [`SearchResults`] that produced this entry;
/// seeds have no parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeInfo {
    pub node: NodeId,
    pub parent: Option<usize>,
    pub cost: Duration,
}

/// Everything a search reached, and which of those entries were goals.
///
/// Goals are kept in the order the search popped them, which is ascending
/// cost.
#[derive(Debug, Clone)]
pub struct SearchResults {
    pub(crate) direction: TimeDirection,
    pub(crate) infos: Vec<NodeInfo>,
    pub(crate) goals: Vec<usize>,
}

impl SearchResults {
    pub fn direction(&self) -> TimeDirection {
        self.direction
    }

    /// Number of goals found.
    pub fn len(&self) -> usize {
        self.goals.len()
    }

    /// Returns true if no goal was found.
    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }

    /// The goal entries, in discovery order.
    pub fn goals(&self) -> impl Iterator<Item = &NodeInfo> {
        self.goals.iter().map(|&index| &self.infos[index])
    }

    /// The predecessor of an entry on its path back to a seed.
    pub fn parent(&self, info: &NodeInfo) -> Option<&NodeInfo> {
        info.parent.map(|index| &self.infos[index])
    }

    /// Every node the search assigned a tentative cost to.
    pub fn reached(&self) -> &[NodeInfo] {
        &self.infos
    }

    /// The path to the `n`th goal, goal first.
    pub fn path(&self, n: usize) -> Option<PathChain> {
        let mut index = *self.goals.get(n)?;
        let mut links = Vec::new();
        loop {
            let info = &self.infos[index];
            links.push(PathLink {
                node: info.node,
                cost: info.cost,
            });
            match info.parent {
                Some(parent) => index = parent,
                None => break,
            }
        }
        Some(PathChain::new(self.direction, links))
    }

    /// The path to the cheapest goal.
    pub fn first_path(&self) -> Option<PathChain> {
        self.path(0)
    }

    /// Paths to every goal, in discovery order.
    pub fn paths(&self) -> impl Iterator<Item = PathChain> + '_ {
        (0..self.goals.len()).filter_map(|n| self.path(n))
    }
}
