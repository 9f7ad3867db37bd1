//! Search paths and two-leg stitching.

use chrono::{Duration, NaiveDateTime};

use crate::graph::{Graph, NodeId};
use crate::search::TimeDirection;

/// Errors from joining two search paths.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StitchError {
    /// The legs were searched in different time directions.
    #[error("cannot stitch a {second} leg onto a {first} leg")]
    DirectionMismatch {
        first: TimeDirection,
        second: TimeDirection,
    },

    /// The second leg starts on the wrong side of the first leg's end.
    #[error("second leg starts at {root}, against the {direction} order of the first leg ending at {joint}")]
    TimeReversal {
        direction: TimeDirection,
        joint: NaiveDateTime,
        root: NaiveDateTime,
    },
}

/// One node of a path with its accumulated cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathLink {
    pub node: NodeId,
    pub cost: Duration,
}

/// A path found by a search, from the goal back to the seed it grew from.
///
/// Never empty: the first link is the goal, the last is the root (seed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathChain {
    direction: TimeDirection,
    links: Vec<PathLink>,
}

impl PathChain {
    pub(crate) fn new(direction: TimeDirection, links: Vec<PathLink>) -> Self {
        debug_assert!(!links.is_empty(), "a path has at least its goal");
        Self { direction, links }
    }

    pub fn direction(&self) -> TimeDirection {
        self.direction
    }

    /// The links, goal first.
    pub fn links(&self) -> &[PathLink] {
        &self.links
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// The goal end of the path.
    pub fn goal(&self) -> &PathLink {
        &self.links[0]
    }

    /// The seed end of the path.
    pub fn root(&self) -> &PathLink {
        &self.links[self.links.len() - 1]
    }

    /// Elapsed time from the root to the goal.
    pub fn cost(&self) -> Duration {
        self.goal().cost
    }

    /// Continue `first` with this path.
    ///
    /// This path's root takes `first`'s goal as its parent, giving one chain
    /// from this goal back to `first`'s root. Costs on this path are shifted
    /// so the whole chain reports elapsed time from `first`'s root.
    ///
    /// Both legs must have been searched in the same direction, and this
    /// path's root must not lie before (going forwards) or after (going
    /// backwards) `first`'s goal.
    pub fn stitch_onto(mut self, first: PathChain, graph: &Graph) -> Result<PathChain, StitchError> {
        if self.direction != first.direction {
            return Err(StitchError::DirectionMismatch {
                first: first.direction,
                second: self.direction,
            });
        }

        let joint = graph.node(first.goal().node).time();
        let root = graph.node(self.root().node).time();
        let gap = self.direction.elapsed(joint, root);
        if gap < Duration::zero() {
            return Err(StitchError::TimeReversal {
                direction: self.direction,
                joint,
                root,
            });
        }

        let offset = first.goal().cost + gap - self.root().cost;
        for link in &mut self.links {
            link.cost = link.cost + offset;
        }
        self.links.extend(first.links);
        Ok(self)
    }
}
