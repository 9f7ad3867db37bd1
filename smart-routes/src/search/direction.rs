//! Time direction of a search.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::graph::{Node, NodeId};

/// Which way through time a search runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeDirection {
    /// Start at a departure time and move later ("leave after").
    Forwards,
    /// Start at a deadline and move earlier ("arrive by").
    Backwards,
}

impl TimeDirection {
    /// The neighbour set a search in this direction relaxes.
    pub fn neighbors(self, node: &Node) -> &BTreeSet<NodeId> {
        match self {
            TimeDirection::Forwards => node.downwind(),
            TimeDirection::Backwards => node.upwind(),
        }
    }

    /// Elapsed time moving from `from` to `to` in this direction.
    ///
    /// Negative when `to` lies on the wrong side of `from`.
    pub fn elapsed(self, from: NaiveDateTime, to: NaiveDateTime) -> Duration {
        match self {
            TimeDirection::Forwards => to.signed_duration_since(from),
            TimeDirection::Backwards => from.signed_duration_since(to),
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            TimeDirection::Forwards => TimeDirection::Backwards,
            TimeDirection::Backwards => TimeDirection::Forwards,
        }
    }
}

impl fmt::Display for TimeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeDirection::Forwards => f.write_str("forwards"),
            TimeDirection::Backwards => f.write_str("backwards"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::at;

    #[test]
    fn elapsed_sign_follows_direction() {
        let early = at(8, 0);
        let late = at(8, 25);

        assert_eq!(TimeDirection::Forwards.elapsed(early, late), Duration::minutes(25));
        assert_eq!(TimeDirection::Backwards.elapsed(late, early), Duration::minutes(25));
        assert!(TimeDirection::Forwards.elapsed(late, early) < Duration::zero());
    }

    #[test]
    fn reversed_and_display() {
        assert_eq!(TimeDirection::Forwards.reversed(), TimeDirection::Backwards);
        assert_eq!(TimeDirection::Backwards.to_string(), "backwards");
        let parsed: TimeDirection = serde_json::from_str("\"forwards\"").unwrap();
        assert_eq!(parsed, TimeDirection::Forwards);
    }
}
