//! Search configuration.

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Limits on a single search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Stop after this many goal nodes have been found.
    /// `None` runs until the heap is exhausted.
    pub max_results: Option<usize>,

    /// Do not follow paths longer than this many minutes.
    pub max_elapsed_mins: Option<i64>,
}

impl SearchConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(max_results: Option<usize>, max_elapsed_mins: Option<i64>) -> Self {
        Self {
            max_results,
            max_elapsed_mins,
        }
    }

    /// Stop at the first goal found.
    pub fn first_match() -> Self {
        Self::new(Some(1), None)
    }

    /// Returns the elapsed time bound as a Duration.
    pub fn max_elapsed(&self) -> Option<Duration> {
        self.max_elapsed_mins.map(Duration::minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_unbounded() {
        let config = SearchConfig::default();

        assert_eq!(config.max_results, None);
        assert_eq!(config.max_elapsed(), None);
    }

    #[test]
    fn custom_config() {
        let config = SearchConfig::new(Some(5), Some(90));

        assert_eq!(config.max_results, Some(5));
        assert_eq!(config.max_elapsed(), Some(Duration::minutes(90)));
        assert_eq!(SearchConfig::first_match().max_results, Some(1));
    }
}
