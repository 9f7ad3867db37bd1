//! JSON feed snapshots.
//!
//! A snapshot bundles everything needed to build a graph: the stop-time
//! records, the destinations, and optionally the builder settings. This is
//! the only part of the library that reads or writes files.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{Destination, MalformedScheduleError, StopTimeRecord};
use crate::graph::{Graph, GraphBuilder, GraphBuilderSettings};

/// Error loading or saving a feed snapshot.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// The snapshot file could not be read or written
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The snapshot is not valid JSON for a feed
    #[error("invalid feed snapshot: {0}")]
    Json(#[from] serde_json::Error),

    /// A record failed validation while building in strict mode
    #[error(transparent)]
    Schedule(#[from] MalformedScheduleError),
}

/// Stop times, destinations and builder settings in one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedSnapshot {
    pub stop_times: Vec<StopTimeRecord>,
    #[serde(default)]
    pub destinations: Vec<Destination>,
    #[serde(default)]
    pub settings: GraphBuilderSettings,
}

impl FeedSnapshot {
    pub fn from_reader(reader: impl Read) -> Result<Self, FeedError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Load a snapshot from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FeedError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| FeedError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let snapshot = Self::from_reader(BufReader::new(file))?;
        debug!(
            path = %path.display(),
            stop_times = snapshot.stop_times.len(),
            destinations = snapshot.destinations.len(),
            "Loaded feed snapshot"
        );
        Ok(snapshot)
    }

    /// Write the snapshot as pretty-printed JSON.
    ///
    /// Creates parent directories if they don't exist.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), FeedError> {
        let path = path.as_ref();
        let io_error = |source| FeedError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(io_error)
    }

    /// Build a graph from the snapshot with its own settings.
    pub fn build_graph(self) -> Result<Graph, FeedError> {
        let builder = GraphBuilder::new(self.settings);
        Ok(builder.build(self.stop_times, self.destinations)?)
    }
}
