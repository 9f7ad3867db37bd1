use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use serde::Deserialize;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use smart_routes::feed::{FeedError, FeedSnapshot};
use smart_routes::planner::{DestinationFilter, PlanError, PlannerConfig, TripPlanner, TripRequest};

const USAGE: &str = "usage: smart-routes <snapshot.json> <query.json>";

/// A trip request plus how to plan it, as read from the query file.
#[derive(Debug, Deserialize)]
struct TripQuery {
    #[serde(flatten)]
    request: TripRequest,
    /// Stop at a matching destination on the way.
    #[serde(default)]
    via: Option<DestinationFilter>,
    #[serde(default)]
    planner: PlannerConfig,
}

#[derive(Debug, thiserror::Error)]
enum RunError {
    #[error("expected a snapshot path and a query path")]
    Usage,

    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error("failed to read query {}: {source}", path.display())]
    QueryIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid query {}: {source}", path.display())]
    Query {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error("failed to write itinerary: {0}")]
    Output(#[from] serde_json::Error),
}

fn load_query(path: &Path) -> Result<TripQuery, RunError> {
    let file = File::open(path).map_err(|source| RunError::QueryIo {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| RunError::Query {
        path: path.to_path_buf(),
        source,
    })
}

/// Returns whether an itinerary was found.
fn run() -> Result<bool, RunError> {
    let mut args = std::env::args_os().skip(1);
    let (Some(snapshot_path), Some(query_path), None) = (args.next(), args.next(), args.next()) else {
        return Err(RunError::Usage);
    };

    let snapshot = FeedSnapshot::from_path(&snapshot_path)?;
    let query = load_query(Path::new(&query_path))?;
    let graph = snapshot.build_graph()?;

    let planner = TripPlanner::new(&graph, query.planner);
    let itinerary = match &query.via {
        Some(filter) => planner.plan_via_destination(&query.request, filter)?,
        None => planner.plan_direct(&query.request),
    };

    let Some(itinerary) = itinerary else {
        warn!("No itinerary satisfies the query");
        return Ok(false);
    };

    info!(
        departure = ?itinerary.departure_time(),
        arrival = ?itinerary.arrival_time(),
        "Itinerary found"
    );
    println!("{}", serde_json::to_string_pretty(&itinerary)?);
    Ok(true)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(RunError::Usage) => {
            eprintln!("{USAGE}");
            ExitCode::from(2)
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
