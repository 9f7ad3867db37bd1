//! Multi-seed, multi-goal Dijkstra.

use std::collections::{HashMap, HashSet};

use chrono::Duration;
use tracing::{debug, trace, warn};

use crate::graph::{Graph, NodeId};
use crate::heap::{FibonacciHeap, Handle};

use super::{GoalPredicate, NodeInfo, SearchConfig, SearchResults, Seed, TimeDirection};

/// Find the cheapest paths from `seeds` to nodes matching `goal`.
///
/// Seeds enter the heap at their own cost with no predecessor. Each popped
/// node is settled for good: a goal is recorded and not expanded further,
/// anything else has its neighbours (downwind when searching forwards,
/// upwind when searching backwards) relaxed with the elapsed time between
/// the two nodes. Edges whose elapsed time is negative are ignored.
///
/// The search stops when the heap runs dry or `config.max_results` goals
/// have been found. Finding nothing yields empty results, not an error.
pub fn search<G>(
    graph: &Graph,
    seeds: impl IntoIterator<Item = Seed>,
    goal: &G,
    direction: TimeDirection,
    config: &SearchConfig,
) -> SearchResults
where
    G: GoalPredicate + ?Sized,
{
    let mut heap: FibonacciHeap<NodeId, Duration> = FibonacciHeap::new();
    let mut infos: Vec<NodeInfo> = Vec::new();
    let mut entries: HashMap<NodeId, (usize, Handle)> = HashMap::new();
    let mut settled: HashSet<NodeId> = HashSet::new();
    let mut goals = Vec::new();

    let max_elapsed = config.max_elapsed();
    let within_bound = |cost: Duration| max_elapsed.is_none_or(|max| cost <= max);

    let mut seed_count = 0;
    for seed in seeds {
        if graph.get(seed.node).is_none() {
            warn!(node = seed.node.index(), "Ignoring seed outside the graph");
            continue;
        }
        let cost = seed.cost.max(Duration::zero());
        if !within_bound(cost) {
            continue;
        }
        seed_count += 1;

        match entries.get(&seed.node) {
            Some(&(index, handle)) => {
                if cost < infos[index].cost {
                    infos[index].cost = cost;
                    heap.update_key(&handle, cost);
                }
            }
            None => {
                let index = infos.len();
                infos.push(NodeInfo {
                    node: seed.node,
                    parent: None,
                    cost,
                });
                let handle = heap.insert(seed.node, cost);
                entries.insert(seed.node, (index, handle));
            }
        }
    }

    let limit_reached = |found: usize| config.max_results.is_some_and(|max| found >= max);

    let mut expanded = 0;
    while !limit_reached(goals.len()) {
        let Some((node_id, cost)) = heap.pop_min() else {
            break;
        };
        settled.insert(node_id);
        let Some(&(current, _)) = entries.get(&node_id) else {
            continue;
        };
        let node = graph.node(node_id);

        if goal.matches(graph, node) {
            trace!(node = node_id.index(), name = node.name(), ?cost, "Goal reached");
            goals.push(current);
            continue;
        }

        expanded += 1;
        for &next in direction.neighbors(node) {
            if settled.contains(&next) {
                continue;
            }
            let elapsed = direction.elapsed(node.time(), graph.node(next).time());
            if elapsed < Duration::zero() {
                trace!(
                    from = node_id.index(),
                    to = next.index(),
                    "Skipping edge against the search direction"
                );
                continue;
            }
            let tentative = cost + elapsed;
            if !within_bound(tentative) {
                continue;
            }

            match entries.get(&next) {
                Some(&(index, handle)) => {
                    if tentative < infos[index].cost {
                        infos[index].cost = tentative;
                        infos[index].parent = Some(current);
                        heap.update_key(&handle, tentative);
                    }
                }
                None => {
                    let index = infos.len();
                    infos.push(NodeInfo {
                        node: next,
                        parent: Some(current),
                        cost: tentative,
                    });
                    let handle = heap.insert(next, tentative);
                    entries.insert(next, (index, handle));
                }
            }
        }
    }

    debug!(
        %direction,
        seeds = seed_count,
        expanded,
        reached = infos.len(),
        goals = goals.len(),
        "Search complete"
    );

    SearchResults {
        direction,
        infos,
        goals,
    }
}
