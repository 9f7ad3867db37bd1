//! Multi-modal trip planning over a time-expanded transit graph.
//!
//! Answers questions like "what is the latest I can leave home, drop off at
//! a child care centre, and still reach work by 10:30?" by building a graph
//! of scheduled stop visits and running Dijkstra over it, forwards or
//! backwards in time.

pub mod domain;
pub mod feed;
pub mod graph;
pub mod heap;
pub mod itinerary;
pub mod planner;
pub mod search;

#[cfg(test)]
mod test_support;
