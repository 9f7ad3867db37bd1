//! Mergeable priority queue used by the route search.
//!
//! The search relaxes tentative costs in both directions, so besides the
//! usual decrease-key the heap supports increasing a key through the same
//! [`FibonacciHeap::update_key`] entry point.

mod fibonacci;

pub use fibonacci::{EmptyHeapError, FibonacciHeap, Handle};
