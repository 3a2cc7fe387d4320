//! **waygrid-search** — the A* search engine over [`waygrid_core`] grids.
//!
//! This crate provides:
//!
//! - the scaled octile step/heuristic distance ([`octile`])
//! - a fixed-capacity indexed binary heap used as the open set ([`OpenQueue`])
//! - the A* routine itself ([`astar::search`])
//!
//! The engine runs against a private grid snapshot and fills caller-owned
//! buffers, so a search can execute on a worker thread while the live grid
//! keeps evolving. All failure modes (unreachable endpoint, open-set
//! exhaustion, capacity overflow, broken backward chain) leave the output
//! empty or short; callers distinguish success solely by validating the
//! output against the requested destination.

pub mod astar;
mod distance;
mod node;
mod queue;

pub use distance::octile;
pub use node::SearchNode;
pub use queue::{OpenQueue, QueueFull};
