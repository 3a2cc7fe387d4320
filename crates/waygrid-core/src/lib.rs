//! **waygrid-core** — Grid world representation for asynchronous pathfinding
//! (core types).
//!
//! This crate provides the foundational types used across the *waygrid*
//! ecosystem: the integer grid coordinate, per-cell walkability data, and
//! the [`SpatialGrid`] that maps between world space and grid indices.

pub mod cell;
pub mod coord;
pub mod grid;

pub use cell::Cell;
pub use coord::Coord;
pub use grid::SpatialGrid;
