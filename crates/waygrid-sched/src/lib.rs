//! **waygrid-sched** — the asynchronous path request surface.
//!
//! Callers [`submit`] a source/destination pair and poll the returned
//! [`RequestHandle`]; the [`PathScheduler`] runs at most one search at a
//! time on a worker thread and forces a result within a small number of
//! scheduling ticks, so the host's per-frame loop never waits long for a
//! path.
//!
//! The scheduler owns the "live" grid used to start new searches; each
//! search runs against a private snapshot, so replacing the live grid while
//! a search is in flight cannot corrupt that search's view.
//!
//! [`submit`]: PathScheduler::submit

mod request;
mod scheduler;

pub use request::{Path, RequestHandle};
pub use scheduler::{PathScheduler, SOFT_DEADLINE_TICKS};

pub use waygrid_core::{Cell, Coord, SpatialGrid};
