//! The single-slot, tick-driven [`PathScheduler`].

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::thread::{self, JoinHandle};

use glam::Vec3;
use waygrid_core::{Coord, SpatialGrid};
use waygrid_search::{OpenQueue, SearchNode, astar};

use crate::request::{Path, RequestHandle, RequestState};

/// Number of ticks a search may run before the scheduler forces synchronous
/// completion. Bounds worst-case request latency at the cost of a possible
/// short block on the scheduling thread.
pub const SOFT_DEADLINE_TICKS: u32 = 3;

/// A reconstructed path is accepted only if its goal-end cell centre lies
/// within this many world units of the requested destination.
const GOAL_TOLERANCE: f32 = 3.0;

/// Initial closed-map allocation; it grows as the search expands cells.
const CLOSED_SEED_CAPACITY: usize = 128;

// ---------------------------------------------------------------------------
// SearchJob
// ---------------------------------------------------------------------------

/// Everything one search exclusively owns: the grid snapshot and the three
/// search buffers. Moved onto the worker thread at start and moved back
/// through the `JoinHandle` when the scheduler consumes the result.
struct SearchJob {
    grid: SpatialGrid,
    src: Vec3,
    dst: Vec3,
    open: OpenQueue,
    closed: HashMap<Coord, SearchNode>,
    result: Vec<Coord>,
}

impl SearchJob {
    fn run(mut self) -> Self {
        astar::search(
            &self.grid,
            self.src,
            self.dst,
            &mut self.open,
            &mut self.closed,
            &mut self.result,
        );
        self
    }

    /// Validate the raw cell chain and convert it to world waypoints,
    /// releasing the snapshot afterwards.
    ///
    /// The chain arrives goal→start; acceptance checks the *first* collected
    /// cell (the goal end) against the requested destination, then the
    /// waypoints are emitted reversed into start→goal order.
    fn into_path(mut self) -> Path {
        let accepted = match self.result.first() {
            Some(&goal_end) => {
                self.grid.cell_position_at(goal_end).distance(self.dst) <= GOAL_TOLERANCE
            }
            None => false,
        };

        let path = if accepted {
            Path {
                failed: false,
                waypoints: self
                    .result
                    .iter()
                    .rev()
                    .map(|&c| self.grid.cell_position_at(c))
                    .collect(),
            }
        } else {
            Path::failure()
        };

        self.grid.release();
        path
    }
}

// ---------------------------------------------------------------------------
// PathScheduler
// ---------------------------------------------------------------------------

/// One in-flight search plus its bookkeeping.
struct Running {
    request: Rc<RefCell<RequestState>>,
    worker: JoinHandle<SearchJob>,
    ticks: u32,
}

/// Schedules path requests over a live grid, one search at a time.
///
/// Construct one scheduler at startup and pass it by reference to whatever
/// submits requests; there is no process-wide instance. Drive it with
/// [`tick`](PathScheduler::tick) once per frame.
pub struct PathScheduler {
    queue: VecDeque<Rc<RefCell<RequestState>>>,
    running: Option<Running>,
    live_grid: SpatialGrid,
}

impl PathScheduler {
    /// Create an idle scheduler. Its live grid starts degenerate, so no
    /// search runs before the first [`update_grid`](PathScheduler::update_grid).
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            running: None,
            live_grid: SpatialGrid::empty(),
        }
    }

    /// Enqueue a path request from `src` to `dst`. Requests start in FIFO
    /// order; a request submitted while a search is running simply waits.
    pub fn submit(&mut self, src: Vec3, dst: Vec3) -> RequestHandle {
        let handle = RequestHandle::new(src, dst);
        self.queue.push_back(handle.shared());
        handle
    }

    /// Replace the live grid used for future searches.
    ///
    /// The incoming grid is validated *before* the old one is touched: an
    /// invalid replacement (degenerate cell size) is rejected and the
    /// current live grid stays intact. On acceptance the old grid's
    /// resources are released.
    pub fn update_grid(&mut self, grid: SpatialGrid) {
        if !grid.is_valid() {
            log::warn!("rejecting live grid update: degenerate geometry");
            return;
        }
        self.live_grid.release();
        self.live_grid = grid;
    }

    /// One scheduling tick.
    ///
    /// Completes the in-flight search if it finished naturally or its soft
    /// deadline elapsed (the latter blocks until the worker yields), then
    /// starts the next queued request if the slot is free and the live grid
    /// is valid. Ordinary ticks before the deadline never block.
    pub fn tick(&mut self) {
        if let Some(mut running) = self.running.take() {
            running.ticks += 1;
            if running.worker.is_finished() || running.ticks > SOFT_DEADLINE_TICKS {
                self.complete(running);
            } else {
                self.running = Some(running);
            }
        }

        if self.running.is_none() {
            self.start_next();
        }
    }

    /// Whether a search is currently in flight.
    pub fn is_busy(&self) -> bool {
        self.running.is_some()
    }

    /// Number of requests waiting to start.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Join the worker, validate its result, complete the request, and
    /// release every search-scoped resource.
    fn complete(&mut self, running: Running) {
        if !running.worker.is_finished() {
            log::warn!(
                "search exceeded soft deadline ({} ticks); forcing completion",
                SOFT_DEADLINE_TICKS
            );
        }

        let path = match running.worker.join() {
            Ok(job) => job.into_path(),
            Err(_) => {
                // Worker panic: the job (and its snapshot) is gone; report
                // a failed path rather than poisoning the scheduler.
                log::error!("search worker panicked; reporting failed path");
                Path::failure()
            }
        };

        log::debug!(
            "path request completed: failed={} waypoints={}",
            path.failed,
            path.waypoints.len()
        );

        let mut state = running.request.borrow_mut();
        state.result = Some(path);
        state.done = true;
    }

    /// Dequeue the next request and spawn its search, if possible.
    fn start_next(&mut self) {
        if !self.live_grid.is_valid() {
            return;
        }
        let Some(request) = self.queue.pop_front() else {
            return;
        };

        let (src, dst) = {
            let state = request.borrow();
            (state.src, state.dst)
        };

        let job = SearchJob {
            grid: self.live_grid.snapshot(),
            src,
            dst,
            open: OpenQueue::with_capacity(open_capacity(&self.live_grid)),
            closed: HashMap::with_capacity(CLOSED_SEED_CAPACITY),
            result: Vec::new(),
        };

        log::debug!("starting search {src} -> {dst}");
        let worker = thread::spawn(move || job.run());
        self.running = Some(Running {
            request,
            worker,
            ticks: 0,
        });
    }
}

impl Default for PathScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for PathScheduler {
    /// Shutdown drains the in-flight search and releases whatever
    /// search-scoped resources are still held.
    fn drop(&mut self) {
        if let Some(running) = self.running.take() {
            if let Ok(mut job) = running.worker.join() {
                job.grid.release();
            }
        }
        self.live_grid.release();
    }
}

/// Open-queue sizing heuristic: grid area over cell size, halved. Large
/// enough for the frontiers seen in practice on the grids this runs on;
/// a search that outgrows it fails rather than reallocating.
fn open_capacity(grid: &SpatialGrid) -> usize {
    ((grid.width() * grid.height()) as f32 / grid.cell_size() / 2.0) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use waygrid_core::Cell;

    fn open_grid(width: i32, height: i32) -> SpatialGrid {
        let mut g = SpatialGrid::new(Vec3::ZERO, width, height, 1.0);
        for y in 0..height {
            for x in 0..width {
                g.set_cell(x, y, Cell::walkable());
            }
        }
        g
    }

    /// Tick until `handle` completes. The soft deadline guarantees
    /// completion within a handful of ticks regardless of worker timing.
    fn drive(sched: &mut PathScheduler, handle: &RequestHandle) {
        for _ in 0..2 * (SOFT_DEADLINE_TICKS + 1) {
            sched.tick();
            if handle.is_done() {
                return;
            }
        }
        panic!("request did not complete within the deadline");
    }

    #[test]
    fn diagonal_path_across_open_grid() {
        let mut sched = PathScheduler::new();
        let grid = open_grid(10, 10);
        let (src, dst) = (grid.cell_position(0, 0), grid.cell_position(9, 9));
        sched.update_grid(grid);

        let handle = sched.submit(src, dst);
        drive(&mut sched, &handle);

        let path = handle.result().expect("completed request has a result");
        assert!(!path.failed);
        // Start cell excluded: 9 diagonal steps.
        assert_eq!(path.waypoints.len(), 9);
        assert_eq!(*path.waypoints.last().unwrap(), dst);
        // Waypoints advance one diagonal cell at a time.
        let first = path.waypoints[0];
        let cell = sched.live_grid.coordinate_of(first);
        assert_eq!(cell, Coord::new(1, 1));
    }

    #[test]
    fn blocked_destination_fails() {
        let mut sched = PathScheduler::new();
        let mut grid = open_grid(10, 10);
        grid.set_cell(9, 9, Cell::blocked());
        let (src, dst) = (grid.cell_position(0, 0), grid.cell_position(9, 9));
        sched.update_grid(grid);

        let handle = sched.submit(src, dst);
        drive(&mut sched, &handle);

        let path = handle.result().expect("completed request has a result");
        assert!(path.failed);
        assert!(path.waypoints.is_empty());
    }

    #[test]
    fn out_of_bounds_start_fails() {
        let mut sched = PathScheduler::new();
        let grid = open_grid(10, 10);
        let dst = grid.cell_position(5, 5);
        sched.update_grid(grid);

        let handle = sched.submit(Vec3::new(500.0, 0.0, 0.0), dst);
        drive(&mut sched, &handle);

        assert!(handle.result().expect("result").failed);
    }

    #[test]
    fn requests_run_strictly_in_submission_order() {
        let mut sched = PathScheduler::new();
        let grid = open_grid(10, 10);
        let a = (grid.cell_position(0, 0), grid.cell_position(9, 9));
        let b = (grid.cell_position(9, 0), grid.cell_position(0, 9));
        sched.update_grid(grid);

        let first = sched.submit(a.0, a.1);
        let second = sched.submit(b.0, b.1);

        sched.tick();
        // Only the first request is in flight; the second waits.
        assert!(sched.is_busy());
        assert_eq!(sched.pending(), 1);
        assert!(!second.is_done());

        drive(&mut sched, &first);
        // The first completed before the second ever started running.
        assert!(first.is_done());

        drive(&mut sched, &second);
        assert!(!second.result().expect("result").failed);
    }

    #[test]
    fn nothing_runs_without_a_valid_grid() {
        let mut sched = PathScheduler::new();
        let handle = sched.submit(Vec3::ZERO, Vec3::ONE);

        for _ in 0..5 {
            sched.tick();
        }
        assert!(!sched.is_busy());
        assert!(!handle.is_done());
        assert_eq!(sched.pending(), 1);
    }

    #[test]
    fn invalid_grid_update_keeps_old_grid_usable() {
        let mut sched = PathScheduler::new();
        let grid = open_grid(10, 10);
        let (src, dst) = (grid.cell_position(0, 0), grid.cell_position(9, 9));
        sched.update_grid(grid);

        // Degenerate replacement is rejected, old grid stays live.
        sched.update_grid(SpatialGrid::empty());
        assert!(sched.live_grid.is_valid());

        let handle = sched.submit(src, dst);
        drive(&mut sched, &handle);
        assert!(!handle.result().expect("result").failed);
    }

    #[test]
    fn grid_replacement_mid_flight_does_not_disturb_the_search() {
        let mut sched = PathScheduler::new();
        let grid = open_grid(10, 10);
        let (src, dst) = (grid.cell_position(0, 0), grid.cell_position(9, 9));
        sched.update_grid(grid);

        let handle = sched.submit(src, dst);
        sched.tick();

        // Swap in a grid that blocks everything; the running search holds
        // its own snapshot of the old one.
        sched.update_grid(SpatialGrid::new(Vec3::ZERO, 10, 10, 1.0));
        drive(&mut sched, &handle);

        assert!(!handle.result().expect("result").failed);
    }

    #[test]
    fn early_poll_returns_absent_result() {
        let mut sched = PathScheduler::new();
        let grid = open_grid(10, 10);
        let (src, dst) = (grid.cell_position(0, 0), grid.cell_position(9, 9));
        sched.update_grid(grid);

        let handle = sched.submit(src, dst);
        // Usage error: logged, degrades to whatever is stored.
        assert!(handle.result().is_none());

        drive(&mut sched, &handle);
        assert!(handle.result().is_some());
    }
}
