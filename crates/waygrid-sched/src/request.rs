//! Path requests and their results.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec3;

/// The outcome of one path request, ordered start→goal.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    /// Set when no acceptable path was found. The scheduler does not report
    /// why — unreachable endpoints, an exhausted or overflowing open set,
    /// and a rejected reconstruction all look the same to the caller.
    pub failed: bool,
    /// World-space waypoints, one per path cell. Empty when `failed`.
    pub waypoints: Vec<Vec3>,
}

impl Path {
    pub(crate) fn failure() -> Self {
        Self {
            failed: true,
            waypoints: Vec::new(),
        }
    }
}

/// Scheduler-internal request state. Mutated only by the scheduler; the
/// caller observes it through a [`RequestHandle`]. Never touched again once
/// `done` is set.
#[derive(Debug)]
pub(crate) struct RequestState {
    pub src: Vec3,
    pub dst: Vec3,
    pub done: bool,
    pub result: Option<Path>,
}

/// Caller-side handle to a submitted path request.
///
/// The handle and the scheduler live on the same thread (searches run
/// elsewhere, but request completion happens on the scheduling thread), so
/// shared state is a plain `Rc<RefCell<..>>`.
#[derive(Clone, Debug)]
pub struct RequestHandle {
    state: Rc<RefCell<RequestState>>,
}

impl RequestHandle {
    pub(crate) fn new(src: Vec3, dst: Vec3) -> Self {
        Self {
            state: Rc::new(RefCell::new(RequestState {
                src,
                dst,
                done: false,
                result: None,
            })),
        }
    }

    pub(crate) fn shared(&self) -> Rc<RefCell<RequestState>> {
        Rc::clone(&self.state)
    }

    /// Whether the request has completed. Terminal: once true, the result
    /// no longer changes.
    pub fn is_done(&self) -> bool {
        self.state.borrow().done
    }

    /// The computed path.
    ///
    /// Calling before [`is_done`](RequestHandle::is_done) returns true is a
    /// usage error: it is logged, and whatever is currently stored (usually
    /// `None`) comes back.
    pub fn result(&self) -> Option<Path> {
        let state = self.state.borrow();
        if !state.done {
            log::error!("path result polled before completion; wait for is_done()");
        }
        state.result.clone()
    }
}
