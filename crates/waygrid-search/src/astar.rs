//! The A* search routine.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use glam::Vec3;
use waygrid_core::{Coord, SpatialGrid};

use crate::distance::octile;
use crate::node::SearchNode;
use crate::queue::OpenQueue;

/// Run A* from `src` to `dst` over `grid`, collecting the resulting cell
/// chain into `out` in **goal→start** order (the caller reverses it).
///
/// `open` must be pre-sized and empty, `closed` and `out` empty; all three
/// are caller-owned so a scheduler can allocate them once per search and
/// release them when the result has been consumed.
///
/// Every failure mode — endpoint outside the grid, open set exhausted,
/// queue capacity overflow, broken backward chain — leaves `out` empty or
/// short of the goal. The caller detects failure by checking that `out` is
/// non-empty and that its first entry lies near `dst`; the engine does not
/// report a reason.
///
/// The heuristic is the same [`octile`] function used for step costs,
/// evaluated on the open grid. It ignores obstacles, so with walls present
/// it can overestimate the true remaining cost; the returned path is then
/// walkable but not necessarily optimal.
pub fn search(
    grid: &SpatialGrid,
    src: Vec3,
    dst: Vec3,
    open: &mut OpenQueue,
    closed: &mut HashMap<Coord, SearchNode>,
    out: &mut Vec<Coord>,
) {
    let start = grid.coordinate_of(src);
    let goal = grid.coordinate_of(dst);
    if start.is_out_of_bounds() || goal.is_out_of_bounds() {
        return;
    }

    let mut current = SearchNode::seed(start);
    if open.push(current).is_err() {
        return;
    }

    while let Some(popped) = open.pop() {
        current = popped;

        // A coordinate is expanded at most once.
        match closed.entry(current.coord) {
            Entry::Occupied(_) => break,
            Entry::Vacant(slot) => slot.insert(current),
        };

        if current.coord == goal {
            break;
        }

        for dx in -1..=1 {
            for dy in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let neighbor = current.coord.shift(dx, dy);
                if !grid.contains(neighbor) {
                    continue;
                }
                if !grid.cell_at(neighbor.x, neighbor.y).walkable
                    || closed.contains_key(&neighbor)
                {
                    continue;
                }

                let tentative_g = current.g + octile(current.coord, neighbor);
                let next = SearchNode {
                    coord: neighbor,
                    g: tentative_g,
                    h: octile(neighbor, goal),
                    origin: current.coord,
                };

                match open.get(neighbor).map(|queued| queued.g) {
                    Some(queued_g) => {
                        // Re-queue only on a strict improvement.
                        if tentative_g < queued_g {
                            open.remove(neighbor);
                            if open.push(next).is_err() {
                                return;
                            }
                        }
                    }
                    None => {
                        // A full queue aborts the whole search.
                        if open.push(next).is_err() {
                            return;
                        }
                    }
                }
            }
        }
    }

    // Walk the backward chain from the last expanded node. The start node
    // (origin == self) is not collected, so a start-equals-goal search
    // yields an empty chain.
    while current.coord != current.origin {
        out.push(current.coord);
        match closed.get(&current.origin) {
            Some(&next) => current = next,
            // Broken chain: return what was collected; validation against
            // the destination rejects it.
            None => return,
        }
    }
}
