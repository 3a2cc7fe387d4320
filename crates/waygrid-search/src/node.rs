//! The [`SearchNode`] record shared by the open queue and the closed set.

use waygrid_core::Coord;

/// One open/closed-set record of the A* search.
///
/// Identity for queue membership is `coord` alone: two records with the same
/// coordinate are the same logical entry, which is what makes
/// "replace with a better cost" possible. Extraction order is by
/// `g + h` ascending, ties broken by smaller `h` (prefer nodes heuristically
/// closer to the goal).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SearchNode {
    /// The cell this record scores.
    pub coord: Coord,
    /// Accumulated step cost from the start.
    pub g: i32,
    /// Heuristic estimate of the remaining cost to the goal.
    pub h: i32,
    /// Predecessor cell; the start node points at itself.
    pub origin: Coord,
}

impl SearchNode {
    /// The start record: zero costs, origin = self.
    #[inline]
    pub const fn seed(coord: Coord) -> Self {
        Self {
            coord,
            g: 0,
            h: 0,
            origin: coord,
        }
    }

    /// Total estimated cost through this cell.
    #[inline]
    pub const fn f(&self) -> i32 {
        self.g + self.h
    }

    /// Extraction precedence: `(f, h)` ascending.
    #[inline]
    pub(crate) fn precedes(&self, other: &Self) -> bool {
        (self.f(), self.h) < (other.f(), other.h)
    }
}
