//! Integer grid distances.

use waygrid_core::Coord;

/// Scaled octile distance between two coordinates: 10 per orthogonal step,
/// 14 per diagonal step (≈ 10·√2), keeping the cost model in integers.
///
/// Between adjacent cells this is the exact step cost; over longer spans it
/// is the shortest-path cost on an *open* grid, which makes it the search
/// heuristic as well. It does not account for obstacles.
#[inline]
pub fn octile(a: Coord, b: Coord) -> i32 {
    let dx = (a.x - b.x).abs();
    let dy = (a.y - b.y).abs();
    if dx > dy {
        14 * dy + 10 * (dx - dy)
    } else {
        14 * dx + 10 * (dy - dx)
    }
}
