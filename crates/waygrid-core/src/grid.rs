//! The [`SpatialGrid`] type — a 2D array of [`Cell`]s plus the transforms
//! between world space and grid indices.
//!
//! The grid is centred on `world_offset` in the XZ plane: cell `(0, 0)` sits
//! at the negative-X / negative-Z corner and indices grow towards positive X
//! and Z. A grid owns its cell storage exclusively; [`snapshot`] produces an
//! independent owner suitable for handing to a concurrently running search.
//!
//! [`snapshot`]: SpatialGrid::snapshot

use glam::Vec3;

use crate::cell::Cell;
use crate::coord::Coord;

/// A world-anchored grid of [`Cell`]s.
#[derive(Debug)]
pub struct SpatialGrid {
    world_offset: Vec3,
    width: i32,
    height: i32,
    cell_size: f32,
    cells: Vec<Cell>,
    released: bool,
}

impl SpatialGrid {
    /// Create a grid of `width * height` blocked cells anchored at
    /// `world_offset`. The builder collaborator populates cells afterwards
    /// via [`set_cell`](SpatialGrid::set_cell).
    pub fn new(world_offset: Vec3, width: i32, height: i32, cell_size: f32) -> Self {
        let len = (width.max(0) as usize) * (height.max(0) as usize);
        Self {
            world_offset,
            width: width.max(0),
            height: height.max(0),
            cell_size,
            cells: vec![Cell::default(); len],
            released: false,
        }
    }

    /// A degenerate empty grid (zero cell size). Never valid for searching;
    /// used as the scheduler's live grid before the first real update.
    pub fn empty() -> Self {
        Self::new(Vec3::ZERO, 0, 0, 0.0)
    }

    /// Grid width in cells.
    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Grid height in cells.
    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Edge length of one cell in world units.
    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// World-space anchor of the grid centre.
    #[inline]
    pub fn world_offset(&self) -> Vec3 {
        self.world_offset
    }

    /// Whether `c` addresses a cell of this grid.
    #[inline]
    pub fn contains(&self, c: Coord) -> bool {
        c.x >= 0 && c.x < self.width && c.y >= 0 && c.y < self.height
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> usize {
        (y * self.width + x) as usize
    }

    /// Read the cell at `(x, y)`.
    ///
    /// Bounds are the caller's responsibility: validate world positions with
    /// [`coordinate_of`](SpatialGrid::coordinate_of) first. Out-of-range
    /// indices (or a released grid) panic.
    #[inline]
    pub fn cell_at(&self, x: i32, y: i32) -> Cell {
        self.cells[self.index(x, y)]
    }

    /// Write the cell at `(x, y)`. Builder-facing; cells are immutable once
    /// a search has snapshotted the grid.
    #[inline]
    pub fn set_cell(&mut self, x: i32, y: i32, cell: Cell) {
        let i = self.index(x, y);
        self.cells[i] = cell;
    }

    /// World-space centre of cell `(x, y)`.
    ///
    /// The horizontal components depend only on grid geometry; the vertical
    /// component adds the height stored in the cell.
    pub fn cell_position(&self, x: i32, y: i32) -> Vec3 {
        let cell_height = self.cells[self.index(x, y)].height;
        Vec3::new(
            self.world_offset.x - (self.cell_size * self.width as f32 / 2.0)
                + x as f32 * self.cell_size
                + self.cell_size / 2.0,
            self.world_offset.y + cell_height,
            self.world_offset.z - (self.cell_size * self.height as f32 / 2.0)
                + y as f32 * self.cell_size
                + self.cell_size / 2.0,
        )
    }

    /// [`cell_position`](SpatialGrid::cell_position) by coordinate.
    #[inline]
    pub fn cell_position_at(&self, c: Coord) -> Vec3 {
        self.cell_position(c.x, c.y)
    }

    /// Map a world position to the grid coordinate containing it, or
    /// [`Coord::OUT_OF_BOUNDS`] when it falls outside
    /// `[0, width) x [0, height)`.
    ///
    /// Only the X and Z world components participate; height is ignored.
    pub fn coordinate_of(&self, world: Vec3) -> Coord {
        let local = world - self.world_offset;

        // Truncating casts, and integer halving of the extents, to keep the
        // mapping the exact inverse of `cell_position`.
        let x = (local.x / self.cell_size + (self.width / 2) as f32) as i32;
        let y = (local.z / self.cell_size + (self.height / 2) as f32) as i32;

        if x < 0 || x >= self.width || y < 0 || y >= self.height {
            return Coord::OUT_OF_BOUNDS;
        }
        Coord::new(x, y)
    }

    /// Produce an independent deep copy: new owned cell storage, same
    /// geometry. This is the ownership-transfer point for a search — the
    /// snapshot never observes later mutations of the source grid.
    pub fn snapshot(&self) -> SpatialGrid {
        SpatialGrid {
            world_offset: self.world_offset,
            width: self.width,
            height: self.height,
            cell_size: self.cell_size,
            cells: self.cells.clone(),
            released: self.released,
        }
    }

    /// Free the owned cell storage. Idempotent: releasing an
    /// already-released grid is a no-op. A released grid must not be read.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.cells = Vec::new();
        self.released = true;
    }

    /// Whether [`release`](SpatialGrid::release) has run.
    #[inline]
    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Whether the grid can back a search: unreleased, non-degenerate cell
    /// size, non-empty area.
    #[inline]
    pub fn is_valid(&self) -> bool {
        !self.released && self.cell_size > 0.0 && self.width > 0 && self.height > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_grid(width: i32, height: i32, cell_size: f32) -> SpatialGrid {
        let mut g = SpatialGrid::new(Vec3::ZERO, width, height, cell_size);
        for y in 0..height {
            for x in 0..width {
                g.set_cell(x, y, Cell::walkable());
            }
        }
        g
    }

    #[test]
    fn cell_position_round_trips_for_all_cells() {
        for (w, h, size) in [(10, 10, 1.0), (9, 7, 0.5), (4, 16, 2.5)] {
            let g = open_grid(w, h, size);
            for y in 0..h {
                for x in 0..w {
                    let p = g.cell_position(x, y);
                    assert_eq!(g.coordinate_of(p), Coord::new(x, y), "{w}x{h}@{size}");
                }
            }
        }
    }

    #[test]
    fn round_trip_with_world_offset() {
        let mut g = SpatialGrid::new(Vec3::new(100.0, 5.0, -40.0), 8, 8, 1.5);
        for y in 0..8 {
            for x in 0..8 {
                g.set_cell(x, y, Cell::new(0.25 * x as f32, true));
            }
        }
        for y in 0..8 {
            for x in 0..8 {
                assert_eq!(g.coordinate_of(g.cell_position(x, y)), Coord::new(x, y));
            }
        }
    }

    #[test]
    fn positions_outside_extent_map_to_sentinel() {
        let g = open_grid(10, 10, 1.0);
        // Grid spans [-5, 5) on both horizontal axes.
        assert_eq!(g.coordinate_of(Vec3::new(6.0, 0.0, 0.0)), Coord::OUT_OF_BOUNDS);
        assert_eq!(g.coordinate_of(Vec3::new(0.0, 0.0, -7.0)), Coord::OUT_OF_BOUNDS);
        assert_eq!(
            g.coordinate_of(Vec3::new(-100.0, 0.0, 100.0)),
            Coord::OUT_OF_BOUNDS
        );
    }

    #[test]
    fn height_is_ignored_when_resolving() {
        let mut g = open_grid(4, 4, 1.0);
        g.set_cell(2, 2, Cell::new(9.0, true));
        let p = g.cell_position(2, 2);
        assert_eq!(p.y, 9.0);
        assert_eq!(g.coordinate_of(p), Coord::new(2, 2));
    }

    #[test]
    fn snapshot_is_independent() {
        let mut g = open_grid(3, 3, 1.0);
        let snap = g.snapshot();
        g.set_cell(1, 1, Cell::blocked());
        g.release();
        assert!(snap.cell_at(1, 1).walkable);
        assert!(snap.is_valid());
    }

    #[test]
    fn release_is_idempotent() {
        let mut g = open_grid(3, 3, 1.0);
        g.release();
        g.release();
        assert!(g.is_released());
        assert!(!g.is_valid());
    }

    #[test]
    fn degenerate_grids_are_invalid() {
        assert!(!SpatialGrid::empty().is_valid());
        assert!(!SpatialGrid::new(Vec3::ZERO, 10, 10, 0.0).is_valid());
        assert!(open_grid(2, 2, 1.0).is_valid());
    }
}
