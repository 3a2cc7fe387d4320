//! The [`Cell`] type — one grid unit's walkability and height data.

/// Per-cell data sampled by the grid builder.
///
/// Cells are written once when the grid is built and never mutated during a
/// search.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    /// Vertical offset of the cell surface above the grid's world offset.
    pub height: f32,
    /// Whether an agent may stand on / traverse this cell.
    pub walkable: bool,
}

impl Cell {
    /// Create a new cell.
    #[inline]
    pub const fn new(height: f32, walkable: bool) -> Self {
        Self { height, walkable }
    }

    /// A flat walkable cell (builder convenience).
    #[inline]
    pub const fn walkable() -> Self {
        Self {
            height: 0.0,
            walkable: true,
        }
    }

    /// A flat blocked cell.
    #[inline]
    pub const fn blocked() -> Self {
        Self {
            height: 0.0,
            walkable: false,
        }
    }
}
