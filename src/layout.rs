//! Toroidal chamber grid topology.
//!
//! Chambers are laid out row-major, `chambers_per_row` per row, and the
//! total count is rounded up so every row is full. The grid wraps on both
//! axes: stepping right off the end of a row lands on its first cell, and
//! stepping up from the top row lands on the bottom row. Padded slots
//! (beyond the registered chamber count) are navigable but run no program.

/// Derived view over the chamber list defining the torus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChamberLayout {
    num_chambers: usize,
    chambers_per_row: usize,
}

impl ChamberLayout {
    /// Build the layout for `registered` chambers at the given row width.
    /// The chamber count is rounded up to a multiple of the row width.
    pub fn new(registered: usize, chambers_per_row: usize) -> Self {
        let row = chambers_per_row.max(1);
        let num_chambers = (registered + row - 1) / row * row;
        Self {
            num_chambers,
            chambers_per_row: row,
        }
    }

    /// Padded chamber count (a multiple of the row width).
    pub fn num_chambers(&self) -> usize {
        self.num_chambers
    }

    pub fn chambers_per_row(&self) -> usize {
        self.chambers_per_row
    }

    /// Cell to the left of `id`, wrapping within the row.
    pub fn left(&self, id: usize) -> usize {
        let row = self.chambers_per_row;
        if id % row == 0 {
            (id + row - 1) % self.num_chambers
        } else {
            id - 1
        }
    }

    /// Cell to the right of `id`, wrapping within the row.
    pub fn right(&self, id: usize) -> usize {
        let row = self.chambers_per_row;
        if (id + 1) % row == 0 {
            (id + 1 - row) % self.num_chambers
        } else {
            id + 1
        }
    }

    /// Cell above `id`, wrapping from the top row to the bottom row.
    pub fn up(&self, id: usize) -> usize {
        let row = self.chambers_per_row;
        if id < row {
            id + self.num_chambers.max(row) - row
        } else {
            id - row
        }
    }

    /// Cell below `id`, wrapping from the bottom row to the top row.
    pub fn down(&self, id: usize) -> usize {
        (id + self.chambers_per_row) % self.num_chambers
    }
}
