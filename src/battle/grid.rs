//! Battlefield occupancy grid
//!
//! Row-major, one troop per cell. The grid does no bounds policing of its
//! own beyond refusing out-of-range cells; deciding who may stand where is
//! the battle's job.

use serde::{Deserialize, Serialize};

use crate::core::types::{Position, Side, TroopId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Option<TroopId>>,
}

impl Grid {
    /// Create an empty grid
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![None; rows * cols],
        }
    }

    /// Rebuild a grid from troop positions
    pub fn rebuild(
        rows: usize,
        cols: usize,
        placements: impl IntoIterator<Item = (TroopId, Position)>,
    ) -> Self {
        let mut grid = Self::new(rows, cols);
        for (troop, position) in placements {
            grid.place(troop, position);
        }
        grid
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn contains(&self, position: Position) -> bool {
        position.row < self.rows && position.col < self.cols
    }

    fn index(&self, position: Position) -> Option<usize> {
        self.contains(position)
            .then(|| position.row * self.cols + position.col)
    }

    pub fn occupant(&self, position: Position) -> Option<TroopId> {
        self.index(position).and_then(|i| self.cells[i])
    }

    pub fn place(&mut self, troop: TroopId, position: Position) {
        if let Some(i) = self.index(position) {
            self.cells[i] = Some(troop);
        }
    }

    pub fn clear(&mut self, position: Position) {
        if let Some(i) = self.index(position) {
            self.cells[i] = None;
        }
    }

    /// Clear the cell only if `troop` is the one standing there
    pub fn vacate(&mut self, troop: TroopId, position: Position) {
        if self.occupant(position) == Some(troop) {
            self.clear(position);
        }
    }

    /// Which side may deploy into a column
    ///
    /// West owns `[0, cols/2)`, East owns `(cols/2, cols)`; the column at
    /// `cols/2` is neutral.
    pub fn territory(&self, col: usize) -> Option<Side> {
        let middle = self.cols / 2;
        if col < middle {
            Some(Side::West)
        } else if col > middle && col < self.cols {
            Some(Side::East)
        } else {
            None
        }
    }

    /// Every occupied cell, row by row
    pub fn occupied(&self) -> impl Iterator<Item = (Position, TroopId)> + '_ {
        self.cells.iter().enumerate().filter_map(move |(i, cell)| {
            cell.map(|troop| (Position::new(i / self.cols, i % self.cols), troop))
        })
    }

    /// One row of cells, left to right
    pub fn row(&self, row: usize) -> &[Option<TroopId>] {
        if row < self.rows {
            &self.cells[row * self.cols..(row + 1) * self.cols]
        } else {
            &[]
        }
    }
}
