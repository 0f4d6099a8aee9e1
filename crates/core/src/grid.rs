//! Fixed-size cell grid; the only post-generation mutation is Item -> Open on pickup.

use serde::{Deserialize, Serialize};

use crate::types::{Cell, GRID_HEIGHT, GRID_WIDTH, Pos};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    cells: Vec<Cell>,
}

impl Grid {
    /// An all-open grid with the outer ring walled.
    pub fn bordered() -> Self {
        let mut cells = vec![Cell::Open; GRID_WIDTH * GRID_HEIGHT];
        for x in 0..GRID_WIDTH {
            cells[x] = Cell::Wall;
            cells[(GRID_HEIGHT - 1) * GRID_WIDTH + x] = Cell::Wall;
        }
        for y in 0..GRID_HEIGHT {
            cells[y * GRID_WIDTH] = Cell::Wall;
            cells[y * GRID_WIDTH + (GRID_WIDTH - 1)] = Cell::Wall;
        }
        Self { cells }
    }

    /// Out-of-bounds positions read as Wall so callers need no separate bounds check.
    pub fn cell_at(&self, pos: Pos) -> Cell {
        if !Self::in_bounds(pos) {
            return Cell::Wall;
        }
        self.cells[Self::index(pos)]
    }

    pub fn set_cell(&mut self, pos: Pos, cell: Cell) {
        if Self::in_bounds(pos) {
            let index = Self::index(pos);
            self.cells[index] = cell;
        }
    }

    pub fn in_bounds(pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < GRID_WIDTH && (pos.y as usize) < GRID_HEIGHT
    }

    pub fn is_walkable(&self, pos: Pos) -> bool {
        self.cell_at(pos) != Cell::Wall
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    fn index(pos: Pos) -> usize {
        (pos.y as usize) * GRID_WIDTH + (pos.x as usize)
    }
}
