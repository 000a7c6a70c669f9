use crate::game::player::{Cell, Player};

pub const ROWS: usize = 6;
pub const COLS: usize = 7;

/// Compact, hashable key for a (grid, player to move) pair.
///
/// Layout (low -> high bits): 42 cells in row-major order, 2 bits each, then
/// one bit for the player to move at bit 84. Distinct pairs never collide.
pub type StateKey = u128;

const TURN_BIT: u32 = (ROWS * COLS * 2) as u32;

/// A 6x7 Connect-Four grid. Row 0 is the top row.
///
/// Ordering is lexicographic over the cells in row-major order, so two states
/// compare equal exactly when every cell matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct State {
    cells: [[Cell; COLS]; ROWS],
}

impl Default for State {
    fn default() -> Self {
        Self::empty()
    }
}

impl State {
    pub fn empty() -> Self {
        State {
            cells: [[None; COLS]; ROWS],
        }
    }

    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    pub(crate) fn set(&mut self, row: usize, col: usize, player: Player) {
        self.cells[row][col] = Some(player);
    }

    /// Lowest empty row of `col`, if the column is not full.
    pub fn drop_row(&self, col: usize) -> Option<usize> {
        (0..ROWS).rev().find(|&row| self.cells[row][col].is_none())
    }

    pub fn is_column_full(&self, col: usize) -> bool {
        self.cells[0][col].is_some()
    }

    pub fn piece_count(&self) -> usize {
        self.iter_cells().filter(|cell| cell.is_some()).count()
    }

    /// Cells in row-major order.
    pub fn iter_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells.iter().flat_map(|row| row.iter().copied())
    }

    /// Rebuilds a grid from 42 row-major cells.
    pub fn from_cells(cells: &[Cell]) -> Option<Self> {
        if cells.len() != ROWS * COLS {
            return None;
        }
        let mut state = State::empty();
        for (idx, cell) in cells.iter().enumerate() {
            state.cells[idx / COLS][idx % COLS] = *cell;
        }
        Some(state)
    }

    pub fn key(&self, turn: Player) -> StateKey {
        let mut key: StateKey = 0;
        for (idx, cell) in self.iter_cells().enumerate() {
            key |= Player::code(cell) << (2 * idx);
        }
        if turn == Player::Player2 {
            key |= 1 << TURN_BIT;
        }
        key
    }
}
