//! Connect-Four board: gravity moves, legality queries and win/draw detection.

use crate::game::player::{Cell, Player};
use crate::game::state::{State, StateKey, COLS, ROWS};
use crate::{Connect4Error, Result};
use std::fmt;

/// Number of planes produced by [`GameBoard::encode_planes`].
pub const ENCODING_PLANES: usize = 2;

/// (row delta, column delta) for horizontal, vertical and both diagonals.
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

const CONNECT: isize = 4;

/// Snapshot returned by a successful move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveResult {
    pub state: State,
    pub done: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameBoard {
    state: State,
    turn: Player,
    done: bool,
}

impl Default for GameBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl GameBoard {
    /// Empty board with `Player1` to move.
    pub fn new() -> Self {
        Self::with_turn(Player::Player1)
    }

    pub fn with_turn(turn: Player) -> Self {
        GameBoard {
            state: State::empty(),
            turn,
            done: false,
        }
    }

    /// Forks a board from an existing position, e.g. for lookahead during search.
    pub fn from_state(state: State, turn: Player) -> Self {
        let mut board = GameBoard {
            state,
            turn,
            done: false,
        };
        board.done = board.check_done();
        board
    }

    /// Drops a piece for the player to move and passes the turn.
    pub fn make_move(&mut self, col: usize) -> Result<MoveResult> {
        let result = self.make_move_as(col, self.turn)?;
        self.turn = self.turn.opponent();
        Ok(result)
    }

    /// Drops a piece for `player` without touching the turn marker.
    ///
    /// The board is left unchanged when the move is rejected.
    pub fn make_move_as(&mut self, col: usize, player: Player) -> Result<MoveResult> {
        if col >= COLS {
            return Err(Connect4Error::ColumnOutOfRange(col));
        }
        if self.done {
            return Err(Connect4Error::GameOver);
        }
        let row = self
            .state
            .drop_row(col)
            .ok_or(Connect4Error::ColumnFull(col))?;

        self.state.set(row, col, player);
        self.done = self.check_done();

        Ok(MoveResult {
            state: self.state,
            done: self.done,
        })
    }

    /// Columns whose top cell is occupied.
    pub fn invalid_actions(&self) -> Vec<usize> {
        (0..COLS).filter(|&c| self.state.is_column_full(c)).collect()
    }

    pub fn invalid_actions_count(&self) -> usize {
        (0..COLS).filter(|&c| self.state.is_column_full(c)).count()
    }

    /// Columns that still accept a piece.
    pub fn possible_moves(&self) -> Vec<usize> {
        (0..COLS).filter(|&c| !self.state.is_column_full(c)).collect()
    }

    pub fn possible_moves_count(&self) -> usize {
        (0..COLS).filter(|&c| !self.state.is_column_full(c)).count()
    }

    pub fn legal_mask(&self) -> [bool; COLS] {
        let mut mask = [false; COLS];
        for (col, legal) in mask.iter_mut().enumerate() {
            *legal = !self.state.is_column_full(col);
        }
        mask
    }

    /// True iff `player` owns four contiguous cells in any direction.
    pub fn check_won(&self, player: Player) -> bool {
        let target: Cell = Some(player);
        for row in 0..ROWS {
            for col in 0..COLS {
                if self.state.get(row, col) != target {
                    continue;
                }
                for &(dr, dc) in &DIRECTIONS {
                    if self.run_length(row, col, dr, dc, target) >= CONNECT {
                        return true;
                    }
                }
            }
        }
        false
    }

    fn run_length(&self, row: usize, col: usize, dr: isize, dc: isize, target: Cell) -> isize {
        let mut length = 0;
        let (mut r, mut c) = (row as isize, col as isize);
        while length < CONNECT
            && (0..ROWS as isize).contains(&r)
            && (0..COLS as isize).contains(&c)
            && self.state.get(r as usize, c as usize) == target
        {
            length += 1;
            r += dr;
            c += dc;
        }
        length
    }

    /// True iff someone has won or the grid is full.
    pub fn check_done(&self) -> bool {
        self.check_won(Player::Player1)
            || self.check_won(Player::Player2)
            || self.possible_moves_count() == 0
    }

    /// Cached terminal flag, kept in sync by every move.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// The winning player, or `None` for a draw or an unfinished game.
    pub fn winner(&self) -> Option<Player> {
        [Player::Player1, Player::Player2]
            .into_iter()
            .find(|&p| self.check_won(p))
    }

    pub fn get_state(&self) -> State {
        self.state
    }

    pub fn get_current_turn(&self) -> Player {
        self.turn
    }

    pub fn ply_count(&self) -> usize {
        self.state.piece_count()
    }

    /// Transposition key for this position and player to move.
    pub fn key(&self) -> StateKey {
        self.state.key(self.turn)
    }

    /// Two 6x7 planes, channel-major: plane 0 holds the pieces of the player to
    /// move, plane 1 the opponent's. Depends only on the grid and the turn.
    pub fn encode_planes(&self) -> Vec<f32> {
        let plane = ROWS * COLS;
        let mut planes = vec![0.0f32; ENCODING_PLANES * plane];
        for (idx, cell) in self.state.iter_cells().enumerate() {
            match cell {
                Some(p) if p == self.turn => planes[idx] = 1.0,
                Some(_) => planes[plane + idx] = 1.0,
                None => {}
            }
        }
        planes
    }
}

impl fmt::Display for GameBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..ROWS {
            let line: Vec<String> = (0..COLS)
                .map(|col| Player::symbol(self.state.get(row, col)).to_string())
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        let footer: Vec<String> = (0..COLS).map(|c| c.to_string()).collect();
        write!(f, "{}", footer.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn play_all(board: &mut GameBoard, cols: &[usize]) {
        for &col in cols {
            board.make_move(col).unwrap();
        }
    }

    /// Fills all 42 cells without either side lining up four.
    fn drawn_board() -> GameBoard {
        let mut board = GameBoard::new();
        let order = [0, 1, 0, 1, 0, 1, 1, 0, 1, 0, 1, 0, 2, 3, 2, 3, 2, 3, 3, 2, 3, 2, 3, 2, 4, 5, 4, 5, 4, 5, 5, 4, 5, 4, 5, 4, 6, 6, 6, 6, 6, 6];
        play_all(&mut board, &order);
        board
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = GameBoard::new();
        assert_eq!(board.get_current_turn(), Player::Player1);
        assert!(!board.is_done());
        assert_eq!(board.possible_moves(), (0..COLS).collect::<Vec<_>>());
        assert!(board.invalid_actions().is_empty());
        assert_eq!(board.winner(), None);
    }

    #[test]
    fn test_gravity_places_lowest_row() {
        let mut board = GameBoard::new();
        for expected_row in (0..ROWS).rev() {
            let result = board.make_move(2).unwrap();
            assert!(result.state.get(expected_row, 2).is_some());
            if expected_row > 0 {
                assert!(result.state.get(expected_row - 1, 2).is_none());
            }
        }
        assert_eq!(board.invalid_actions(), vec![2]);
        assert_eq!(board.possible_moves_count(), COLS - 1);
        assert_matches!(board.make_move(2), Err(Connect4Error::ColumnFull(2)));
    }

    #[test]
    fn test_turn_alternates() {
        let mut board = GameBoard::new();
        board.make_move(0).unwrap();
        assert_eq!(board.get_current_turn(), Player::Player2);
        board.make_move(0).unwrap();
        assert_eq!(board.get_current_turn(), Player::Player1);
    }

    #[test]
    fn test_make_move_as_keeps_turn() {
        let mut board = GameBoard::new();
        let result = board.make_move_as(4, Player::Player2).unwrap();
        assert_eq!(result.state.get(ROWS - 1, 4), Some(Player::Player2));
        assert_eq!(board.get_current_turn(), Player::Player1);
    }

    #[test]
    fn test_out_of_range_leaves_board_unchanged() {
        let mut board = GameBoard::new();
        board.make_move(3).unwrap();
        let before = board.clone();
        assert_matches!(board.make_move(7), Err(Connect4Error::ColumnOutOfRange(7)));
        assert_eq!(board, before);
    }

    #[test]
    fn test_vertical_win_after_fourth_piece() {
        let mut board = GameBoard::new();
        // Player1 stacks column 3, Player2 answers in column 0 without blocking.
        for i in 0..3 {
            board.make_move(3).unwrap();
            assert!(!board.check_won(Player::Player1), "won too early at {}", i);
            board.make_move(0).unwrap();
        }
        let result = board.make_move(3).unwrap();
        assert!(result.done);
        assert!(board.check_won(Player::Player1));
        assert!(board.check_done());
        assert_eq!(board.winner(), Some(Player::Player1));
        assert_matches!(board.make_move(1), Err(Connect4Error::GameOver));
    }

    #[test]
    fn test_horizontal_win_on_edge() {
        let mut board = GameBoard::new();
        play_all(&mut board, &[3, 3, 4, 4, 5, 5]);
        assert!(!board.is_done());
        board.make_move(6).unwrap();
        assert_eq!(board.winner(), Some(Player::Player1));
    }

    #[test]
    fn test_diagonal_wins() {
        // rising diagonal from bottom-left corner
        let mut board = GameBoard::new();
        play_all(&mut board, &[0, 1, 1, 2, 2, 3, 2, 3, 3, 5, 3]);
        assert!(board.check_won(Player::Player1));

        // falling diagonal ending in bottom-right corner
        let mut board = GameBoard::new();
        play_all(&mut board, &[6, 5, 5, 4, 4, 3, 4, 3, 3, 1, 3]);
        assert!(board.check_won(Player::Player1));
    }

    #[test]
    fn test_full_board_draw() {
        let board = drawn_board();
        assert!(board.check_done());
        assert!(board.is_done());
        assert_eq!(board.possible_moves_count(), 0);
        assert_eq!(board.invalid_actions_count(), COLS);
        assert_eq!(board.winner(), None);
    }

    #[test]
    fn test_moves_partition_columns() {
        let mut board = GameBoard::new();
        play_all(&mut board, &[1, 1, 1, 1, 1, 1, 5, 5, 5]);
        let mut all: Vec<usize> = board.possible_moves();
        all.extend(board.invalid_actions());
        all.sort_unstable();
        assert_eq!(all, (0..COLS).collect::<Vec<_>>());
        assert!(!board.legal_mask()[1]);
    }

    #[test]
    fn test_from_state_recomputes_done() {
        let board = drawn_board();
        let forked = GameBoard::from_state(board.get_state(), Player::Player1);
        assert!(forked.is_done());

        let fresh = GameBoard::from_state(State::empty(), Player::Player2);
        assert!(!fresh.is_done());
        assert_eq!(fresh.get_current_turn(), Player::Player2);
    }

    #[test]
    fn test_encoding_is_relative_to_player_to_move() {
        let mut board = GameBoard::new();
        board.make_move(0).unwrap();
        let planes = board.encode_planes();
        let bottom_left = (ROWS - 1) * COLS;
        assert_eq!(planes.len(), ENCODING_PLANES * ROWS * COLS);
        // Player2 to move, so Player1's piece sits in the opponent plane
        assert_eq!(planes[bottom_left], 0.0);
        assert_eq!(planes[ROWS * COLS + bottom_left], 1.0);
        assert_eq!(planes, board.encode_planes());
    }

    #[test]
    fn test_display() {
        let mut board = GameBoard::new();
        board.make_move(0).unwrap();
        board.make_move(6).unwrap();
        let rendered = board.to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), ROWS + 1);
        assert_eq!(lines[ROWS - 1], "X . . . . . O");
        assert_eq!(lines[ROWS], "0 1 2 3 4 5 6");
    }
}
