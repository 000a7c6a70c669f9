use crate::game::game_board::GameBoard;
use crate::game::player::Player;
use crate::game::state::{State, COLS};

/// One edge taken during selection: the position, who was to move there and
/// the column that was played.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathStep {
    pub state: State,
    pub player: Player,
    pub column: usize,
}

/// Outcome of a selection descent.
#[derive(Debug, Clone)]
pub struct LeafResult {
    /// Position where the descent stopped.
    pub board: GameBoard,
    /// Game outcome from the perspective of `board`'s player to move, when terminal.
    pub value: Option<f32>,
    /// Edges taken from the root, in order.
    pub path: Vec<PathStep>,
}

impl LeafResult {
    pub fn is_terminal(&self) -> bool {
        self.value.is_some()
    }

    pub fn current_state(&self) -> State {
        self.board.get_state()
    }

    pub fn current_player(&self) -> Player {
        self.board.get_current_turn()
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }
}

/// Root summary after a batch of simulations.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub visit_counts: [u32; COLS],
    /// Visit counts normalised over legal columns (temperature 1).
    pub policy: [f32; COLS],
    /// Visit-weighted mean of the root edge values, for the player to move.
    pub root_value: f32,
    /// Greedy choice; `None` only when the root is terminal.
    pub best_column: Option<usize>,
    pub simulations: usize,
}
