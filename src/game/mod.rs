pub mod game_board;
pub mod player;
pub mod state;

pub use game_board::{GameBoard, MoveResult};
pub use player::{Cell, Player};
pub use state::{State, StateKey, COLS, ROWS};
