use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two sides of a Connect-Four game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Player {
    Player1,
    Player2,
}

/// Occupancy of a single grid cell. `None` is an empty cell.
pub type Cell = Option<Player>;

impl Player {
    pub fn opponent(self) -> Player {
        match self {
            Player::Player1 => Player::Player2,
            Player::Player2 => Player::Player1,
        }
    }

    /// +1 for the first player, -1 for the second.
    pub fn sign(self) -> f32 {
        match self {
            Player::Player1 => 1.0,
            Player::Player2 => -1.0,
        }
    }

    /// Two-bit code used when packing cells into a [`StateKey`](crate::game::state::StateKey).
    pub(crate) fn code(cell: Cell) -> u128 {
        match cell {
            None => 0,
            Some(Player::Player1) => 1,
            Some(Player::Player2) => 2,
        }
    }

    pub(crate) fn symbol(cell: Cell) -> char {
        match cell {
            None => '.',
            Some(Player::Player1) => 'X',
            Some(Player::Player2) => 'O',
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::Player1 => write!(f, "Player1"),
            Player::Player2 => write!(f, "Player2"),
        }
    }
}

impl std::str::FromStr for Player {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Player1" | "1" => Ok(Player::Player1),
            "Player2" | "2" => Ok(Player::Player2),
            other => Err(format!("unknown player '{}'", other)),
        }
    }
}
