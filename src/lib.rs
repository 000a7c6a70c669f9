//! # Connect-Four Zero
//!
//! Search core of an AlphaZero-style Connect-Four engine.
//!
//! ## Features
//!
//! - **Game Engine**: 6x7 board model with gravity moves and win/draw detection
//! - **MCTS Engine**: PUCT search over a transposition table keyed by board state
//! - **Neural Integration**: predictor abstraction, tensor encoding, TorchScript models
//! - **Self-Play**: game generation with Dirichlet root noise and CSV recording
//!
//! ## Usage
//!
//! ```rust,no_run
//! use connect4_zero::{GameBoard, MCTS, UniformPredictor};
//!
//! let board = GameBoard::new();
//! let mut mcts = MCTS::new(1.0);
//! let result = mcts
//!     .search(&board.get_state(), board.get_current_turn(), &UniformPredictor, 100, None)
//!     .unwrap();
//! println!("best column: {:?}", result.best_column);
//! ```

// ============================================================================
// PUBLIC API MODULES
// ============================================================================

/// Board model and rules
pub mod game;

/// Monte Carlo Tree Search engine
pub mod mcts;

/// Predictor abstraction and tensor interop
pub mod neural;

/// CSV export of self-play data
pub mod recording;

/// Self-play game generation
pub mod training;

/// Utility functions and helpers
pub mod utils;

/// Logger configuration
pub mod logging;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

pub use game::*;

pub use mcts::*;

pub use neural::*;

pub use training::*;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Main error type for the Connect-Four library
#[derive(Debug, thiserror::Error)]
pub enum Connect4Error {
    #[error("column {0} is out of range")]
    ColumnOutOfRange(usize),

    #[error("column {0} is full")]
    ColumnFull(usize),

    #[error("game is already over")]
    GameOver,

    #[error("malformed prediction: {0}")]
    MalformedPrediction(String),

    #[error("invalid Dirichlet parameters: {0}")]
    InvalidDirichlet(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("invalid record: {0}")]
    InvalidRecord(String),

    #[error("Torch error: {0}")]
    Torch(#[from] tch::TchError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Connect4Error>;

// ============================================================================
// LIBRARY VERSION INFO
// ============================================================================

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Library description
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
