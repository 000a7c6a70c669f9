//! Self-play game generation.
//!
//! Each game owns one search engine. Every ply records the root visit policy,
//! and once the game ends each record is labelled with the final outcome from
//! the perspective of the player who was to move.

use crate::game::game_board::GameBoard;
use crate::game::player::Player;
use crate::game::state::{State, COLS};
use crate::mcts::algorithm::{RootNoise, MCTS};
use crate::mcts::hyperparameters::MCTSHyperparameters;
use crate::mcts::selection::sample_column;
use crate::neural::predictor::Predictor;
use crate::{Connect4Error, Result};
use rand::rngs::StdRng;

/// One training target: position, search policy and eventual outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingExample {
    pub state: State,
    pub player: Player,
    pub policy: [f32; COLS],
    /// +1 if `player` went on to win, -1 if it lost, 0 for a draw.
    pub outcome: f32,
}

#[derive(Debug, Clone)]
pub struct GameRecord {
    pub game_id: usize,
    pub moves: Vec<usize>,
    pub winner: Option<Player>,
    pub examples: Vec<TrainingExample>,
}

impl GameRecord {
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

fn outcome_for(player: Player, winner: Option<Player>) -> f32 {
    match winner {
        Some(w) if w == player => 1.0,
        Some(_) => -1.0,
        None => 0.0,
    }
}

/// Plays one full game of the engine against itself.
pub fn play_game<P: Predictor + ?Sized>(
    predictor: &P,
    params: &MCTSHyperparameters,
    rng: &mut StdRng,
    game_id: usize,
) -> Result<GameRecord> {
    params.validate()?;

    let mut board = GameBoard::new();
    let mut mcts = MCTS::from_hyperparameters(params);
    let mut moves = Vec::new();
    let mut examples = Vec::new();

    while !board.is_done() {
        let state = board.get_state();
        let player = board.get_current_turn();
        let ply = moves.len();

        let root_noise = if params.uses_root_noise() {
            Some(RootNoise::sample(
                params.dirichlet_alpha,
                params.dirichlet_epsilon,
                rng,
            )?)
        } else {
            None
        };

        mcts.search(
            &state,
            player,
            predictor,
            params.num_simulations,
            root_noise.as_ref(),
        )?;

        let temperature = params.temperature_at(ply);
        let policy = mcts.policy(&state, player, temperature)?;
        let column = if temperature > 0.0 {
            sample_column(&policy, rng).ok_or(Connect4Error::GameOver)?
        } else {
            mcts.best_column(&state, player)?
        };

        examples.push(TrainingExample {
            state,
            player,
            policy: mcts.policy(&state, player, 1.0)?,
            outcome: 0.0,
        });
        board.make_move(column)?;
        moves.push(column);

        if !params.reuse_tree {
            mcts.clear();
        }
    }

    let winner = board.winner();
    for example in &mut examples {
        example.outcome = outcome_for(example.player, winner);
    }

    log::info!(
        "game {} finished after {} plies, winner {:?}, table size {}",
        game_id,
        moves.len(),
        winner,
        mcts.size()
    );

    Ok(GameRecord {
        game_id,
        moves,
        winner,
        examples,
    })
}
