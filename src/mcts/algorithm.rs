//! Core Monte Carlo Tree Search engine.
//!
//! Statistics live in a flat transposition table keyed by (grid, player to move)
//! instead of a pointer-based tree, so move orders that reach the same position
//! share one entry. Each simulation descends with PUCT through expanded
//! positions, expands the first unexpanded one with the predictor (or scores a
//! terminal position directly) and backs the value up the path it took.
//!
//! Value convention: every value is expressed from the perspective of the player
//! to move at the position it describes. During backpropagation an edge is
//! credited `v` if its mover is the leaf's player to move and `-v` otherwise.
use crate::game::game_board::GameBoard;
use crate::game::player::Player;
use crate::game::state::{State, StateKey, COLS};
use crate::mcts::hyperparameters::MCTSHyperparameters;
use crate::mcts::mcts_result::{LeafResult, PathStep, SearchResult};
use crate::mcts::node::NodeStats;
use crate::mcts::selection::{argmax_legal, select_column, visit_policy};
use crate::neural::predictor::{mask_prior, Predictor};
use crate::utils::dirichlet::dirichlet_noise;
use crate::{Connect4Error, Result};
use rand::rngs::StdRng;
use std::collections::HashMap;

/// Dirichlet noise mixed into the root prior during selection.
///
/// The stored priors are never modified; the mix only affects which edge is
/// chosen at depth 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootNoise {
    pub noise: [f32; COLS],
    pub epsilon: f32,
}

impl RootNoise {
    pub fn new(noise: [f32; COLS], epsilon: f32) -> Self {
        RootNoise { noise, epsilon }
    }

    /// Draws symmetric Dirichlet(alpha) noise.
    pub fn sample(alpha: f64, epsilon: f32, rng: &mut StdRng) -> Result<Self> {
        Ok(RootNoise::new(dirichlet_noise(alpha, rng)?, epsilon))
    }

    /// `(1 - ε)·P + ε·η`
    pub fn mix(&self, prior: &[f32; COLS]) -> [f32; COLS] {
        let mut mixed = [0.0f32; COLS];
        for (col, value) in mixed.iter_mut().enumerate() {
            *value = (1.0 - self.epsilon) * prior[col] + self.epsilon * self.noise[col];
        }
        mixed
    }
}

/// Game outcome for the player to move on a finished board.
///
/// The previous mover is the only one who can have completed a line, so a
/// decided game is always a loss for the player to move.
pub fn terminal_value(board: &GameBoard) -> f32 {
    match board.winner() {
        Some(winner) if winner == board.get_current_turn() => 1.0,
        Some(_) => -1.0,
        None => 0.0,
    }
}

#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone)]
pub struct MCTS {
    c_puct: f32,
    table: HashMap<StateKey, NodeStats>,
}

impl Default for MCTS {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl MCTS {
    pub fn new(c_puct: f32) -> Self {
        MCTS {
            c_puct,
            table: HashMap::new(),
        }
    }

    pub fn from_hyperparameters(params: &MCTSHyperparameters) -> Self {
        Self::new(params.c_puct)
    }

    pub fn c_puct(&self) -> f32 {
        self.c_puct
    }

    /// Drops every statistics entry.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Number of distinct positions in the table.
    pub fn size(&self) -> usize {
        self.table.len()
    }

    pub fn is_leaf(&self, state: &State, player: Player) -> bool {
        !self.table.contains_key(&state.key(player))
    }

    pub fn stats(&self, state: &State, player: Player) -> Option<&NodeStats> {
        self.table.get(&state.key(player))
    }

    pub fn entries(&self) -> impl Iterator<Item = (&StateKey, &NodeStats)> {
        self.table.iter()
    }

    /// Visit counts of the edges leaving a position, zero if unexpanded.
    pub fn visit_counts(&self, state: &State, player: Player) -> [u32; COLS] {
        self.stats(state, player)
            .map(|node| *node.visit_count())
            .unwrap_or([0; COLS])
    }

    pub fn value_averages(&self, state: &State, player: Player) -> [f32; COLS] {
        self.stats(state, player)
            .map(|node| *node.value_avg())
            .unwrap_or([0.0; COLS])
    }

    pub fn priors(&self, state: &State, player: Player) -> Option<[f32; COLS]> {
        self.stats(state, player).map(|node| *node.prior())
    }

    /// Descends from `state` with `player` to move until a terminal or
    /// unexpanded position is reached. Does not modify the table.
    pub fn find_leaf(&self, state: &State, player: Player) -> Result<LeafResult> {
        self.find_leaf_with_noise(state, player, None)
    }

    pub fn find_leaf_with_noise(
        &self,
        state: &State,
        player: Player,
        root_noise: Option<&RootNoise>,
    ) -> Result<LeafResult> {
        let mut board = GameBoard::from_state(*state, player);
        let mut path = Vec::new();

        loop {
            if board.is_done() {
                let value = terminal_value(&board);
                return Ok(LeafResult {
                    board,
                    value: Some(value),
                    path,
                });
            }

            let Some(node) = self.table.get(&board.key()) else {
                return Ok(LeafResult {
                    board,
                    value: None,
                    path,
                });
            };

            let legal = board.legal_mask();
            let prior = match root_noise {
                Some(noise) if path.is_empty() => noise.mix(node.prior()),
                _ => *node.prior(),
            };
            let column =
                select_column(node, &prior, &legal, self.c_puct).ok_or(Connect4Error::GameOver)?;

            path.push(PathStep {
                state: board.get_state(),
                player: board.get_current_turn(),
                column,
            });
            board.make_move(column)?;
        }
    }

    /// Creates the statistics entry for `board` with a legality-masked prior.
    ///
    /// Returns `false` when the position is terminal or already expanded; an
    /// existing prior is never overwritten.
    pub fn expand(&mut self, board: &GameBoard, prior: &[f32; COLS]) -> bool {
        if board.is_done() {
            return false;
        }
        let key = board.key();
        if self.table.contains_key(&key) {
            return false;
        }
        let masked = mask_prior(prior, &board.legal_mask());
        self.table.insert(key, NodeStats::new(masked));
        true
    }

    /// Credits `value` (from the leaf's player-to-move perspective) to every
    /// edge on the path, flipping sign for the other player's edges.
    pub fn backpropagate(&mut self, leaf: &LeafResult, value: f32) {
        let leaf_player = leaf.current_player();
        for step in leaf.path.iter().rev() {
            let credited = if step.player == leaf_player {
                value
            } else {
                -value
            };
            if let Some(node) = self.table.get_mut(&step.state.key(step.player)) {
                node.record(step.column, credited);
            }
        }
    }

    /// Runs one select → expand/score → backpropagate pass and returns the
    /// backed-up leaf value.
    ///
    /// A predictor failure aborts the simulation before the table is touched.
    pub fn simulate<P: Predictor + ?Sized>(
        &mut self,
        state: &State,
        player: Player,
        predictor: &P,
        root_noise: Option<&RootNoise>,
    ) -> Result<f32> {
        let leaf = self.find_leaf_with_noise(state, player, root_noise)?;

        let value = match leaf.value {
            Some(value) => value,
            None => {
                let (prior, value) = predictor.predict(&leaf.board)?.validate()?;
                self.expand(&leaf.board, &prior);
                value
            }
        };

        self.backpropagate(&leaf, value);
        Ok(value)
    }

    /// Runs `simulations` passes from the root and summarises its statistics.
    pub fn search<P: Predictor + ?Sized>(
        &mut self,
        state: &State,
        player: Player,
        predictor: &P,
        simulations: usize,
        root_noise: Option<&RootNoise>,
    ) -> Result<SearchResult> {
        for _ in 0..simulations {
            self.simulate(state, player, predictor, root_noise)?;
        }

        let result = self.summarize(state, player, simulations)?;
        log::debug!(
            "search: {} simulations, table size {}, visits {:?}, best {:?}, value {:.3}",
            simulations,
            self.size(),
            result.visit_counts,
            result.best_column,
            result.root_value
        );
        Ok(result)
    }

    /// Root summary without running further simulations.
    pub fn summarize(&self, state: &State, player: Player, simulations: usize) -> Result<SearchResult> {
        let board = GameBoard::from_state(*state, player);
        let visit_counts = self.visit_counts(state, player);

        let root_value = match self.stats(state, player) {
            Some(node) if node.total_visits() > 0 => {
                node.value_sum().iter().sum::<f32>() / node.total_visits() as f32
            }
            _ => 0.0,
        };

        if board.is_done() {
            return Ok(SearchResult {
                visit_counts,
                policy: [0.0; COLS],
                root_value,
                best_column: None,
                simulations,
            });
        }

        Ok(SearchResult {
            visit_counts,
            policy: self.policy(state, player, 1.0)?,
            root_value,
            best_column: Some(self.best_column(state, player)?),
            simulations,
        })
    }

    /// Greedy root choice.
    ///
    /// Most visited legal column; without visits the highest prior; for an
    /// unexpanded root the lowest legal column. Ties go to the lowest index.
    pub fn best_column(&self, state: &State, player: Player) -> Result<usize> {
        let board = GameBoard::from_state(*state, player);
        if board.is_done() {
            return Err(Connect4Error::GameOver);
        }
        let legal = board.legal_mask();

        let chosen = match self.stats(state, player) {
            Some(node) if node.total_visits() > 0 => argmax_legal(node.visit_count(), &legal),
            Some(node) => argmax_legal(node.prior(), &legal),
            None => argmax_legal(&[0u32; COLS], &legal),
        };
        chosen.ok_or(Connect4Error::GameOver)
    }

    /// Move distribution `∝ N(a)^(1/T)` over legal root columns.
    ///
    /// Falls back to a one-hot on [`MCTS::best_column`] when the root has no
    /// visits or `temperature` is zero.
    pub fn policy(&self, state: &State, player: Player, temperature: f32) -> Result<[f32; COLS]> {
        let board = GameBoard::from_state(*state, player);
        if board.is_done() {
            return Err(Connect4Error::GameOver);
        }
        let visits = self.visit_counts(state, player);

        match visit_policy(&visits, &board.legal_mask(), temperature) {
            Some(policy) => Ok(policy),
            None => {
                let mut policy = [0.0f32; COLS];
                policy[self.best_column(state, player)?] = 1.0;
                Ok(policy)
            }
        }
    }
}
