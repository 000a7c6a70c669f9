//! MCTS Hyperparameters Configuration
//!
//! Tunable parameters for search and self-play. Values can be loaded from a
//! JSON file; missing fields fall back to [`MCTSHyperparameters::default`].

use crate::{Connect4Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// MCTS hyperparameters configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MCTSHyperparameters {
    // ========== c_puct (Exploration Constant) ==========
    /// Weight of the prior-driven exploration term in the PUCT score.
    /// Default: 1.0
    pub c_puct: f32,

    /// Simulations run per move.
    /// Default: 200
    pub num_simulations: usize,

    // ========== Root Dirichlet Noise ==========
    /// Symmetric Dirichlet concentration for root noise.
    /// Default: 1.0
    pub dirichlet_alpha: f64,

    /// Fraction of noise mixed into the root prior, 0 disables noise.
    /// Default: 0.25
    pub dirichlet_epsilon: f32,

    // ========== Move Selection ==========
    /// Visit-count temperature used while exploring.
    /// Default: 1.0
    pub temperature: f32,

    /// Number of opening plies played with `temperature`; greedy afterwards.
    /// Default: 10
    pub temperature_moves: usize,

    /// Keep the statistics table between moves of the same game.
    /// Default: true
    pub reuse_tree: bool,
}

impl Default for MCTSHyperparameters {
    fn default() -> Self {
        Self {
            c_puct: 1.0,
            num_simulations: 200,
            dirichlet_alpha: 1.0,
            dirichlet_epsilon: 0.25,
            temperature: 1.0,
            temperature_moves: 10,
            reuse_tree: true,
        }
    }
}

impl MCTSHyperparameters {
    /// Loads and validates hyperparameters from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let params: MCTSHyperparameters = serde_json::from_str(&raw)?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.c_puct.is_finite() && self.c_puct > 0.0) {
            return Err(Connect4Error::Config(
                "c_puct must be finite and > 0".to_string(),
            ));
        }
        if self.num_simulations == 0 {
            return Err(Connect4Error::Config(
                "num_simulations must be > 0".to_string(),
            ));
        }
        if !(self.dirichlet_alpha.is_finite() && self.dirichlet_alpha > 0.0) {
            return Err(Connect4Error::Config(
                "dirichlet_alpha must be finite and > 0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.dirichlet_epsilon) {
            return Err(Connect4Error::Config(
                "dirichlet_epsilon must be in [0, 1]".to_string(),
            ));
        }
        if !(self.temperature.is_finite() && self.temperature >= 0.0) {
            return Err(Connect4Error::Config(
                "temperature must be finite and >= 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Temperature to use at a given ply of the game.
    pub fn temperature_at(&self, ply: usize) -> f32 {
        if ply < self.temperature_moves {
            self.temperature
        } else {
            0.0
        }
    }

    pub fn uses_root_noise(&self) -> bool {
        self.dirichlet_epsilon > 0.0
    }
}
