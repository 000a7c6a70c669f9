use crate::game::game_board::GameBoard;
use crate::game::state::COLS;
use crate::{Connect4Error, Result};
use std::sync::Mutex;

/// Policy/value oracle consulted when the search expands a new position.
///
/// This trait provides an abstraction layer for policy/value networks, enabling:
/// - Deterministic stubs for testing without a trained model
/// - TorchScript models through [`TorchPredictor`](crate::neural::torch_predictor::TorchPredictor)
///
/// The returned value is the expected outcome in [-1, 1] for the player to move
/// on `board`.
pub trait Predictor {
    fn predict(&self, board: &GameBoard) -> Result<Prediction>;
}

/// Raw predictor output, checked with [`Prediction::validate`] before use.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub prior: Vec<f32>,
    pub value: f32,
}

impl Prediction {
    pub fn new(prior: Vec<f32>, value: f32) -> Self {
        Prediction { prior, value }
    }

    /// Checks shape and ranges. The value is clamped to [-1, 1].
    pub fn validate(&self) -> Result<([f32; COLS], f32)> {
        if self.prior.len() != COLS {
            return Err(Connect4Error::MalformedPrediction(format!(
                "expected {} prior entries, got {}",
                COLS,
                self.prior.len()
            )));
        }
        if self.prior.iter().any(|p| !p.is_finite() || *p < 0.0) {
            return Err(Connect4Error::MalformedPrediction(
                "prior entries must be finite and non-negative".to_string(),
            ));
        }
        let total: f32 = self.prior.iter().sum();
        if total <= 0.0 {
            return Err(Connect4Error::MalformedPrediction(
                "prior mass must be positive".to_string(),
            ));
        }
        if !self.value.is_finite() {
            return Err(Connect4Error::MalformedPrediction(
                "value must be finite".to_string(),
            ));
        }

        let mut prior = [0.0f32; COLS];
        prior.copy_from_slice(&self.prior);
        Ok((prior, self.value.clamp(-1.0, 1.0)))
    }
}

/// Restricts `prior` to legal columns and renormalises.
///
/// Falls back to uniform over legal columns when the legal mass is zero.
pub fn mask_prior(prior: &[f32; COLS], legal: &[bool; COLS]) -> [f32; COLS] {
    let mut masked = [0.0f32; COLS];
    let legal_count = legal.iter().filter(|l| **l).count();
    if legal_count == 0 {
        return masked;
    }

    let total: f32 = (0..COLS).filter(|&c| legal[c]).map(|c| prior[c]).sum();
    if total > 0.0 && total.is_finite() {
        for col in (0..COLS).filter(|&c| legal[c]) {
            masked[col] = prior[col] / total;
        }
    } else {
        log::warn!("prior mass collapsed after legality masking, using uniform prior");
        let uniform = 1.0 / legal_count as f32;
        for col in (0..COLS).filter(|&c| legal[c]) {
            masked[col] = uniform;
        }
    }
    masked
}

/// Uniform prior over legal columns and a neutral value.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformPredictor;

impl Predictor for UniformPredictor {
    fn predict(&self, board: &GameBoard) -> Result<Prediction> {
        let legal = board.legal_mask();
        let count = legal.iter().filter(|l| **l).count().max(1) as f32;
        let prior = legal
            .iter()
            .map(|&l| if l { 1.0 / count } else { 0.0 })
            .collect();
        Ok(Prediction::new(prior, 0.0))
    }
}

/// Shares a predictor that is `Send` but not `Sync` across threads.
impl<P: Predictor> Predictor for Mutex<P> {
    fn predict(&self, board: &GameBoard) -> Result<Prediction> {
        let guard = self
            .lock()
            .map_err(|_| Connect4Error::MalformedPrediction("predictor lock poisoned".to_string()))?;
        guard.predict(board)
    }
}

impl<P: Predictor + ?Sized> Predictor for Box<P> {
    fn predict(&self, board: &GameBoard) -> Result<Prediction> {
        (**self).predict(board)
    }
}
