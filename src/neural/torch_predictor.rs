//! TorchScript-backed predictor.
//!
//! The module must accept a `[N, 2, 6, 7]` float tensor and return a tuple
//! `(policy_logits [N, 7], value [N, 1])`.

use crate::game::game_board::GameBoard;
use crate::neural::predictor::{Prediction, Predictor};
use crate::neural::tensor_conversion::board_to_tensor;
use crate::{Connect4Error, Result};
use std::path::Path;
use tch::{CModule, Device, IValue, Kind, Tensor};

pub struct TorchPredictor {
    module: CModule,
    device: Device,
}

impl TorchPredictor {
    pub fn load<P: AsRef<Path>>(path: P, device: Device) -> Result<Self> {
        let mut module = CModule::load_on_device(path.as_ref(), device)?;
        module.set_eval();
        log::info!("loaded TorchScript predictor from {}", path.as_ref().display());
        Ok(TorchPredictor { module, device })
    }

    pub fn device(&self) -> Device {
        self.device
    }

    fn split_output(output: IValue) -> Result<(Tensor, Tensor)> {
        match output {
            IValue::Tuple(items) if items.len() == 2 => {
                let mut items = items.into_iter();
                match (items.next(), items.next()) {
                    (Some(IValue::Tensor(policy)), Some(IValue::Tensor(value))) => {
                        Ok((policy, value))
                    }
                    _ => Err(Connect4Error::MalformedPrediction(
                        "model tuple must hold two tensors".to_string(),
                    )),
                }
            }
            _ => Err(Connect4Error::MalformedPrediction(
                "model must return (policy_logits, value)".to_string(),
            )),
        }
    }
}

impl Predictor for TorchPredictor {
    fn predict(&self, board: &GameBoard) -> Result<Prediction> {
        let input = board_to_tensor(board).to_device(self.device);
        let output = tch::no_grad(|| self.module.forward_is(&[IValue::Tensor(input)]))?;
        let (logits, value) = Self::split_output(output)?;

        let prior = logits
            .softmax(-1, Kind::Float)
            .flatten(0, -1)
            .to_device(Device::Cpu);
        let prior = Vec::<f32>::try_from(&prior)?;
        let value = value
            .flatten(0, -1)
            .to_device(Device::Cpu)
            .double_value(&[0]) as f32;

        Ok(Prediction::new(prior, value))
    }
}
